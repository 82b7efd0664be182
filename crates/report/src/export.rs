use std::fs::File;
use std::io;
use std::path::Path;

use model_eval_shared::ResultRecord;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ReportError;
use crate::summary::{parse_resolution_label, resolution_label, SummaryRow, SummaryTable};

/// One CSV line. The efficiency score is derived, so it is not written.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(rename = "Model")]
    model: String,
    #[serde(rename = "Image_Size")]
    image_size: String,
    #[serde(rename = "Accuracy")]
    accuracy: f64,
    #[serde(rename = "Training_Time")]
    training_time: f64,
    #[serde(rename = "Epochs")]
    epochs: u32,
    #[serde(rename = "AUC")]
    auc: f64,
}

impl From<&SummaryRow> for CsvRow {
    fn from(row: &SummaryRow) -> Self {
        Self {
            model: row.model_name.clone(),
            image_size: resolution_label(row.resolution),
            accuracy: row.accuracy,
            training_time: row.training_time,
            epochs: row.epochs,
            auc: row.auc,
        }
    }
}

impl CsvRow {
    fn into_row(self) -> Result<SummaryRow, ReportError> {
        let resolution = parse_resolution_label(&self.image_size)?;
        SummaryRow::from_record(&ResultRecord {
            model_name: self.model,
            resolution,
            accuracy: self.accuracy,
            training_time: self.training_time,
            epochs: self.epochs,
            auc: self.auc,
        })
    }
}

pub fn write_csv<W: io::Write>(table: &SummaryTable, writer: W) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in table {
        writer.serialize(CsvRow::from(row))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_csv_file(table: &SummaryTable, path: &Path) -> Result<(), ReportError> {
    write_csv(table, File::create(path)?)?;
    info!(rows = table.len(), path = %path.display(), "results exported");
    Ok(())
}

/// Reads a table written by [`write_csv`], recomputing efficiency scores.
pub fn read_csv<R: io::Read>(reader: R) -> Result<SummaryTable, ReportError> {
    let mut reader = csv::Reader::from_reader(reader);
    let rows = reader
        .deserialize::<CsvRow>()
        .map(|record| record?.into_row())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SummaryTable::from_rows(rows))
}

pub fn read_csv_file(path: &Path) -> Result<SummaryTable, ReportError> {
    read_csv(File::open(path)?)
}
