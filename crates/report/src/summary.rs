use std::fmt;

use model_eval_shared::{EvalConfig, ResultRecord, ResultSet};
use tracing::debug;

use crate::error::ReportError;
use crate::select::Metric;

pub fn resolution_label(resolution: u32) -> String {
    format!("{resolution}x{resolution}")
}

/// Inverse of [`resolution_label`]. Only square sizes are accepted.
pub fn parse_resolution_label(label: &str) -> Result<u32, ReportError> {
    let invalid = || ReportError::InvalidResolutionLabel(label.to_string());
    let (w, h) = label.split_once('x').ok_or_else(invalid)?;
    let w: u32 = w.trim().parse().map_err(|_| invalid())?;
    let h: u32 = h.trim().parse().map_err(|_| invalid())?;
    if w != h || w == 0 {
        return Err(invalid());
    }
    Ok(w)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub model_name: String,
    pub resolution: u32,
    pub accuracy: f64,
    pub training_time: f64,
    pub epochs: u32,
    pub auc: f64,
    /// accuracy / training_time. Derived here, never stored with the record.
    pub efficiency_score: f64,
}

impl SummaryRow {
    /// Rejects rows whose metrics would make the efficiency score
    /// infinite, NaN or negative, or that could not be ranked.
    pub fn from_record(record: &ResultRecord) -> Result<Self, ReportError> {
        let degenerate = |metric: Metric, value: f64| ReportError::DegenerateMetric {
            model: record.model_name.clone(),
            resolution: record.resolution,
            metric,
            value,
        };

        if !(record.training_time.is_finite() && record.training_time > 0.0) {
            return Err(degenerate(Metric::TrainingTime, record.training_time));
        }
        if !(record.accuracy.is_finite() && record.accuracy >= 0.0) {
            return Err(degenerate(Metric::Accuracy, record.accuracy));
        }
        if !record.auc.is_finite() {
            return Err(degenerate(Metric::Auc, record.auc));
        }
        // A tiny positive time can still overflow the quotient.
        let efficiency_score = record.accuracy / record.training_time;
        if !efficiency_score.is_finite() {
            return Err(degenerate(Metric::Efficiency, efficiency_score));
        }

        Ok(Self {
            model_name: record.model_name.clone(),
            resolution: record.resolution,
            accuracy: record.accuracy,
            training_time: record.training_time,
            epochs: record.epochs,
            auc: record.auc,
            efficiency_score,
        })
    }

    pub fn resolution_label(&self) -> String {
        resolution_label(self.resolution)
    }

    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Accuracy => self.accuracy,
            Metric::TrainingTime => self.training_time,
            Metric::Auc => self.auc,
            Metric::Efficiency => self.efficiency_score,
        }
    }
}

/// Rows in model-major, resolution-minor order of the grid they were built
/// from. Pairs without a record have no row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryTable {
    rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn build(results: &ResultSet, config: &EvalConfig) -> Result<Self, ReportError> {
        let rows = config
            .pairs()
            .filter_map(|(model, resolution)| results.get(model, resolution))
            .map(SummaryRow::from_record)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            rows = rows.len(),
            candidates = config.expected_count(),
            "summary table built"
        );
        Ok(Self { rows })
    }

    /// Keeps the given order; selection tie-breaks follow it.
    pub fn from_rows(rows: Vec<SummaryRow>) -> Self {
        Self { rows }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SummaryRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, model: &str, resolution: u32) -> Option<&SummaryRow> {
        self.rows
            .iter()
            .find(|r| r.model_name == model && r.resolution == resolution)
    }

    pub fn for_resolution(&self, resolution: u32) -> impl Iterator<Item = &SummaryRow> {
        self.rows.iter().filter(move |r| r.resolution == resolution)
    }

    /// Models in first-appearance order.
    pub fn models(&self) -> Vec<&str> {
        let mut models: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !models.contains(&row.model_name.as_str()) {
                models.push(&row.model_name);
            }
        }
        models
    }

    /// Distinct resolutions, ascending.
    pub fn resolutions(&self) -> Vec<u32> {
        let mut resolutions: Vec<u32> = self.rows.iter().map(|r| r.resolution).collect();
        resolutions.sort_unstable();
        resolutions.dedup();
        resolutions
    }
}

impl<'a> IntoIterator for &'a SummaryTable {
    type Item = &'a SummaryRow;
    type IntoIter = std::slice::Iter<'a, SummaryRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

const HEADERS: [&str; 6] = ["Model", "Image_Size", "Accuracy", "Training_Time", "Epochs", "AUC"];

impl fmt::Display for SummaryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<[String; 6]> = self
            .rows
            .iter()
            .map(|r| {
                [
                    r.model_name.clone(),
                    r.resolution_label(),
                    format!("{:.2}", r.accuracy),
                    format!("{:.1}", r.training_time),
                    r.epochs.to_string(),
                    format!("{:.4}", r.auc),
                ]
            })
            .collect();

        // Padding counts chars, so widths must too.
        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        // Text columns left-aligned, numbers right-aligned.
        let line = |f: &mut fmt::Formatter<'_>, row: [&str; 6]| -> fmt::Result {
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    write!(f, "  ")?;
                }
                if i < 2 {
                    write!(f, "{:<w$}", cell, w = widths[i])?;
                } else {
                    write!(f, "{:>w$}", cell, w = widths[i])?;
                }
            }
            writeln!(f)
        };

        line(f, HEADERS)?;
        for row in &cells {
            line(f, row.each_ref().map(String::as_str))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(model: &str, resolution: u32, accuracy: f64, training_time: f64) -> ResultRecord {
        ResultRecord {
            model_name: model.to_string(),
            resolution,
            accuracy,
            training_time,
            epochs: 10,
            auc: 0.9,
        }
    }

    #[test]
    fn efficiency_is_accuracy_over_time() {
        let row = SummaryRow::from_record(&record("CNN", 128, 91.2, 120.0)).unwrap();
        assert!((row.efficiency_score - 0.76).abs() < 1e-12);
        assert_eq!(row.resolution_label(), "128x128");
    }

    #[test]
    fn degenerate_training_time_is_rejected() {
        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = SummaryRow::from_record(&record("CNN", 256, 90.0, bad)).unwrap_err();
            match err {
                ReportError::DegenerateMetric {
                    model,
                    resolution,
                    metric,
                    ..
                } => {
                    assert_eq!(model, "CNN");
                    assert_eq!(resolution, 256);
                    assert_eq!(metric, Metric::TrainingTime);
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn overflowing_efficiency_is_rejected() {
        for tiny in [1e-307, 1e-310, f64::MIN_POSITIVE] {
            let err = SummaryRow::from_record(&record("CNN", 128, 91.2, tiny)).unwrap_err();
            assert!(
                matches!(err, ReportError::DegenerateMetric { metric: Metric::Efficiency, .. }),
                "training_time {tiny} gave {err}"
            );
        }

        let config = EvalConfig::new("unused", ["CNN", "ResNet50"], [128]);
        let results: ResultSet = [
            record("CNN", 128, 99.0, 10.0),
            record("ResNet50", 128, 1.0, 1e-310),
        ]
        .into_iter()
        .collect();
        assert!(matches!(
            SummaryTable::build(&results, &config),
            Err(ReportError::DegenerateMetric {
                metric: Metric::Efficiency,
                resolution: 128,
                ..
            })
        ));
    }

    #[test]
    fn every_row_has_finite_non_negative_efficiency() {
        let config = EvalConfig::new("unused", ["CNN", "ResNet50"], [128, 256]);
        let results: ResultSet = [
            record("CNN", 128, 0.0, 1e-300),
            record("CNN", 256, 100.0, 1e-3),
            record("ResNet50", 128, 91.2, 120.0),
            record("ResNet50", 256, 50.0, 1e9),
        ]
        .into_iter()
        .collect();

        let table = SummaryTable::build(&results, &config).unwrap();
        assert_eq!(table.len(), 4);
        for row in &table {
            assert!(row.efficiency_score.is_finite() && row.efficiency_score >= 0.0);
            let expected = row.accuracy / row.training_time;
            assert!((row.efficiency_score - expected).abs() <= 1e-12 * expected.max(1.0));
        }
    }

    #[test]
    fn negative_accuracy_is_rejected() {
        let err = SummaryRow::from_record(&record("CNN", 128, -1.0, 10.0)).unwrap_err();
        assert!(matches!(
            err,
            ReportError::DegenerateMetric { metric: Metric::Accuracy, .. }
        ));
    }

    #[test]
    fn table_follows_grid_order_and_skips_absent_pairs() {
        let config = EvalConfig::new("unused", ["ResNet50", "CNN"], [512, 128]);
        let results: ResultSet = [
            record("CNN", 128, 91.0, 100.0),
            record("CNN", 512, 93.0, 400.0),
            record("ResNet50", 128, 92.0, 300.0),
            record("VGG16", 128, 99.0, 1.0),
        ]
        .into_iter()
        .collect();

        let table = SummaryTable::build(&results, &config).unwrap();
        let order: Vec<_> = table
            .iter()
            .map(|r| (r.model_name.as_str(), r.resolution))
            .collect();
        assert_eq!(order, vec![("ResNet50", 128), ("CNN", 512), ("CNN", 128)]);
        assert_eq!(table.models(), vec!["ResNet50", "CNN"]);
        assert_eq!(table.resolutions(), vec![128, 512]);
        assert_eq!(table.for_resolution(128).count(), 2);
        assert!(table.get("ResNet50", 512).is_none());
    }

    #[test]
    fn one_degenerate_row_fails_the_build() {
        let config = EvalConfig::new("unused", ["CNN"], [128, 256]);
        let results: ResultSet = [record("CNN", 128, 91.0, 100.0), record("CNN", 256, 93.0, 0.0)]
            .into_iter()
            .collect();
        assert!(matches!(
            SummaryTable::build(&results, &config),
            Err(ReportError::DegenerateMetric { resolution: 256, .. })
        ));
    }

    #[test]
    fn resolution_labels_parse_back() {
        assert_eq!(parse_resolution_label("256x256").unwrap(), 256);
        for bad in ["256", "256x128", "axa", "0x0", ""] {
            assert!(parse_resolution_label(bad).is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn display_renders_aligned_columns() {
        let table = SummaryTable::from_rows(vec![
            SummaryRow::from_record(&record("CNN", 128, 91.2, 120.0)).unwrap(),
            SummaryRow::from_record(&record("EfficientNetB0", 512, 95.25, 1234.5)).unwrap(),
        ]);
        let text = table.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Model         "));
        assert!(lines[1].starts_with("CNN "));
        assert!(lines[2].contains("512x512"));
        assert!(lines[2].contains("1234.5"));
        assert!(lines.iter().all(|l| l.len() == lines[0].len()));
    }

    #[test]
    fn display_aligns_non_ascii_model_names() {
        let table = SummaryTable::from_rows(vec![
            SummaryRow::from_record(&record("Réseau-Léger-Über", 128, 91.2, 120.0)).unwrap(),
            SummaryRow::from_record(&record("CNN", 128, 95.25, 1234.5)).unwrap(),
            SummaryRow::from_record(&record("模型", 256, 90.0, 10.0)).unwrap(),
        ]);
        let text = table.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);

        let width = lines[0].chars().count();
        assert!(lines.iter().all(|l| l.chars().count() == width), "{text}");
        // "Réseau-Léger-Über" is 17 chars; the next column starts after two spaces.
        let column = |l: &str| l.chars().position(|c| c.is_ascii_digit()).unwrap();
        assert_eq!(column(lines[1]), 19);
        assert_eq!(column(lines[2]), 19);
        assert_eq!(column(lines[3]), 19);
    }
}
