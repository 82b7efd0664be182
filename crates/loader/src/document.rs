use model_eval_shared::ResultRecord;
use serde::Deserialize;

/// On-disk shape written by the training scripts. Anything not listed here
/// (curve points, histories, hyperparameters) is ignored.
#[derive(Debug, Deserialize)]
struct RawResult {
    accuracy: f64,
    training_time: f64,
    epochs: u32,
    roc_curve: RawRocCurve,
}

#[derive(Debug, Deserialize)]
struct RawRocCurve {
    auc: f64,
}

impl RawResult {
    fn into_record(self, model: &str, resolution: u32) -> ResultRecord {
        ResultRecord {
            model_name: model.to_string(),
            resolution,
            accuracy: self.accuracy,
            training_time: self.training_time,
            epochs: self.epochs,
            auc: self.roc_curve.auc,
        }
    }
}

/// Decodes one result document and flattens `roc_curve.auc` into the record.
///
/// The pair comes from the file's position in the grid, not from the document.
pub fn parse_document(
    bytes: &[u8],
    model: &str,
    resolution: u32,
) -> Result<ResultRecord, serde_json::Error> {
    let raw: RawResult = serde_json::from_slice(bytes)?;
    Ok(raw.into_record(model, resolution))
}
