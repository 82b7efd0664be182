use crate::select::Metric;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("cannot select best {metric}: summary table has no rows")]
    EmptySelection { metric: Metric },
    #[error("{model} at {resolution}px has degenerate {metric}: {value}")]
    DegenerateMetric {
        model: String,
        resolution: u32,
        metric: Metric,
        value: f64,
    },
    #[error("invalid image size label '{0}', expected <N>x<N>")]
    InvalidResolutionLabel(String),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
