use std::io;
use std::path::PathBuf;

use model_eval_shared::{EvalConfig, ResultRecord, ResultSet};
use rayon::prelude::*;
use tracing::{debug, error, info, warn};

use crate::document::parse_document;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("malformed result for {model} at {resolution}px ({path}): {reason}")]
    Malformed {
        model: String,
        resolution: u32,
        path: PathBuf,
        reason: String,
    },
    #[error("failed to read result for {model} at {resolution}px ({path}): {source}")]
    Io {
        model: String,
        resolution: u32,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LoadError {
    pub fn pair(&self) -> (&str, u32) {
        match self {
            LoadError::Malformed {
                model, resolution, ..
            }
            | LoadError::Io {
                model, resolution, ..
            } => (model.as_str(), *resolution),
        }
    }
}

/// An expected document that was not on disk. Not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingResult {
    pub model: String,
    pub resolution: u32,
    pub path: PathBuf,
}

#[derive(Debug)]
pub struct LoadReport {
    pub results: ResultSet,
    pub missing: Vec<MissingResult>,
    pub errors: Vec<LoadError>,
    expected: usize,
}

impl LoadReport {
    /// Number of candidate pairs in the configured grid.
    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn loaded(&self) -> usize {
        self.results.len()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.errors.is_empty() && self.missing.is_empty()
    }
}

enum Outcome {
    Loaded(ResultRecord),
    Missing(MissingResult),
    Failed(LoadError),
}

pub struct ResultLoader {
    config: EvalConfig,
}

impl ResultLoader {
    pub fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    pub fn load(&self) -> LoadReport {
        let outcomes: Vec<Outcome> = self
            .config
            .pairs()
            .map(|(model, resolution)| self.load_pair(model, resolution))
            .collect();
        self.assemble(outcomes)
    }

    /// Reads documents on a dedicated pool. Outcomes are reassembled in grid
    /// order, so the report does not depend on read order or thread count.
    pub fn load_with_workers(
        &self,
        n_workers: Option<usize>,
    ) -> Result<LoadReport, rayon::ThreadPoolBuildError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(n_workers.unwrap_or_else(|| rayon::current_num_threads().min(8)))
            .build()?;

        let pairs: Vec<(&str, u32)> = self.config.pairs().collect();
        let outcomes: Vec<Outcome> = pool.install(|| {
            pairs
                .par_iter()
                .map(|&(model, resolution)| self.load_pair(model, resolution))
                .collect()
        });

        Ok(self.assemble(outcomes))
    }

    fn load_pair(&self, model: &str, resolution: u32) -> Outcome {
        let path = self.config.result_path(model, resolution);

        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Outcome::Missing(MissingResult {
                    model: model.to_string(),
                    resolution,
                    path,
                });
            }
            Err(source) => {
                return Outcome::Failed(LoadError::Io {
                    model: model.to_string(),
                    resolution,
                    path,
                    source,
                });
            }
        };

        match parse_document(&bytes, model, resolution) {
            Ok(record) => Outcome::Loaded(record),
            Err(e) => Outcome::Failed(LoadError::Malformed {
                model: model.to_string(),
                resolution,
                path,
                reason: e.to_string(),
            }),
        }
    }

    fn assemble(&self, outcomes: Vec<Outcome>) -> LoadReport {
        let mut report = LoadReport {
            results: ResultSet::new(),
            missing: Vec::new(),
            errors: Vec::new(),
            expected: self.config.expected_count(),
        };

        for outcome in outcomes {
            match outcome {
                Outcome::Loaded(record) => {
                    debug!(model = %record.model_name, resolution = record.resolution, "loaded result");
                    report.results.insert(record);
                }
                Outcome::Missing(missing) => {
                    warn!(
                        model = %missing.model,
                        resolution = missing.resolution,
                        path = %missing.path.display(),
                        "result not found"
                    );
                    report.missing.push(missing);
                }
                Outcome::Failed(err) => {
                    error!("{err}");
                    report.errors.push(err);
                }
            }
        }

        info!(
            loaded = report.loaded(),
            missing = report.missing.len(),
            errors = report.errors.len(),
            expected = report.expected,
            dir = %self.config.results_dir.display(),
            "results loaded"
        );
        report
    }
}
