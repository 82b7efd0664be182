pub mod best;
pub mod evaluate;
pub mod export;
pub mod plot;
pub mod summary;

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use model_eval_report::runner::{self, Evaluation};
use model_eval_shared::EvalConfig;
use tracing::debug;

use crate::output;

/// Where to find result documents and which grid to expect.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// TOML file with results_dir, models, resolutions and file_template
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Directory holding <model>_Results_<size>.json documents
    #[arg(long)]
    pub results_dir: Option<PathBuf>,
    /// Comma-separated model names, in report order
    #[arg(long, value_delimiter = ',')]
    pub models: Option<Vec<String>>,
    /// Comma-separated image sizes, in report order
    #[arg(long, value_delimiter = ',')]
    pub resolutions: Option<Vec<u32>>,
    /// Number of parallel readers (0 = auto)
    #[arg(long, default_value = "0")]
    pub workers: usize,
    /// Continue without malformed documents instead of failing
    #[arg(long)]
    pub allow_malformed: bool,
}

impl SourceArgs {
    /// Defaults, then the config file, then flags.
    pub fn resolve_config(&self) -> anyhow::Result<EvalConfig> {
        let mut config = match &self.config {
            Some(path) => EvalConfig::load(path)?,
            None => EvalConfig::default(),
        };
        if let Some(dir) = &self.results_dir {
            config.results_dir = dir.clone();
        }
        if let Some(models) = &self.models {
            config.models = models.clone();
        }
        if let Some(resolutions) = &self.resolutions {
            config.resolutions = resolutions.clone();
        }
        config.validate()?;
        debug!(?config, "resolved configuration");
        Ok(config)
    }

    pub fn evaluate(&self) -> anyhow::Result<Evaluation> {
        let config = self.resolve_config()?;
        let n_workers = if self.workers == 0 { None } else { Some(self.workers) };

        let start = Instant::now();
        let evaluation = runner::evaluate(&config, n_workers)?;
        output::print_load_report(&evaluation.load, &config, start.elapsed());

        if !evaluation.load.is_clean() {
            output::print_load_errors(&evaluation.load);
            if !self.allow_malformed {
                anyhow::bail!(
                    "{} malformed result document(s); fix them or rerun with --allow-malformed",
                    evaluation.load.errors.len()
                );
            }
        }
        Ok(evaluation)
    }
}

/// Selections need at least one row.
pub(crate) fn require_rows(evaluation: &Evaluation) -> anyhow::Result<()> {
    if evaluation.table.is_empty() {
        anyhow::bail!(
            "no result documents found ({} expected); nothing to compare",
            evaluation.load.expected()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn flags_override_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("eval.toml");
        fs::write(
            &path,
            "results_dir = \"from-file\"\nmodels = [\"CNN\", \"ResNet50\"]\nresolutions = [64]\n",
        )
        .unwrap();

        let args = SourceArgs {
            config: Some(path),
            resolutions: Some(vec![128, 256]),
            ..SourceArgs::default()
        };
        let config = args.resolve_config().unwrap();

        assert_eq!(config.results_dir, PathBuf::from("from-file"));
        assert_eq!(config.models, vec!["CNN", "ResNet50"]);
        assert_eq!(config.resolutions, vec![128, 256]);
    }

    #[test]
    fn defaults_without_flags() {
        let config = SourceArgs::default().resolve_config().unwrap();
        assert_eq!(config, EvalConfig::default());
    }

    #[test]
    fn invalid_override_is_rejected() {
        let args = SourceArgs {
            resolutions: Some(vec![128, 128]),
            ..SourceArgs::default()
        };
        assert!(args.resolve_config().is_err());
    }

    #[test]
    fn malformed_documents_fail_unless_allowed() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("CNN_Results_128.json"), "{}").unwrap();

        let strict = SourceArgs {
            results_dir: Some(dir.path().to_path_buf()),
            models: Some(vec!["CNN".to_string()]),
            resolutions: Some(vec![128, 256]),
            ..SourceArgs::default()
        };
        assert!(strict.evaluate().is_err());

        let lenient = SourceArgs {
            allow_malformed: true,
            ..strict
        };
        let evaluation = lenient.evaluate().unwrap();
        assert_eq!(evaluation.load.errors.len(), 1);
        assert!(require_rows(&evaluation).is_err());
    }
}
