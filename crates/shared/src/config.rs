use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// Reference evaluation grid
pub const DEFAULT_MODELS: [&str; 4] = ["CNN", "ResNet50", "MobileNetV2", "EfficientNetB0"];
pub const DEFAULT_RESOLUTIONS: [u32; 3] = [128, 256, 512];
pub const DEFAULT_RESULTS_DIR: &str = "JSON Files";
pub const DEFAULT_FILE_TEMPLATE: &str = "{model}_Results_{resolution}.json";

// Artifact names
pub const DEFAULT_CSV_PATH: &str = "model_evaluation_results.csv";
pub const DEFAULT_PLOT_PATH: &str = "model_comparison_analysis.svg";

const MODEL_PLACEHOLDER: &str = "{model}";
const RESOLUTION_PLACEHOLDER: &str = "{resolution}";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("model list is empty")]
    EmptyModels,
    #[error("resolution list is empty")]
    EmptyResolutions,
    #[error("model name '{0}' must be non-empty and free of path separators, '..' and braces")]
    InvalidModelName(String),
    #[error("model '{0}' is listed more than once")]
    DuplicateModel(String),
    #[error("resolution {0} is listed more than once")]
    DuplicateResolution(u32),
    #[error("resolution must be positive")]
    ZeroResolution,
    #[error("file template '{0}' must contain both {{model}} and {{resolution}}")]
    InvalidTemplate(String),
}

/// Where result documents live and which (model, resolution) grid to expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub results_dir: PathBuf,
    pub models: Vec<String>,
    pub resolutions: Vec<u32>,
    pub file_template: String,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            resolutions: DEFAULT_RESOLUTIONS.to_vec(),
            file_template: DEFAULT_FILE_TEMPLATE.to_string(),
        }
    }
}

impl EvalConfig {
    pub fn new(
        results_dir: impl Into<PathBuf>,
        models: impl IntoIterator<Item = impl Into<String>>,
        resolutions: impl IntoIterator<Item = u32>,
    ) -> Self {
        Self {
            results_dir: results_dir.into(),
            models: models.into_iter().map(Into::into).collect(),
            resolutions: resolutions.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EvalConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.models.is_empty() {
            return Err(ConfigError::EmptyModels);
        }
        if self.resolutions.is_empty() {
            return Err(ConfigError::EmptyResolutions);
        }

        let mut seen = HashSet::new();
        for model in &self.models {
            if !is_valid_model_name(model) {
                return Err(ConfigError::InvalidModelName(model.clone()));
            }
            if !seen.insert(model.as_str()) {
                return Err(ConfigError::DuplicateModel(model.clone()));
            }
        }

        let mut seen = HashSet::new();
        for &resolution in &self.resolutions {
            if resolution == 0 {
                return Err(ConfigError::ZeroResolution);
            }
            if !seen.insert(resolution) {
                return Err(ConfigError::DuplicateResolution(resolution));
            }
        }

        if !self.file_template.contains(MODEL_PLACEHOLDER)
            || !self.file_template.contains(RESOLUTION_PLACEHOLDER)
        {
            return Err(ConfigError::InvalidTemplate(self.file_template.clone()));
        }

        Ok(())
    }

    /// The resolution is substituted first so text inside a model name is
    /// never expanded as a placeholder.
    pub fn file_name(&self, model: &str, resolution: u32) -> String {
        self.file_template
            .replace(RESOLUTION_PLACEHOLDER, &resolution.to_string())
            .replace(MODEL_PLACEHOLDER, model)
    }

    pub fn result_path(&self, model: &str, resolution: u32) -> PathBuf {
        self.results_dir.join(self.file_name(model, resolution))
    }

    /// Model-major, resolution-minor. Every ordered output of the crate follows this.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.models.iter().flat_map(move |model| {
            self.resolutions
                .iter()
                .map(move |&resolution| (model.as_str(), resolution))
        })
    }

    pub fn expected_count(&self) -> usize {
        self.models.len() * self.resolutions.len()
    }
}

/// Model names become part of a file name inside `results_dir`.
fn is_valid_model_name(model: &str) -> bool {
    !model.trim().is_empty()
        && !model.contains("..")
        && !model.contains(['/', '\\', '{', '}', '\0'])
}
