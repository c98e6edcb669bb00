use crate::error::AppError;
use crate::services::advisory::OverridePolicy;
use crate::services::classifier::inference::{TensorLayout, INPUT_SIZE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL_PATH: &str = "waste_classifier.onnx";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model_path: PathBuf,
    /// Model config JSON with an `id2label` map, checked against the category order.
    pub labels_path: Option<PathBuf>,
    pub input_size: u32,
    pub layout: TensorLayout,
    pub apply_softmax: bool,
    pub use_gpu: bool,
    pub intra_threads: usize,
    pub override_policy: OverridePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            labels_path: None,
            input_size: INPUT_SIZE,
            layout: TensorLayout::default(),
            apply_softmax: false,
            use_gpu: false,
            intra_threads: 4,
            override_policy: OverridePolicy::default(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.input_size == 0 {
            return Err(AppError::Config("input_size must be positive".to_string()));
        }
        if self.intra_threads == 0 {
            return Err(AppError::Config("intra_threads must be positive".to_string()));
        }
        self.override_policy.validate()
    }
}
