pub mod classify;
pub mod status;
pub mod table;

use crate::cli::ModelArgs;
use crate::error::AppError;
use crate::services::advisory::AdvisoryResolver;
use crate::services::classifier::model_manager::{self, OnnxModel};
use crate::services::classifier::Classifier;
use crate::services::config_service::AppConfig;
use crate::services::pipeline::AdvisoryPipeline;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Config file (if any), then command-line overrides.
pub fn resolve_config(config_path: Option<&Path>, args: &ModelArgs) -> Result<AppConfig, AppError> {
    let mut config = match config_path {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    if let Some(model) = &args.model {
        config.model_path = model.clone();
    }
    if let Some(labels) = &args.labels {
        config.labels_path = Some(labels.clone());
    }
    if args.cpu {
        config.use_gpu = false;
    }

    config.validate()?;
    Ok(config)
}

/// Startup: verifies labels, then loads the model once. Both failures are fatal.
pub fn load_model(config: &AppConfig) -> Result<(Arc<OnnxModel>, bool), AppError> {
    let labels_verified = match &config.labels_path {
        Some(path) => {
            let labels = model_manager::load_labels(path)?;
            model_manager::verify_labels(&labels)?;
            info!("Model labels match the category order");
            true
        }
        None => false,
    };

    let model = OnnxModel::load(&config.model_path, config.use_gpu, config.intra_threads)?;
    Ok((Arc::new(model), labels_verified))
}

pub fn build_pipeline(config: &AppConfig, model: Arc<OnnxModel>) -> AdvisoryPipeline {
    let classifier = Classifier::new(
        model,
        config.input_size,
        config.layout,
        config.apply_softmax,
    );
    AdvisoryPipeline::new(
        classifier,
        AdvisoryResolver::new(config.override_policy.clone()),
    )
}
