use crate::error::AppError;
use crate::models::category::Category;
use crate::models::classify_types::ModelStatus;
use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

/// Anything that turns a preprocessed batch into one score per category.
pub trait ScoreModel: Send + Sync {
    fn predict(&self, input: Array4<f32>) -> Result<Vec<f32>, AppError>;
}

/// The pre-trained classifier, loaded once at startup and shared read-only.
///
/// ONNX Runtime needs `&mut Session` to run, so the session sits behind a
/// mutex. It is never swapped or reloaded after `load`.
pub struct OnnxModel {
    path: PathBuf,
    session: Mutex<Session>,
    input_name: String,
    inputs: Vec<String>,
    outputs: Vec<String>,
}

impl OnnxModel {
    pub fn load(path: &Path, use_gpu: bool, intra_threads: usize) -> Result<Self, AppError> {
        let unavailable = |reason: String| AppError::ModelUnavailable {
            path: path.to_path_buf(),
            reason,
        };

        if !path.is_file() {
            return Err(unavailable("file not found".to_string()));
        }

        let _ = ort::init().with_name("waste-sort").commit();

        let mut builder = Session::builder()
            .map_err(|e| unavailable(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)
            .map_err(|e| unavailable(format!("Failed to set optimization level: {}", e)))?
            .with_intra_threads(intra_threads)
            .map_err(|e| unavailable(format!("Failed to set intra threads: {}", e)))?;

        if use_gpu {
            builder = builder
                .with_execution_providers([
                    ort::execution_providers::CoreMLExecutionProvider::default().build(),
                    ort::execution_providers::CUDAExecutionProvider::default().build(),
                    ort::execution_providers::CPUExecutionProvider::default().build(),
                ])
                .map_err(|e| unavailable(format!("Failed to register GPU execution providers: {}", e)))?;
        } else {
            builder = builder
                .with_execution_providers([
                    ort::execution_providers::CPUExecutionProvider::default().build(),
                ])
                .map_err(|e| unavailable(format!("Failed to register CPU execution provider: {}", e)))?;
        }

        let session = builder
            .commit_from_file(path)
            .map_err(|e| unavailable(format!("Failed to load ONNX model: {}", e)))?;

        let inputs: Vec<String> = session.inputs().iter().map(|i| i.name().to_string()).collect();
        let outputs: Vec<String> = session.outputs().iter().map(|o| o.name().to_string()).collect();
        let input_name = inputs
            .first()
            .cloned()
            .ok_or_else(|| unavailable("Model declares no inputs".to_string()))?;

        info!(
            "Loaded model {} (inputs: {:?}, outputs: {:?}, gpu: {})",
            path.display(),
            inputs,
            outputs,
            use_gpu
        );

        Ok(Self {
            path: path.to_path_buf(),
            session: Mutex::new(session),
            input_name,
            inputs,
            outputs,
        })
    }

    pub fn status(&self, labels_verified: bool) -> ModelStatus {
        ModelStatus {
            model_path: self.path.clone(),
            inputs: self.inputs.clone(),
            outputs: self.outputs.clone(),
            labels_verified,
        }
    }
}

impl ScoreModel for OnnxModel {
    fn predict(&self, input: Array4<f32>) -> Result<Vec<f32>, AppError> {
        debug!("Running inference on tensor {:?}", input.shape());
        let input_tensor = Value::from_array(input)
            .map_err(|e| AppError::Inference(format!("Failed to create tensor value: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| AppError::Inference("Model session lock poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .map_err(|e| AppError::Inference(format!("Inference failed: {}", e)))?;

        let output_value = outputs
            .values()
            .next()
            .ok_or_else(|| AppError::Inference("Model produced no outputs".to_string()))?;

        let (_, data) = output_value
            .try_extract_tensor::<f32>()
            .map_err(|e| AppError::Inference(format!("Failed to extract output tensor: {}", e)))?;

        Ok(data.to_vec())
    }
}

/// Reads the `id2label` map of a model config JSON into index order.
pub fn load_labels(config_path: &Path) -> Result<Vec<String>, AppError> {
    let content = std::fs::read_to_string(config_path).map_err(|e| {
        AppError::Config(format!(
            "Failed to read label config {}: {}",
            config_path.display(),
            e
        ))
    })?;
    let config: serde_json::Value = serde_json::from_str(&content)?;

    let id2label = config["id2label"]
        .as_object()
        .ok_or_else(|| AppError::Config("Label config missing id2label field".to_string()))?;

    let mut labels = Vec::with_capacity(id2label.len());
    for (key, value) in id2label {
        let idx = key
            .parse::<usize>()
            .map_err(|_| AppError::Config(format!("Non-numeric id2label key {:?}", key)))?;
        let label = value
            .as_str()
            .ok_or_else(|| AppError::Config(format!("id2label entry {} is not a string", idx)))?;
        labels.push((idx, label.to_string()));
    }
    labels.sort_by_key(|(idx, _)| *idx);

    // Keys must cover 0..len exactly; a gap or a repeated index ("1" and "01")
    // would shift every later label onto the wrong output position.
    for (position, (idx, _)) in labels.iter().enumerate() {
        if *idx != position {
            return Err(AppError::Config(format!(
                "id2label indices must run 0..{} without gaps or repeats, found {} at position {}",
                labels.len(),
                idx,
                position
            )));
        }
    }

    Ok(labels.into_iter().map(|(_, label)| label).collect())
}

/// Checks that the model's labels line up with `Category::ALL`, position by position.
pub fn verify_labels(labels: &[String]) -> Result<(), AppError> {
    for (index, expected) in Category::ALL.iter().enumerate() {
        let found = labels.get(index).map(|l| l.trim().to_lowercase());
        if found.as_deref() != Some(expected.as_str()) {
            return Err(AppError::LabelMismatch {
                index,
                expected: expected.as_str().to_string(),
                found: found.unwrap_or_else(|| "<missing>".to_string()),
            });
        }
    }
    if labels.len() > Category::COUNT {
        return Err(AppError::LabelMismatch {
            index: Category::COUNT,
            expected: "<none>".to_string(),
            found: labels[Category::COUNT].clone(),
        });
    }
    Ok(())
}
