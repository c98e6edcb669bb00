use serde::{Serialize, Serializer};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Upload bytes are not a decodable raster image.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// The classifier model could not be loaded. Nothing can be served without it.
    #[error("Model unavailable at {}: {reason}", .path.display())]
    ModelUnavailable { path: PathBuf, reason: String },

    #[error("Model label {index} is {found:?}, expected {expected:?}")]
    LabelMismatch {
        index: usize,
        expected: String,
        found: String,
    },

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Unsupported upload {}: expected .jpg, .jpeg or .png", .0.display())]
    UnsupportedUpload(PathBuf),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Per-upload failures the caller can report and move past.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AppError::Decode(_) | AppError::UnsupportedUpload(_))
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::Decode(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl Serialize for AppError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_upload_errors_are_recoverable() {
        assert!(AppError::Decode("bad header".into()).is_recoverable());
        assert!(AppError::UnsupportedUpload(PathBuf::from("a.gif")).is_recoverable());
        assert!(!AppError::Inference("boom".into()).is_recoverable());
        assert!(!AppError::ModelUnavailable {
            path: PathBuf::from("m.onnx"),
            reason: "missing".into(),
        }
        .is_recoverable());
    }

    #[test]
    fn serializes_as_message() {
        let err = AppError::UnsupportedUpload(PathBuf::from("scan.gif"));
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(
            json,
            "\"Unsupported upload scan.gif: expected .jpg, .jpeg or .png\""
        );
    }
}
