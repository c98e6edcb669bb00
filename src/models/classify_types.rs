use crate::models::advisory_types::AdvisoryRecord;
use crate::models::category::Category;
use crate::models::session_types::RecordOutcome;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize, Clone)]
pub struct ModelStatus {
    pub model_path: PathBuf,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub labels_verified: bool,
}

/// Top-1 classifier output for one image. `confidence` is a probability in `[0, 1]`.
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct ClassificationResult {
    pub label: Category,
    pub confidence: f32,
}

impl ClassificationResult {
    pub fn confidence_percent(&self) -> String {
        format!("{:.2}%", self.confidence * 100.0)
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct Report {
    pub file_name: String,
    pub file_path: Option<PathBuf>,
    pub result: ClassificationResult,
    pub advisory: AdvisoryRecord,
    pub outcome: RecordOutcome,
}

impl Report {
    pub fn display_label(&self) -> String {
        self.result.label.display_label()
    }

    pub fn confidence_percent(&self) -> String {
        self.result.confidence_percent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_renders_with_two_decimals() {
        let result = ClassificationResult {
            label: Category::Paper,
            confidence: 0.9876,
        };
        assert_eq!(result.confidence_percent(), "98.76%");

        let result = ClassificationResult {
            label: Category::Paper,
            confidence: 0.5,
        };
        assert_eq!(result.confidence_percent(), "50.00%");
    }
}
