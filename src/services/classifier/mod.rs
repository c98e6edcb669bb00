pub mod inference;
pub mod model_manager;

use crate::error::AppError;
use crate::models::classify_types::ClassificationResult;
use inference::TensorLayout;
use model_manager::ScoreModel;
use ndarray::Array4;
use std::sync::Arc;
use tracing::debug;

/// Turns upload bytes into a top-1 category and confidence.
///
/// Cloning is cheap; every clone shares the same loaded model.
#[derive(Clone)]
pub struct Classifier {
    model: Arc<dyn ScoreModel>,
    input_size: u32,
    layout: TensorLayout,
    apply_softmax: bool,
}

impl Classifier {
    pub fn new(
        model: Arc<dyn ScoreModel>,
        input_size: u32,
        layout: TensorLayout,
        apply_softmax: bool,
    ) -> Self {
        Self {
            model,
            input_size,
            layout,
            apply_softmax,
        }
    }

    pub fn classify(&self, image_bytes: &[u8]) -> Result<ClassificationResult, AppError> {
        let tensor = inference::preprocess_bytes(image_bytes, self.input_size, self.layout)?;
        self.classify_tensor(tensor)
    }

    pub fn classify_tensor(&self, tensor: Array4<f32>) -> Result<ClassificationResult, AppError> {
        let scores = self.model.predict(tensor)?;
        let scores = if self.apply_softmax {
            inference::softmax(&scores)
        } else {
            scores
        };
        let result = inference::top1(&scores)?;
        debug!("Classified as {} ({:.4})", result.label, result.confidence);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::category::Category;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedScores {
        scores: Vec<f32>,
        calls: AtomicUsize,
    }

    impl ScoreModel for FixedScores {
        fn predict(&self, input: Array4<f32>) -> Result<Vec<f32>, AppError> {
            assert_eq!(input.shape(), &[1, 8, 8, 3]);
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(self.scores.clone())
        }
    }

    fn classifier(scores: Vec<f32>, apply_softmax: bool) -> (Classifier, Arc<FixedScores>) {
        let model = Arc::new(FixedScores {
            scores,
            calls: AtomicUsize::new(0),
        });
        let classifier = Classifier::new(model.clone(), 8, TensorLayout::Nhwc, apply_softmax);
        (classifier, model)
    }

    #[test]
    fn decode_failure_never_reaches_the_model() {
        let (classifier, model) = classifier(vec![0.1; 10], false);
        let err = classifier.classify(b"GIF89a-truncated").unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
        assert_eq!(model.calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn softmax_is_applied_to_logits_when_configured() {
        let mut logits = vec![0.0f32; 10];
        logits[4] = 5.0;
        let (classifier, _) = classifier(logits, true);
        let result = classifier
            .classify_tensor(Array4::zeros((1, 8, 8, 3)))
            .unwrap();
        assert_eq!(result.label, Category::Glass);
        assert!(result.confidence > 0.9 && result.confidence <= 1.0);
    }

    #[test]
    fn clones_share_one_model() {
        let (classifier, model) = classifier(vec![0.1; 10], false);
        let other = classifier.clone();
        classifier.classify_tensor(Array4::zeros((1, 8, 8, 3))).unwrap();
        other.classify_tensor(Array4::zeros((1, 8, 8, 3))).unwrap();
        assert_eq!(model.calls.load(Ordering::Relaxed), 2);
        assert_eq!(Arc::strong_count(&model), 3);
    }
}
