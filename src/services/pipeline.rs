use crate::error::AppError;
use crate::models::classify_types::Report;
use crate::models::fs_types::Upload;
use crate::services::advisory::AdvisoryResolver;
use crate::services::classifier::Classifier;
use crate::services::session::Session;
use tracing::info;

/// Upload in, advisory out: classify, resolve, then count it in the session.
#[derive(Clone)]
pub struct AdvisoryPipeline {
    classifier: Classifier,
    resolver: AdvisoryResolver,
}

impl AdvisoryPipeline {
    pub fn new(classifier: Classifier, resolver: AdvisoryResolver) -> Self {
        Self {
            classifier,
            resolver,
        }
    }

    /// A failed classification returns the error and leaves `session` untouched.
    pub fn process(&self, session: &mut Session, upload: &Upload) -> Result<Report, AppError> {
        let result = self.classifier.classify(&upload.bytes)?;
        let advisory = self.resolver.resolve(result.label, result.confidence);
        let outcome = session.record(&upload.id, &advisory);

        info!(
            "{}: {} at {} -> {}",
            upload.name,
            result.label,
            result.confidence_percent(),
            advisory.waste_type
        );

        Ok(Report {
            file_name: upload.name.clone(),
            file_path: upload.path.clone(),
            result,
            advisory,
            outcome,
        })
    }
}
