use crate::models::advisory_types::AdvisoryRecord;
use crate::models::session_types::{RecordOutcome, SessionStats, UploadId};
use tracing::debug;

/// One user's interaction lifetime. Owns its counters; nothing is shared
/// between sessions, so concurrent sessions cannot see each other's totals.
#[derive(Debug, Default)]
pub struct Session {
    stats: SessionStats,
    last_upload: Option<UploadId>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Counts a classified upload once. Recording the same upload again right
    /// after it was counted (a re-render) leaves the counters unchanged.
    pub fn record(&mut self, upload: &UploadId, advisory: &AdvisoryRecord) -> RecordOutcome {
        if self.last_upload.as_ref() == Some(upload) {
            debug!("Skipping re-render of {}", upload);
            return RecordOutcome::Duplicate;
        }

        self.stats.total += 1;
        *self.stats.by_waste_type.entry(advisory.waste_type).or_insert(0) += 1;
        *self.stats.by_category.entry(advisory.category).or_insert(0) += 1;
        self.last_upload = Some(upload.clone());

        debug!(
            "Recorded {} as {} (session total {})",
            upload, advisory.waste_type, self.stats.total
        );
        RecordOutcome::Counted
    }

    pub fn into_stats(self) -> SessionStats {
        self.stats
    }
}
