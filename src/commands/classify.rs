use crate::error::AppError;
use crate::models::advisory_types::WasteType;
use crate::models::category::Category;
use crate::models::classify_types::Report;
use crate::models::session_types::{RecordOutcome, SessionStats};
use crate::services::fs_service;
use crate::services::pipeline::AdvisoryPipeline;
use crate::services::session::Session;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Serialize)]
pub struct UploadError {
    pub file: String,
    pub error: AppError,
}

#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub reports: Vec<Report>,
    pub errors: Vec<UploadError>,
    pub stats: SessionStats,
}

/// Runs every input through the pipeline inside a single session.
///
/// Uploads that cannot be read or decoded are collected and skipped. Model
/// failures abort the run.
pub fn classify_uploads(
    pipeline: &AdvisoryPipeline,
    inputs: &[PathBuf],
) -> Result<SessionSummary, AppError> {
    let mut session = Session::new();
    let mut reports = Vec::new();
    let mut errors = Vec::new();

    for path in fs_service::collect_inputs(inputs)? {
        let upload = match fs_service::read_upload(&path) {
            Ok(upload) => upload,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                errors.push(UploadError {
                    file: display_name(&path),
                    error: e,
                });
                continue;
            }
        };

        match pipeline.process(&mut session, &upload) {
            Ok(report) => reports.push(report),
            Err(e) if e.is_recoverable() => {
                warn!("Skipping {}: {}", path.display(), e);
                errors.push(UploadError {
                    file: display_name(&path),
                    error: e,
                });
            }
            Err(e) => return Err(e),
        }
    }

    Ok(SessionSummary {
        reports,
        errors,
        stats: session.into_stats(),
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn render_card<W: Write>(out: &mut W, report: &Report) -> std::io::Result<()> {
    match &report.file_path {
        Some(path) => writeln!(out, "== {} ({}) ==", report.file_name, path.display())?,
        None => writeln!(out, "== {} ==", report.file_name)?,
    }
    writeln!(out, "Predicted Waste: {}", report.display_label())?;
    writeln!(out, "Confidence: {}", report.confidence_percent())?;
    writeln!(out, "Type: {}", report.advisory.waste_type)?;
    writeln!(out, "{}", report.advisory.message)?;
    writeln!(out, "Recommended Action: {}", report.advisory.action)?;
    if report.outcome == RecordOutcome::Duplicate {
        writeln!(out, "(same upload as before, not counted again)")?;
    }
    writeln!(out)
}

pub fn render_stats<W: Write>(out: &mut W, stats: &SessionStats) -> std::io::Result<()> {
    writeln!(out, "Session total: {}", stats.total)?;
    for waste_type in WasteType::ALL {
        writeln!(out, "  {:<11} {}", waste_type, stats.waste_type_count(waste_type))?;
    }
    let seen: Vec<String> = Category::ALL
        .iter()
        .filter(|c| stats.category_count(**c) > 0)
        .map(|c| format!("{} {}", c, stats.category_count(*c)))
        .collect();
    if !seen.is_empty() {
        writeln!(out, "  by category: {}", seen.join(", "))?;
    }
    Ok(())
}

pub fn render_summary<W: Write>(
    out: &mut W,
    summary: &SessionSummary,
    json: bool,
) -> Result<(), AppError> {
    if json {
        serde_json::to_writer_pretty(&mut *out, summary).map_err(std::io::Error::from)?;
        writeln!(out)?;
        return Ok(());
    }

    for report in &summary.reports {
        render_card(out, report)?;
    }
    for failure in &summary.errors {
        writeln!(out, "!! {}: {}", failure.file, failure.error)?;
        if failure.error.is_recoverable() {
            writeln!(out, "   Please upload a valid .jpg, .jpeg or .png image.")?;
        }
    }
    if !summary.errors.is_empty() {
        writeln!(out)?;
    }
    render_stats(out, &summary.stats)?;
    Ok(())
}
