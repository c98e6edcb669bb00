pub mod cli;
pub mod commands;
pub mod error;
pub mod models;
pub mod services;

use clap::Parser;
use cli::{Cli, Commands};
use error::AppError;
use std::io::Write;
use std::process::ExitCode;

pub use models::advisory_types::{AdvisoryRecord, WasteType};
pub use models::category::Category;
pub use models::classify_types::{ClassificationResult, Report};
pub use models::fs_types::Upload;
pub use models::session_types::{RecordOutcome, SessionStats, UploadId};
pub use services::advisory::{AdvisoryResolver, OverridePolicy};
pub use services::classifier::model_manager::{OnnxModel, ScoreModel};
pub use services::classifier::Classifier;
pub use services::config_service::AppConfig;
pub use services::pipeline::AdvisoryPipeline;
pub use services::session::Session;

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: Cli) -> Result<(), AppError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Classify {
            model,
            json,
            inputs,
        } => {
            let config = commands::resolve_config(cli.config.as_deref(), &model)?;
            let (onnx, _) = commands::load_model(&config)?;
            let pipeline = commands::build_pipeline(&config, onnx);
            let summary = commands::classify::classify_uploads(&pipeline, &inputs)?;
            commands::classify::render_summary(&mut out, &summary, json)?;
        }
        Commands::Status { model } => {
            let config = commands::resolve_config(cli.config.as_deref(), &model)?;
            let (onnx, labels_verified) = commands::load_model(&config)?;
            commands::status::render_status(&mut out, &onnx.status(labels_verified))?;
        }
        Commands::Table => {
            let config = match &cli.config {
                Some(path) => AppConfig::load(path)?,
                None => AppConfig::default(),
            };
            commands::table::render_table(&mut out, &config.override_policy)?;
        }
    }

    out.flush()?;
    Ok(())
}
