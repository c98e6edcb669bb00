use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "waste-sort", version, about = "Classify waste photos and print disposal advice")]
pub struct Cli {
    /// JSON config file; flags below take precedence over it
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Classify image uploads (files or directories) within one session
    Classify {
        #[command(flatten)]
        model: ModelArgs,

        /// Emit one JSON document instead of result cards
        #[arg(long)]
        json: bool,

        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Load the model and report its inputs, outputs and label check
    Status {
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Print the advisory table and the override policy
    Table,
}

#[derive(Debug, Args, Default)]
pub struct ModelArgs {
    /// Path to the ONNX classifier
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Model config JSON with an id2label map to verify the category order
    #[arg(long)]
    pub labels: Option<PathBuf>,

    /// Run on CPU even if the config enables GPU providers
    #[arg(long)]
    pub cpu: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_classify_with_flags() {
        let cli = Cli::try_parse_from([
            "waste-sort",
            "-vv",
            "classify",
            "--model",
            "m.onnx",
            "--json",
            "a.jpg",
            "uploads",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Classify { model, json, inputs } => {
                assert_eq!(model.model, Some(PathBuf::from("m.onnx")));
                assert!(json);
                assert_eq!(inputs, vec![PathBuf::from("a.jpg"), PathBuf::from("uploads")]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn classify_requires_inputs() {
        assert!(Cli::try_parse_from(["waste-sort", "classify"]).is_err());
    }
}
