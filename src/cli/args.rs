//! Command line argument parsing for the Topica CLI using clap.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::pipeline::TrainConfig;

/// Topica - topic classification with multinomial Naive Bayes
#[derive(Parser, Debug, Clone)]
#[command(name = "topica")]
#[command(about = "Train and apply Naive Bayes topic classifiers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct TopicaArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl TopicaArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a model from a labeled corpus
    Train(TrainArgs),

    /// Classify text with a trained model
    Classify(ClassifyArgs),

    /// Summarize a trained model
    Inspect(InspectArgs),
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
#[command(group(ArgGroup::new("corpus").required(true).args(["data_dir", "jsonl"])))]
pub struct TrainArgs {
    /// Corpus directory with one subdirectory per category
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Corpus file (JSON array or JSON Lines of {"text", "label"})
    #[arg(long, value_name = "FILE")]
    pub jsonl: Option<PathBuf>,

    /// Where to write the model
    #[arg(short, long, value_name = "PATH")]
    pub model: PathBuf,

    /// Training configuration file (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Minimum document frequency of a vocabulary term
    #[arg(long)]
    pub min_df: Option<usize>,

    /// Maximum document frequency of a vocabulary term, as a fraction
    #[arg(long)]
    pub max_df: Option<f64>,

    /// Maximum vocabulary size
    #[arg(long)]
    pub max_vocab_size: Option<usize>,

    /// Additive smoothing constant
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Fraction of documents held out for evaluation
    #[arg(long)]
    pub eval_split: Option<f64>,

    /// Seed of the train/eval shuffle
    #[arg(long)]
    pub seed: Option<u64>,

    /// Read at most this many documents per category
    #[arg(long)]
    pub max_per_label: Option<usize>,

    /// Keep mail headers in corpus documents
    #[arg(long)]
    pub keep_headers: bool,

    /// Split without stratifying by category
    #[arg(long)]
    pub no_stratify: bool,
}

impl TrainArgs {
    /// Apply the command line overrides to a base configuration.
    pub fn apply(&self, mut config: TrainConfig) -> TrainConfig {
        if let Some(min_df) = self.min_df {
            config.min_df = min_df;
        }
        if self.max_df.is_some() {
            config.max_df = self.max_df;
        }
        if self.max_vocab_size.is_some() {
            config.max_vocab_size = self.max_vocab_size;
        }
        if let Some(alpha) = self.alpha {
            config.smoothing_alpha = alpha;
        }
        if let Some(eval_split) = self.eval_split {
            config.eval_split_fraction = eval_split;
        }
        if let Some(seed) = self.seed {
            config.random_seed = seed;
        }
        if self.no_stratify {
            config.stratify = false;
        }
        config.model_path = Some(self.model.clone());
        config
    }
}

/// Arguments for classification
#[derive(Parser, Debug, Clone)]
pub struct ClassifyArgs {
    /// Path to the model file
    #[arg(short, long, value_name = "PATH")]
    pub model: PathBuf,

    /// Include the probability of every category
    #[arg(long)]
    pub distribution: bool,

    /// Fail when the text contains no classifiable terms
    #[arg(long)]
    pub require_terms: bool,

    /// Text to classify (read from stdin when absent)
    #[arg(value_name = "TEXT")]
    pub text: Vec<String>,
}

/// Arguments for model inspection
#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// Path to the model file
    #[arg(short, long, value_name = "PATH")]
    pub model: PathBuf,

    /// Number of top terms to list per category
    #[arg(long, default_value = "10")]
    pub top: usize,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_train_command() {
        let args = TopicaArgs::try_parse_from([
            "topica",
            "train",
            "--data-dir",
            "20_newsgroups",
            "--model",
            "model.json",
            "--min-df",
            "2",
            "--max-df",
            "0.95",
            "--max-per-label",
            "100",
            "--no-stratify",
        ])
        .unwrap();

        if let Command::Train(train_args) = args.command {
            assert_eq!(train_args.data_dir, Some(PathBuf::from("20_newsgroups")));
            assert_eq!(train_args.max_per_label, Some(100));

            let config = train_args.apply(TrainConfig::default());
            assert_eq!(config.min_df, 2);
            assert_eq!(config.max_df, Some(0.95));
            assert!(!config.stratify);
            assert_eq!(config.random_seed, 42);
            assert_eq!(config.model_path, Some(PathBuf::from("model.json")));
        } else {
            panic!("Expected Train command");
        }
    }

    #[test]
    fn test_train_requires_a_corpus() {
        let result = TopicaArgs::try_parse_from(["topica", "train", "--model", "m.json"]);
        assert!(result.is_err());

        let result = TopicaArgs::try_parse_from([
            "topica", "train", "--data-dir", "d", "--jsonl", "f", "--model", "m.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_classify_command() {
        let args = TopicaArgs::try_parse_from([
            "topica",
            "classify",
            "--model",
            "model.json",
            "--distribution",
            "telescope",
            "mission",
            "-f",
            "json",
        ])
        .unwrap();

        assert_eq!(args.output_format, OutputFormat::Json);
        if let Command::Classify(classify_args) = args.command {
            assert!(classify_args.distribution);
            assert!(!classify_args.require_terms);
            assert_eq!(classify_args.text, vec!["telescope", "mission"]);
        } else {
            panic!("Expected Classify command");
        }
    }

    #[test]
    fn test_verbosity_levels() {
        let args = TopicaArgs::try_parse_from(["topica", "inspect", "-m", "x"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        let args = TopicaArgs::try_parse_from(["topica", "-vvv", "inspect", "-m", "x"]).unwrap();
        assert_eq!(args.verbosity(), 3);

        let args = TopicaArgs::try_parse_from(["topica", "-q", "-v", "inspect", "-m", "x"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }
}
