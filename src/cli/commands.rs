//! Command implementations for the Topica CLI.

use std::collections::HashMap;
use std::io::{self, Read};

use log::info;

use crate::api::{self, ClassifyRequest};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::classifier::LabeledDocument;
use crate::corpus::{self, CorpusOptions};
use crate::error::{Result, TopicaError};
use crate::pipeline::TrainConfig;
use crate::store;

/// Execute a CLI command.
pub fn execute_command(args: TopicaArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => train_model(train_args, &args),
        Command::Classify(classify_args) => classify_text(classify_args, &args),
        Command::Inspect(inspect_args) => inspect_model(inspect_args, &args),
    }
}

/// Train a model and save it.
fn train_model(args: &TrainArgs, cli_args: &TopicaArgs) -> Result<()> {
    let base = match &args.config {
        Some(path) => {
            info!("Loading training configuration from {}", path.display());
            TrainConfig::from_file(path)?
        }
        None => TrainConfig::default(),
    };
    let config = args.apply(base);

    let documents = match (&args.data_dir, &args.jsonl) {
        (Some(dir), _) => corpus::load_directory(
            dir,
            &CorpusOptions {
                max_per_label: args.max_per_label,
                strip_headers: !args.keep_headers,
            },
        )?,
        (None, Some(path)) => {
            let mut documents = corpus::load_json(path)?;
            if let Some(limit) = args.max_per_label {
                documents = limit_per_label(documents, limit);
            }
            documents
        }
        (None, None) => {
            return Err(TopicaError::invalid_config(
                "either --data-dir or --jsonl is required",
            ));
        }
    };

    let outcome = api::train(documents, &config)?;

    output_result("Model trained successfully", &outcome.report, cli_args)
}

/// Classify text from the command line or stdin.
fn classify_text(args: &ClassifyArgs, cli_args: &TopicaArgs) -> Result<()> {
    let text = if args.text.is_empty() {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        text
    } else {
        args.text.join(" ")
    };

    let request = ClassifyRequest {
        text,
        include_distribution: args.distribution,
        require_terms: args.require_terms,
    };
    let response = api::classify_with(&request, &args.model)?;

    output_result("", &response, cli_args)
}

/// Summarize a persisted model.
fn inspect_model(args: &InspectArgs, cli_args: &TopicaArgs) -> Result<()> {
    let model = store::load(&args.model)?;
    let summary = ModelSummary::from_model(&model, args.top);

    output_result(
        &format!("Model at {}", args.model.display()),
        &summary,
        cli_args,
    )
}

/// Keep at most `limit` documents per label, in corpus order.
fn limit_per_label(documents: Vec<LabeledDocument>, limit: usize) -> Vec<LabeledDocument> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    documents
        .into_iter()
        .filter(|doc| {
            let count = seen.entry(doc.label.clone()).or_insert(0);
            *count += 1;
            *count <= limit
        })
        .collect()
}
