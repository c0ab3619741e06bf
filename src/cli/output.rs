//! Output formatting for CLI commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::ClassifyResponse;
use crate::cli::args::{OutputFormat, TopicaArgs};
use crate::classifier::model::Model;
use crate::error::Result;
use crate::pipeline::TrainingReport;
use crate::store::FORMAT_VERSION;

/// Summary of one category of a model.
#[derive(Debug, Serialize, Deserialize)]
pub struct LabelSummary {
    pub label: String,
    pub prior: f64,
    pub documents: usize,
    pub top_terms: Vec<(String, f64)>,
}

/// Summary of a persisted model.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelSummary {
    pub format_version: u32,
    pub documents: usize,
    pub vocabulary_size: usize,
    pub smoothing_alpha: f64,
    pub trained_at: DateTime<Utc>,
    pub labels: Vec<LabelSummary>,
}

impl ModelSummary {
    /// Summarize a model, listing the `top` most likely terms per label.
    pub fn from_model(model: &Model, top: usize) -> Self {
        let priors = model.priors();
        let labels = model
            .labels()
            .iter()
            .enumerate()
            .map(|(index, label)| LabelSummary {
                label: label.to_string(),
                prior: priors[index],
                documents: model.metadata().label_documents[index],
                top_terms: model
                    .top_terms(index, top)
                    .into_iter()
                    .map(|(term, log_p)| (term.to_string(), log_p.exp()))
                    .collect(),
            })
            .collect();

        Self {
            format_version: FORMAT_VERSION,
            documents: model.metadata().documents,
            vocabulary_size: model.vocabulary().len(),
            smoothing_alpha: model.smoothing_alpha(),
            trained_at: model.metadata().trained_at,
            labels,
        }
    }
}

/// Results that know how to print themselves for a terminal.
pub trait HumanOutput {
    fn print_human(&self);
}

impl HumanOutput for TrainingReport {
    fn print_human(&self) {
        if let Some(location) = &self.model_location {
            println!("Model: {}", location.display());
        }
        println!(
            "Documents: {} training, {} held out, {} skipped",
            self.train_documents, self.eval_documents, self.skipped_documents
        );
        println!("Labels: {}", self.labels.len());
        println!("Vocabulary: {} terms", self.vocabulary_size);
        println!();
        print!("{}", self.evaluation);
    }
}

impl HumanOutput for ClassifyResponse {
    fn print_human(&self) {
        println!("Category: {}", self.category);
        println!("Confidence: {:.4}", self.confidence);
        println!("Terms: {}", self.processed_text);
        if let Some(distribution) = &self.distribution {
            println!("Distribution:");
            for (label, p) in distribution {
                println!("  {label:<28} {p:.4}");
            }
        }
    }
}

impl HumanOutput for ModelSummary {
    fn print_human(&self) {
        println!("Format version: {}", self.format_version);
        println!("Trained at: {}", self.trained_at.to_rfc3339());
        println!("Documents: {}", self.documents);
        println!("Vocabulary: {} terms", self.vocabulary_size);
        println!("Smoothing alpha: {}", self.smoothing_alpha);
        for label in &self.labels {
            println!();
            println!(
                "{} (prior {:.4}, {} documents)",
                label.label, label.prior, label.documents
            );
            let terms = label
                .top_terms
                .iter()
                .map(|(term, p)| format!("{term} ({p:.4})"))
                .collect::<Vec<_>>()
                .join(", ");
            println!("  {terms}");
        }
    }
}

/// Output a result in the specified format.
pub fn output_result<T>(message: &str, result: &T, args: &TopicaArgs) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    match args.output_format {
        OutputFormat::Human => {
            output_human(message, result, args);
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: HumanOutput>(message: &str, result: &T, args: &TopicaArgs) {
    if args.verbosity() > 0 && !message.is_empty() {
        println!("{message}");
        println!();
    }
    result.print_human();
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &TopicaArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}
