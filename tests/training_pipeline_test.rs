use std::fs;
use std::path::Path;

use tempfile::Builder;

use topica::api::{self, ClassifyRequest};
use topica::corpus::{self, CorpusOptions};
use topica::error::TopicaError;
use topica::pipeline::{TrainConfig, TrainingPipeline, split_corpus};

const TOPICS: [(&str, &[&str]); 3] = [
    (
        "rec.autos",
        &["engine", "brake", "sedan", "clutch", "tire", "dealer", "mileage"],
    ),
    (
        "sci.med",
        &["doctor", "patient", "symptom", "clinic", "therapy", "dosage", "allergy"],
    ),
    (
        "sci.space",
        &["orbit", "shuttle", "galaxy", "telescope", "launch", "nasa", "satellite"],
    ),
];

/// Write a small corpus in the 20 Newsgroups layout.
fn write_corpus(root: &Path, per_label: usize) {
    for (label, words) in TOPICS {
        let dir = root.join(label);
        fs::create_dir_all(&dir).unwrap();
        for i in 0..per_label {
            let body: Vec<&str> = (0..12).map(|j| words[(i * 3 + j * 5) % words.len()]).collect();
            let content = format!(
                "From: poster{i}@example.com\nSubject: post {i}\nLines: 3\n\n{} {i}\n",
                body.join(" ")
            );
            fs::write(dir.join(format!("{}", 50000 + i)), content).unwrap();
        }
    }
}

#[test]
fn test_train_and_classify_from_directory() {
    let dir = Builder::new().prefix("test_pipeline").tempdir().unwrap();
    let data_dir = dir.path().join("20_newsgroups");
    write_corpus(&data_dir, 12);

    let documents = corpus::load_directory(&data_dir, &CorpusOptions::default()).unwrap();
    assert_eq!(documents.len(), 36);
    assert!(documents.iter().all(|d| !d.text.contains("Subject:")));

    let model_path = dir.path().join("models").join("newsgroups.json");
    let config = TrainConfig {
        min_df: 2,
        max_df: Some(0.95),
        eval_split_fraction: 0.25,
        model_path: Some(model_path.clone()),
        ..Default::default()
    };

    let outcome = api::train(documents, &config).unwrap();
    assert_eq!(outcome.model_location, model_path);
    assert_eq!(outcome.report.eval_documents, 9);
    assert_eq!(outcome.report.train_documents, 27);
    assert_eq!(outcome.held_out_accuracy, Some(1.0));
    assert_eq!(outcome.report.evaluation.per_label.len(), 3);

    let response = api::classify("The shuttle launch put a telescope in orbit", &model_path).unwrap();
    assert_eq!(response.category, "sci.space");
    assert!(response.confidence > 0.5);
    assert_eq!(response.processed_text, "shuttle launch put telescope orbit");
    assert!(response.distribution.is_none());

    let request = ClassifyRequest {
        text: "my doctor changed the dosage".to_string(),
        include_distribution: true,
        require_terms: true,
    };
    let response = api::classify_with(&request, &model_path).unwrap();
    assert_eq!(response.category, "sci.med");
    let distribution = response.distribution.unwrap();
    assert_eq!(distribution.len(), 3);
    assert!((distribution.values().sum::<f64>() - 1.0).abs() < 1e-6);
}

#[test]
fn test_train_from_json_lines() {
    let dir = Builder::new().prefix("test_pipeline").tempdir().unwrap();
    let corpus_path = dir.path().join("corpus.jsonl");
    let mut lines = String::new();
    for i in 0..6 {
        lines.push_str(&format!(
            "{{\"text\": \"goalie puck playoffs {i}\", \"label\": \"rec.sport.hockey\"}}\n"
        ));
        lines.push_str(&format!(
            "{{\"text\": \"pitcher inning homerun {i}\", \"label\": \"rec.sport.baseball\"}}\n"
        ));
    }
    fs::write(&corpus_path, lines).unwrap();

    let documents = corpus::load_json(&corpus_path).unwrap();
    let model_path = dir.path().join("sports.json");
    let config = TrainConfig {
        eval_split_fraction: 0.0,
        model_path: Some(model_path.clone()),
        ..Default::default()
    };

    let outcome = api::train(documents, &config).unwrap();
    assert_eq!(outcome.held_out_accuracy, None);

    let response = api::classify("great goalie", &model_path).unwrap();
    assert_eq!(response.category, "rec.sport.hockey");
}

#[test]
fn test_config_file_round_trip() {
    let dir = Builder::new().prefix("test_pipeline").tempdir().unwrap();
    let path = dir.path().join("train.json");
    let config = TrainConfig {
        min_df: 2,
        max_vocab_size: Some(5000),
        labels: Some(vec!["sci.space".to_string(), "sci.med".to_string()]),
        ..Default::default()
    };
    fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

    assert_eq!(TrainConfig::from_file(&path).unwrap(), config);

    fs::write(&path, "{\"min_df\": \"two\"}").unwrap();
    assert!(matches!(
        TrainConfig::from_file(&path),
        Err(TopicaError::InvalidConfig(_))
    ));
}

#[test]
fn test_stratified_split_reproducibility() {
    let dir = Builder::new().prefix("test_pipeline").tempdir().unwrap();
    write_corpus(dir.path(), 10);
    let documents = corpus::load_directory(dir.path(), &CorpusOptions::default()).unwrap();

    let (train_a, eval_a) = split_corpus(documents.clone(), 0.3, 42, true);
    let (train_b, eval_b) = split_corpus(documents.clone(), 0.3, 42, true);
    assert_eq!(train_a, train_b);
    assert_eq!(eval_a, eval_b);

    for (label, _) in TOPICS {
        assert_eq!(eval_a.iter().filter(|d| d.label == label).count(), 3);
    }

    let (_, eval_c) = split_corpus(documents, 0.3, 7, true);
    assert_eq!(eval_c.len(), eval_a.len());
}

#[test]
fn test_failed_training_writes_nothing() {
    let dir = Builder::new().prefix("test_pipeline").tempdir().unwrap();
    let model_path = dir.path().join("model.json");
    let config = TrainConfig {
        labels: Some(vec!["sci.space".to_string(), "sci.med".to_string()]),
        eval_split_fraction: 0.0,
        model_path: Some(model_path.clone()),
        ..Default::default()
    };

    let documents = vec![topica::classifier::LabeledDocument::new(
        "telescope orbit",
        "sci.space",
    )];
    let result = TrainingPipeline::new(config).unwrap().run(documents);

    assert!(matches!(result, Err(TopicaError::UnrepresentedLabel(l)) if l == "sci.med"));
    assert!(!model_path.exists());
}
