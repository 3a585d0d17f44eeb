// src/eligibility/test_support.rs
//! Small in-memory model, taxonomy and rules shared by the engine tests

use std::collections::BTreeSet;
use std::sync::Arc;

use super::annotator::{default_given_names, Annotator, LanguageModel, PosTagger, WordVectors};
use super::taxonomy::EntityTaxonomy;
use super::translator::NoopTranslator;
use super::EligibilityEngine;
use crate::config::{CheckWords, RuleConfiguration};

pub fn sample_taxonomy() -> EntityTaxonomy {
    EntityTaxonomy::from_categories(vec![
        (
            "Programming Language",
            vec!["python", "java", "scala", "php", "javascript", "c++", "rust"],
        ),
        (
            "Backend Web Framework",
            vec!["django", "flask", "spring", "spring boot", "laravel"],
        ),
        ("Language", vec!["english", "german", "french", "spanish"]),
        ("Role Experience", vec!["senior", "lead", "junior"]),
        ("Automation Server", vec!["jenkins"]),
        ("In-Memory Data Store", vec!["redis"]),
        ("Cloud Platform", vec!["aws", "gcp"]),
    ])
}

pub fn sample_vectors() -> WordVectors {
    WordVectors::from_pairs(vec![
        ("many", vec![1.0, 0.0, 0.0, 0.0]),
        ("multiple", vec![0.9, 0.2, 0.0, 0.0]),
        ("several", vec![0.85, 0.3, 0.0, 0.0]),
        ("strong", vec![0.0, 1.0, 0.0, 0.0]),
        ("solid", vec![0.1, 0.95, 0.0, 0.0]),
        ("extensive", vec![0.2, 0.9, 0.1, 0.0]),
        ("fluent", vec![0.0, 0.0, 1.0, 0.0]),
        ("native", vec![0.0, 0.0, 0.9, 0.3]),
        ("fluency", vec![0.0, 0.1, 0.95, 0.1]),
        ("proficiency", vec![0.0, 0.2, 0.9, 0.1]),
        ("required", vec![0.0, 0.0, 0.0, 1.0]),
        ("mandatory", vec![0.0, 0.0, 0.1, 0.95]),
        ("plus", vec![0.5, 0.5, 0.0, 0.0]),
        ("nice", vec![0.4, 0.3, 0.0, 0.1]),
        ("team", vec![0.3, 0.1, 0.0, 0.0]),
    ])
}

pub fn sample_model() -> LanguageModel {
    LanguageModel::new(PosTagger::new(), sample_vectors(), default_given_names())
}

pub fn sample_annotator() -> Annotator {
    Annotator::new(sample_model(), &sample_taxonomy())
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|i| i.to_string()).collect()
}

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|i| i.to_string()).collect()
}

pub fn sample_rules() -> RuleConfiguration {
    RuleConfiguration {
        fluent_languages: set(&["english", "spanish"]),
        check_words: CheckWords {
            adj: words(&["fluent", "native"]),
            noun: words(&["fluency", "proficiency"]),
            propn: Vec::new(),
            verb: words(&["required", "speak"]),
            adv: words(&["fluently"]),
        },
        similarity_threshold: 0.7,
        seniority_blocklist: set(&["senior", "lead"]),
        experience_year_cap: 3,
        disqualifying_tech_categories: set(&["Automation Server"]),
        known_programming_languages: set(&["python", "sql"]),
        known_backend_frameworks: set(&["django", "flask"]),
    }
}

pub fn sample_engine(rules: RuleConfiguration) -> EligibilityEngine {
    let taxonomy = Arc::new(sample_taxonomy());
    let annotator = Arc::new(Annotator::new(sample_model(), &taxonomy));
    EligibilityEngine::new(annotator, taxonomy, Arc::new(rules), Arc::new(NoopTranslator))
}
