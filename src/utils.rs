// src/utils.rs
use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::LazyLock;

static INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("integer regex should compile"));

/// Normalize a language name or code to its ISO 639-1 code; unknown values
/// are returned trimmed and lowercased
pub fn normalize_language_code(lang: &str) -> String {
    let lower = lang.trim().to_lowercase();
    match lower.as_str() {
        "en" | "eng" | "english" | "anglais" => "en".to_string(),
        "fr" | "fra" | "french" | "français" => "fr".to_string(),
        "es" | "spa" | "spanish" | "español" => "es".to_string(),
        "de" | "deu" | "german" | "deutsch" => "de".to_string(),
        "it" | "ita" | "italian" | "italiano" => "it".to_string(),
        "pt" | "por" | "portuguese" | "português" => "pt".to_string(),
        "nl" | "nld" | "dutch" | "nederlands" => "nl".to_string(),
        _ => lower,
    }
}

/// SHA-256 hex digest used to deduplicate re-scraped descriptions
pub fn content_hash(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}

/// Collapse runs of whitespace into single spaces
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First integer in a string, e.g. the count in "87 applicants"
pub fn first_integer(text: &str) -> Option<i64> {
    INTEGER_RE
        .find(text)
        .and_then(|m| m.as_str().parse::<i64>().ok())
}
