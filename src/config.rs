// src/config.rs
//! Eligibility rules and user options loaded from the rules file

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::eligibility::PartOfSpeech;

pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.7;
pub const DEFAULT_EXPERIENCE_YEAR_CAP: u32 = 3;

/// Words probed around a language entity, grouped by part of speech.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckWords {
    pub adj: Vec<String>,
    pub noun: Vec<String>,
    pub propn: Vec<String>,
    pub verb: Vec<String>,
    pub adv: Vec<String>,
}

impl CheckWords {
    pub const CLASSES: [PartOfSpeech; 5] = [
        PartOfSpeech::Adjective,
        PartOfSpeech::Noun,
        PartOfSpeech::ProperNoun,
        PartOfSpeech::Verb,
        PartOfSpeech::Adverb,
    ];

    pub fn for_pos(&self, pos: PartOfSpeech) -> &[String] {
        match pos {
            PartOfSpeech::Adjective => &self.adj,
            PartOfSpeech::Noun => &self.noun,
            PartOfSpeech::ProperNoun => &self.propn,
            PartOfSpeech::Verb => &self.verb,
            PartOfSpeech::Adverb => &self.adv,
            PartOfSpeech::Punctuation | PartOfSpeech::Other => &[],
        }
    }
}

/// Read-only eligibility rules handed to every checker.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleConfiguration {
    pub fluent_languages: BTreeSet<String>,
    pub check_words: CheckWords,
    pub similarity_threshold: f32,
    pub seniority_blocklist: BTreeSet<String>,
    pub experience_year_cap: u32,
    pub disqualifying_tech_categories: BTreeSet<String>,
    pub known_programming_languages: BTreeSet<String>,
    pub known_backend_frameworks: BTreeSet<String>,
}

impl Default for RuleConfiguration {
    fn default() -> Self {
        Self {
            fluent_languages: BTreeSet::from(["english".to_string()]),
            check_words: CheckWords::default(),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            seniority_blocklist: BTreeSet::new(),
            experience_year_cap: DEFAULT_EXPERIENCE_YEAR_CAP,
            disqualifying_tech_categories: BTreeSet::new(),
            known_programming_languages: BTreeSet::new(),
            known_backend_frameworks: BTreeSet::new(),
        }
    }
}

/// What to do with analyzed jobs.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    pub save_to_json_file: bool,
    pub save_to_database: bool,
    pub use_easy_apply: bool,
    pub max_concurrent_jobs: usize,
    pub positions: Vec<String>,
    pub countries: Vec<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            save_to_json_file: true,
            save_to_database: false,
            use_easy_apply: false,
            max_concurrent_jobs: 4,
            positions: Vec::new(),
            countries: Vec::new(),
        }
    }
}

/// Translation service endpoint; translation is disabled without a URL.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatorSettings {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for TranslatorSettings {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Everything the rules file provides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RulesFile {
    pub rules: RuleConfiguration,
    pub options: SearchOptions,
    pub translator: TranslatorSettings,
}

// ===== On-disk layout =====

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRulesFile {
    languages_user_speak_fluently: RawLanguages,
    words_check_language_check: RawCheckWords,
    experience: RawExperience,
    technologies: RawTechnologies,
    options: RawOptions,
    user_search: RawUserSearch,
    translator: RawTranslator,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLanguages {
    #[serde(deserialize_with = "list")]
    languages: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawCheckWords {
    #[serde(deserialize_with = "list")]
    adj_to_check: Vec<String>,
    #[serde(deserialize_with = "list")]
    noun_to_check: Vec<String>,
    #[serde(deserialize_with = "list")]
    propn_to_check: Vec<String>,
    #[serde(deserialize_with = "list")]
    verb_to_check: Vec<String>,
    #[serde(deserialize_with = "list")]
    adv_to_check: Vec<String>,
    similarity_threshold: f32,
}

impl Default for RawCheckWords {
    fn default() -> Self {
        Self {
            adj_to_check: Vec::new(),
            noun_to_check: Vec::new(),
            propn_to_check: Vec::new(),
            verb_to_check: Vec::new(),
            adv_to_check: Vec::new(),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawExperience {
    #[serde(deserialize_with = "list")]
    seniority_do_not_apply: Vec<String>,
    experience_max_year_threshold: u32,
}

impl Default for RawExperience {
    fn default() -> Self {
        Self {
            seniority_do_not_apply: Vec::new(),
            experience_max_year_threshold: DEFAULT_EXPERIENCE_YEAR_CAP,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTechnologies {
    #[serde(deserialize_with = "list")]
    entities_do_not_apply: Vec<String>,
    #[serde(deserialize_with = "list")]
    programming_languages_apply: Vec<String>,
    #[serde(deserialize_with = "list")]
    backend_frameworks_apply: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawOptions {
    save_to_json_file: bool,
    save_to_database: bool,
    use_easy_apply: bool,
    max_concurrent_jobs: usize,
}

impl Default for RawOptions {
    fn default() -> Self {
        let defaults = SearchOptions::default();
        Self {
            save_to_json_file: defaults.save_to_json_file,
            save_to_database: defaults.save_to_database,
            use_easy_apply: defaults.use_easy_apply,
            max_concurrent_jobs: defaults.max_concurrent_jobs,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawUserSearch {
    #[serde(deserialize_with = "list")]
    positions: Vec<String>,
    #[serde(deserialize_with = "list")]
    countries: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawTranslator {
    url: String,
    api_key: String,
    timeout_seconds: u64,
}

impl Default for RawTranslator {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            timeout_seconds: 10,
        }
    }
}

/// Accept either `"a, b, c"` or `["a", "b", "c"]`
fn list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListValue {
        Joined(String),
        Items(Vec<String>),
    }

    let items = match ListValue::deserialize(deserializer)? {
        ListValue::Joined(joined) => joined.split(',').map(str::to_string).collect(),
        ListValue::Items(items) => items,
    };

    Ok(items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect())
}

fn lowercase_set(items: Vec<String>) -> BTreeSet<String> {
    items.into_iter().map(|i| i.to_lowercase()).collect()
}

fn lowercase_vec(items: Vec<String>) -> Vec<String> {
    items.into_iter().map(|i| i.to_lowercase()).collect()
}

fn non_empty(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

impl RulesFile {
    /// Load a `.toml`, `.yaml` or `.yml` rules file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rules file: {}", path.display()))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        let rules = match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Self::from_toml_str(&content),
        }
        .with_context(|| format!("Invalid rules file: {}", path.display()))?;

        info!(
            "Loaded rules from {}: {} fluent languages, year cap {}, threshold {}",
            path.display(),
            rules.rules.fluent_languages.len(),
            rules.rules.experience_year_cap,
            rules.rules.similarity_threshold
        );
        Ok(rules)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawRulesFile = toml::from_str(content).context("Failed to parse TOML rules")?;
        Self::from_raw(raw)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let raw: RawRulesFile =
            serde_yaml::from_str(content).context("Failed to parse YAML rules")?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawRulesFile) -> Result<Self> {
        let threshold = raw.words_check_language_check.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            anyhow::bail!(
                "similarity_threshold must be between 0 and 1, got {}",
                threshold
            );
        }
        if raw.options.max_concurrent_jobs == 0 {
            anyhow::bail!("max_concurrent_jobs must be at least 1");
        }

        let words = raw.words_check_language_check;
        let rules = RuleConfiguration {
            fluent_languages: lowercase_set(raw.languages_user_speak_fluently.languages),
            check_words: CheckWords {
                adj: lowercase_vec(words.adj_to_check),
                noun: lowercase_vec(words.noun_to_check),
                propn: lowercase_vec(words.propn_to_check),
                verb: lowercase_vec(words.verb_to_check),
                adv: lowercase_vec(words.adv_to_check),
            },
            similarity_threshold: threshold,
            seniority_blocklist: lowercase_set(raw.experience.seniority_do_not_apply),
            experience_year_cap: raw.experience.experience_max_year_threshold,
            disqualifying_tech_categories: raw.technologies.entities_do_not_apply.into_iter().collect(),
            known_programming_languages: lowercase_set(raw.technologies.programming_languages_apply),
            known_backend_frameworks: lowercase_set(raw.technologies.backend_frameworks_apply),
        };

        let options = SearchOptions {
            save_to_json_file: raw.options.save_to_json_file,
            save_to_database: raw.options.save_to_database,
            use_easy_apply: raw.options.use_easy_apply,
            max_concurrent_jobs: raw.options.max_concurrent_jobs,
            positions: raw.user_search.positions,
            countries: raw.user_search.countries,
        };

        let translator = TranslatorSettings {
            url: non_empty(raw.translator.url),
            api_key: non_empty(raw.translator.api_key),
            timeout: Duration::from_secs(raw.translator.timeout_seconds.max(1)),
        };

        Ok(Self {
            rules,
            options,
            translator,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_TOML: &str = r#"
[languages_user_speak_fluently]
languages = "English, Spanish"

[words_check_language_check]
adj_to_check = "fluent, native"
noun_to_check = ["fluency", " proficiency "]
verb_to_check = "required,speak,"
similarity_threshold = 0.75

[experience]
seniority_do_not_apply = "Senior, lead"
experience_max_year_threshold = 2

[technologies]
entities_do_not_apply = "Automation Server, In-Memory Data Store"
programming_languages_apply = "Python, SQL"
backend_frameworks_apply = ["Django"]

[options]
save_to_database = true
use_easy_apply = true

[translator]
url = "http://localhost:5000"
timeout_seconds = 3
"#;

    #[test]
    fn test_parse_toml_rules() {
        let file = RulesFile::from_toml_str(SAMPLE_TOML).unwrap();
        let rules = &file.rules;

        assert_eq!(
            rules.fluent_languages,
            BTreeSet::from(["english".to_string(), "spanish".to_string()])
        );
        assert_eq!(rules.check_words.adj, vec!["fluent", "native"]);
        assert_eq!(rules.check_words.noun, vec!["fluency", "proficiency"]);
        assert_eq!(rules.check_words.verb, vec!["required", "speak"]);
        assert!(rules.check_words.propn.is_empty());
        assert_eq!(rules.similarity_threshold, 0.75);
        assert!(rules.seniority_blocklist.contains("senior"));
        assert_eq!(rules.experience_year_cap, 2);
        assert!(rules
            .disqualifying_tech_categories
            .contains("In-Memory Data Store"));
        assert!(rules.known_programming_languages.contains("sql"));
        assert!(rules.known_backend_frameworks.contains("django"));

        assert!(file.options.save_to_json_file);
        assert!(file.options.save_to_database);
        assert!(file.options.use_easy_apply);
        assert_eq!(file.translator.url.as_deref(), Some("http://localhost:5000"));
        assert_eq!(file.translator.api_key, None);
        assert_eq!(file.translator.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_parse_yaml_rules() {
        let yaml = r#"
languages_user_speak_fluently:
  languages: [english]
experience:
  experience_max_year_threshold: 5
technologies:
  programming_languages_apply: "rust, go"
"#;
        let file = RulesFile::from_yaml_str(yaml).unwrap();
        assert_eq!(file.rules.experience_year_cap, 5);
        assert_eq!(file.rules.similarity_threshold, DEFAULT_SIMILARITY_THRESHOLD);
        assert!(file.rules.known_programming_languages.contains("go"));
        assert_eq!(file.translator.url, None);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = RulesFile::from_toml_str("").unwrap();
        assert_eq!(file.rules.experience_year_cap, DEFAULT_EXPERIENCE_YEAR_CAP);
        assert!(file.rules.fluent_languages.is_empty());
        assert_eq!(file.options, SearchOptions::default());
    }

    #[test]
    fn test_threshold_out_of_range_is_rejected() {
        let toml = "[words_check_language_check]\nsimilarity_threshold = 1.5\n";
        assert!(RulesFile::from_toml_str(toml).is_err());
    }

    #[test]
    fn test_check_words_by_pos() {
        let words = CheckWords {
            adj: vec!["fluent".into()],
            verb: vec!["speak".into()],
            ..Default::default()
        };
        assert_eq!(words.for_pos(PartOfSpeech::Adjective), ["fluent".to_string()]);
        assert!(words.for_pos(PartOfSpeech::Punctuation).is_empty());
    }
}
