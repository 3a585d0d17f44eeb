// src/eligibility/annotator/pos.rs
//! Lexicon-driven part-of-speech tagger

use std::collections::HashMap;
use std::path::Path;

use super::document::PartOfSpeech;
use super::tokenizer::{is_punct, like_email, like_num, like_url};
use crate::eligibility::EngineError;

const CLOSED_CLASS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "and", "or", "but", "nor", "so", "yet",
    "for", "of", "in", "on", "at", "by", "with", "without", "from", "to", "into", "onto", "over",
    "under", "about", "as", "than", "if", "while", "because", "although", "though", "whether",
    "within", "across", "through", "per", "via", "i", "you", "he", "she", "it", "we", "they",
    "me", "him", "her", "us", "them", "my", "your", "his", "its", "our", "their", "who", "whom",
    "whose", "which", "what", "where", "when", "why", "how", "all", "any", "both", "each",
    "every", "some", "no", "not", "can", "could", "may", "might", "must", "shall", "should",
    "will", "would", "do", "does", "did", "is", "are", "was", "were", "be", "been", "being",
    "am", "has", "have", "had", "there", "here", "etc",
];

const MODALS: &[&str] = &[
    "can", "could", "may", "might", "must", "shall", "should", "will", "would", "to",
];

const ADJECTIVES: &[&str] = &[
    "fluent", "native", "strong", "solid", "many", "multiple", "several", "few", "more", "most",
    "good", "great", "excellent", "proficient", "advanced", "basic", "intermediate", "senior",
    "junior", "mid", "relevant", "new", "other", "various", "extensive", "proven", "deep",
    "broad", "prior", "previous", "minimum", "bilingual", "written", "spoken", "oral", "full",
    "remote", "hybrid", "competitive", "familiar", "comfortable", "able", "long", "significant",
    "demonstrable", "agile", "modern", "large", "small", "high", "key",
];

const VERBS: &[&str] = &[
    "speak", "speaks", "write", "writes", "read", "reads", "communicate", "require", "requires",
    "need", "needs", "work", "build", "builds", "design", "develop", "join", "apply", "know",
    "understand", "lead", "manage", "own", "ship", "deliver", "help", "seek", "seeking",
];

const ADVERBS: &[&str] = &[
    "well", "very", "also", "fluently", "ideally", "preferably", "highly", "strongly", "only",
    "always", "often", "already",
];

const ADJECTIVE_SUFFIXES: &[&str] = &[
    "ous", "ful", "ive", "able", "ible", "al", "ic", "less",
];

/// Assigns coarse part-of-speech classes to token sequences.
///
/// Resolution order: file lexicon, built-in lexicon, context, suffix rules,
/// noun fallback.
#[derive(Debug, Clone)]
pub struct PosTagger {
    lexicon: HashMap<String, PartOfSpeech>,
}

impl Default for PosTagger {
    fn default() -> Self {
        Self::new()
    }
}

impl PosTagger {
    pub fn new() -> Self {
        let mut lexicon = HashMap::new();
        let groups: [(&[&str], PartOfSpeech); 4] = [
            (CLOSED_CLASS, PartOfSpeech::Other),
            (ADJECTIVES, PartOfSpeech::Adjective),
            (VERBS, PartOfSpeech::Verb),
            (ADVERBS, PartOfSpeech::Adverb),
        ];
        for (words, pos) in groups {
            for word in words {
                lexicon.insert(word.to_string(), pos);
            }
        }
        Self { lexicon }
    }

    /// Extend or override the built-in lexicon
    pub fn with_overrides(mut self, overrides: HashMap<String, PartOfSpeech>) -> Self {
        self.lexicon.extend(overrides);
        self
    }

    /// Load `word<TAB>UPOS` lines; blank lines and `#` comments are skipped
    pub fn load_lexicon(path: &Path) -> Result<HashMap<String, PartOfSpeech>, EngineError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| EngineError::ModelUnavailable {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse_lexicon(&content).map_err(|(line, reason)| EngineError::InvalidModel {
            path: path.to_path_buf(),
            line,
            reason,
        })
    }

    fn parse_lexicon(content: &str) -> Result<HashMap<String, PartOfSpeech>, (usize, String)> {
        let mut lexicon = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split('\t');
            let (Some(word), Some(tag)) = (fields.next(), fields.next()) else {
                return Err((idx + 1, "expected word<TAB>tag".to_string()));
            };
            let pos = PartOfSpeech::from_upos(tag)
                .ok_or_else(|| (idx + 1, format!("unknown tag '{}'", tag)))?;
            lexicon.insert(word.trim().to_lowercase(), pos);
        }
        Ok(lexicon)
    }

    /// Tag a token sequence
    pub fn tag(&self, words: &[&str]) -> Vec<PartOfSpeech> {
        let mut tags = Vec::with_capacity(words.len());
        for (i, word) in words.iter().enumerate() {
            let prev = i.checked_sub(1).map(|p| words[p]);
            tags.push(self.tag_word(word, prev));
        }
        tags
    }

    fn tag_word(&self, word: &str, prev: Option<&str>) -> PartOfSpeech {
        let lower = word.to_lowercase();

        if like_num(&lower) || like_email(&lower) || like_url(&lower) {
            return PartOfSpeech::Other;
        }
        if is_punct(&lower) {
            return PartOfSpeech::Punctuation;
        }
        if let Some(pos) = self.lexicon.get(&lower) {
            return *pos;
        }
        if prev.is_some_and(|p| MODALS.contains(&p.to_lowercase().as_str())) {
            return PartOfSpeech::Verb;
        }
        Self::tag_by_suffix(&lower)
    }

    fn tag_by_suffix(word: &str) -> PartOfSpeech {
        let long_enough = |suffix: &str| word.len() > suffix.len() + 2;

        if word.ends_with("ly") && long_enough("ly") {
            return PartOfSpeech::Adverb;
        }
        if ["ing", "ed"]
            .iter()
            .any(|s| word.ends_with(s) && long_enough(s))
        {
            return PartOfSpeech::Verb;
        }
        if ADJECTIVE_SUFFIXES
            .iter()
            .any(|s| word.ends_with(s) && long_enough(s))
        {
            return PartOfSpeech::Adjective;
        }
        PartOfSpeech::Noun
    }
}
