// src/eligibility/annotator/recognizer.rs
//! Entity recognizers composed by the annotator in precedence order

use std::collections::{HashMap, HashSet};

use super::document::{AnnotatedDocument, EntitySpan, PartOfSpeech, PERSON_LABEL};
use super::tokenizer::token_texts;
use crate::eligibility::taxonomy::EntityTaxonomy;

/// Given names used when the model ships no gazetteer of its own.
pub const DEFAULT_GIVEN_NAMES: &[&str] = &[
    "aaron", "abdul", "adam", "adrian", "ahmed", "aisha", "alan", "alberto", "alejandro",
    "alex", "alexander", "alexandra", "ali", "alice", "amanda", "amir", "amy", "ana",
    "andre", "andrea", "andreas", "andrew", "angela", "anna", "anne", "anthony", "antoine",
    "antonio", "arjun", "ashley", "barbara", "ben", "benjamin", "bernard", "brian", "carla",
    "carlos", "carmen", "caroline", "catherine", "charles", "charlotte", "chen", "chris",
    "christian", "christina", "christopher", "claire", "claudia", "daniel", "daniela",
    "david", "deborah", "diana", "diego", "dmitri", "dominik", "edward", "elena",
    "elizabeth", "emily", "emma", "eric", "erik", "eva", "fabio", "fatima", "felix",
    "fernando", "florian", "francesca", "francesco", "gabriel", "george",
    "giorgio", "giulia", "giuseppe", "hannah", "hans", "harry", "helen", "henry",
    "hugo", "ian", "igor", "isabel", "ivan", "jacob", "james", "jan", "jane",
    "jason", "javier", "jean", "jennifer", "jessica", "joao", "john", "jonathan", "jorge",
    "jose", "joseph", "juan", "julia", "julian", "julie", "karen", "karim", "kate",
    "katharina", "kenji", "kevin", "klaus", "laura", "lea", "leon", "linda", "lisa",
    "louis", "lucas", "lucia", "luis", "luke", "manuel", "marc", "marco", "maria", "marie",
    "martin", "mary", "mateo", "matthew", "michael", "michelle", "miguel",
    "mohamed", "mohammed", "natalia", "nicolas", "nina", "olga", "olivia", "omar", "oscar",
    "pablo", "patricia", "patrick", "paul", "pedro", "peter", "philippe", "pierre", "priya",
    "rachel", "rafael", "raj", "rebecca", "ricardo", "richard", "robert", "roberto", "sam",
    "samuel", "sandra", "sara", "sarah", "sebastian", "sergio", "simon", "sofia", "sophie",
    "stefan", "stephanie", "steven", "susan", "thomas", "tim", "tom", "valentina", "victor",
    "vincent", "wei", "william", "yuki", "yusuf",
];

/// A strategy that proposes entity spans over an annotated document.
///
/// Recognizers see the entities accepted so far; spans overlapping them are
/// discarded by the document.
pub trait EntityRecognizer: Send + Sync {
    fn name(&self) -> &'static str;

    fn recognize(&self, doc: &AnnotatedDocument) -> Vec<EntitySpan>;
}

/// Dictionary recognizer over the taxonomy surface forms.
///
/// Matches whole token sequences, longest first, never across sentences.
pub struct TaxonomyRecognizer {
    patterns: HashMap<String, Vec<(Vec<String>, String)>>,
}

impl TaxonomyRecognizer {
    pub fn new(taxonomy: &EntityTaxonomy) -> Self {
        let mut patterns: HashMap<String, Vec<(Vec<String>, String)>> = HashMap::new();
        for (label, forms) in taxonomy.categories() {
            for form in forms {
                let tokens = token_texts(form);
                let Some(first) = tokens.first().cloned() else {
                    continue;
                };
                let candidates = patterns.entry(first).or_default();
                if !candidates.iter().any(|(t, _)| *t == tokens) {
                    candidates.push((tokens, label.to_string()));
                }
            }
        }
        for candidates in patterns.values_mut() {
            // Stable sort keeps file order between patterns of equal length
            candidates.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        }
        Self { patterns }
    }

    fn longest_match(&self, words: &[&str]) -> Option<(usize, &str)> {
        let candidates = self.patterns.get(*words.first()?)?;
        candidates
            .iter()
            .find(|(tokens, _)| {
                tokens.len() <= words.len() && tokens.iter().zip(words).all(|(t, w)| t == w)
            })
            .map(|(tokens, label)| (tokens.len(), label.as_str()))
    }
}

impl EntityRecognizer for TaxonomyRecognizer {
    fn name(&self) -> &'static str {
        "taxonomy"
    }

    fn recognize(&self, doc: &AnnotatedDocument) -> Vec<EntitySpan> {
        let mut spans = Vec::new();
        for sentence in 0..doc.sentence_count() {
            let range = doc.sentence_range(sentence);
            let words: Vec<&str> = doc.sentence_tokens(sentence)
                .iter()
                .map(|t| t.text.as_str())
                .collect();

            let mut i = 0;
            while i < words.len() {
                match self.longest_match(&words[i..]) {
                    Some((len, label)) => {
                        let tokens = range.start + i..range.start + i + len;
                        spans.push(EntitySpan {
                            label: label.to_string(),
                            text: doc.span_text(tokens.clone()).to_string(),
                            tokens,
                            sentence,
                        });
                        i += len;
                    }
                    None => i += 1,
                }
            }
        }
        spans
    }
}

/// Gazetteer-based PERSON recognizer: a known given name, optionally followed
/// by a surname token.
pub struct PersonRecognizer {
    given_names: HashSet<String>,
}

impl PersonRecognizer {
    pub fn new(given_names: HashSet<String>) -> Self {
        Self { given_names }
    }

    fn is_surname_candidate(doc: &AnnotatedDocument, index: usize) -> bool {
        let Some(token) = doc.tokens().get(index) else {
            return false;
        };
        matches!(token.pos, PartOfSpeech::Noun | PartOfSpeech::ProperNoun)
            && token.text.chars().all(char::is_alphabetic)
            && !doc.is_claimed(index)
    }
}

impl EntityRecognizer for PersonRecognizer {
    fn name(&self) -> &'static str {
        "person"
    }

    fn recognize(&self, doc: &AnnotatedDocument) -> Vec<EntitySpan> {
        let mut spans = Vec::new();
        for sentence in 0..doc.sentence_count() {
            let range = doc.sentence_range(sentence);
            let mut i = range.start;
            while i < range.end {
                let token = &doc.tokens()[i];
                if doc.is_claimed(i) || !self.given_names.contains(&token.text) {
                    i += 1;
                    continue;
                }

                let mut end = i + 1;
                if end < range.end && Self::is_surname_candidate(doc, end) {
                    end += 1;
                }
                spans.push(EntitySpan {
                    label: PERSON_LABEL.to_string(),
                    text: doc.span_text(i..end).to_string(),
                    tokens: i..end,
                    sentence,
                });
                i = end;
            }
        }
        spans
    }
}
