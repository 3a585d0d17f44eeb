// src/eligibility/annotator/document.rs
use serde::Serialize;
use std::ops::Range;

/// Native label of the person recognizer.
pub const PERSON_LABEL: &str = "PERSON";

/// Coarse part-of-speech classes used by the checkers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PartOfSpeech {
    Adjective,
    Noun,
    ProperNoun,
    Verb,
    Adverb,
    Punctuation,
    Other,
}

impl PartOfSpeech {
    /// Map a Universal Dependencies tag onto the coarse classes
    pub fn from_upos(tag: &str) -> Option<Self> {
        match tag.trim().to_uppercase().as_str() {
            "ADJ" => Some(Self::Adjective),
            "NOUN" => Some(Self::Noun),
            "PROPN" => Some(Self::ProperNoun),
            "VERB" => Some(Self::Verb),
            "ADV" => Some(Self::Adverb),
            "PUNCT" | "SYM" => Some(Self::Punctuation),
            "ADP" | "AUX" | "CCONJ" | "SCONJ" | "DET" | "INTJ" | "NUM" | "PART" | "PRON"
            | "X" => Some(Self::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Token {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub pos: PartOfSpeech,
    pub sentence: usize,
    pub like_num: bool,
    pub like_email: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntitySpan {
    pub label: String,
    /// Token range covered by the entity
    pub tokens: Range<usize>,
    pub text: String,
    pub sentence: usize,
}

/// A normalized description with its tokens, sentences and entity spans.
///
/// Built once per description by the annotator, read-only for the checkers.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedDocument {
    text: String,
    tokens: Vec<Token>,
    sentences: Vec<Range<usize>>,
    entities: Vec<EntitySpan>,
}

impl AnnotatedDocument {
    pub(crate) fn new(text: String, tokens: Vec<Token>, sentences: Vec<Range<usize>>) -> Self {
        Self {
            text,
            tokens,
            sentences,
            entities: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    pub fn entities(&self) -> &[EntitySpan] {
        &self.entities
    }

    /// Entities carrying the given label
    pub fn entities_labeled<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a EntitySpan> {
        self.entities.iter().filter(move |e| e.label == label)
    }

    /// Token index range of a sentence; empty for an unknown sentence index
    pub fn sentence_range(&self, sentence: usize) -> Range<usize> {
        self.sentences.get(sentence).cloned().unwrap_or(0..0)
    }

    pub fn sentence_tokens(&self, sentence: usize) -> &[Token] {
        &self.tokens[self.sentence_range(sentence)]
    }

    pub fn sentence_text(&self, sentence: usize) -> &str {
        self.span_text(self.sentence_range(sentence))
    }

    pub fn sentence_entities(&self, sentence: usize) -> impl Iterator<Item = &EntitySpan> {
        self.entities.iter().filter(move |e| e.sentence == sentence)
    }

    /// Whether `phrase` (already tokenized) occurs as a whole token sequence in a sentence
    pub fn sentence_contains_sequence(&self, sentence: usize, phrase: &[String]) -> bool {
        if phrase.is_empty() {
            return false;
        }
        self.sentence_tokens(sentence)
            .windows(phrase.len())
            .any(|window| window.iter().zip(phrase).all(|(t, p)| t.text == *p))
    }

    /// Source text covered by a token range
    pub fn span_text(&self, tokens: Range<usize>) -> &str {
        if tokens.is_empty() || tokens.end > self.tokens.len() {
            return "";
        }
        let start = self.tokens[tokens.start].start;
        let end = self.tokens[tokens.end - 1].end;
        &self.text[start..end]
    }

    /// Whether any entity already covers token `index`
    pub fn is_claimed(&self, index: usize) -> bool {
        self.entities.iter().any(|e| e.tokens.contains(&index))
    }

    /// Add spans from a recognizer, dropping those that overlap earlier entities
    /// or cross a sentence boundary. Returns how many spans were kept.
    pub(crate) fn add_entities(&mut self, spans: Vec<EntitySpan>) -> usize {
        let mut kept = 0;
        for span in spans {
            let in_one_sentence = self
                .sentences
                .get(span.sentence)
                .is_some_and(|s| s.start <= span.tokens.start && span.tokens.end <= s.end);
            if span.tokens.is_empty() || !in_one_sentence {
                continue;
            }
            if span.tokens.clone().any(|i| self.is_claimed(i)) {
                continue;
            }
            self.entities.push(span);
            kept += 1;
        }
        self.entities.sort_by_key(|e| e.tokens.start);
        kept
    }
}
