// src/eligibility/matcher.rs
//! Token-sequence patterns over annotated sentences

use super::annotator::{PartOfSpeech, Token};

/// A condition on a single token.
#[derive(Debug, Clone)]
pub enum TokenPredicate {
    /// Exact token text
    Orth(&'static str),
    /// Case-insensitive token text
    Lower(&'static str),
    /// Token text is none of the listed strings
    NotIn(&'static [&'static str]),
    LikeNum,
    Pos(PartOfSpeech),
}

impl TokenPredicate {
    pub fn matches(&self, token: &Token) -> bool {
        match self {
            Self::Orth(text) => token.text == *text,
            Self::Lower(text) => token.text.eq_ignore_ascii_case(text),
            Self::NotIn(texts) => !texts.contains(&token.text.as_str()),
            Self::LikeNum => token.like_num,
            Self::Pos(pos) => token.pos == *pos,
        }
    }
}

/// A pattern hit, as token indices into the searched slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    pub id: &'static str,
    pub start: usize,
    pub end: usize,
}

/// Finds every occurrence of a set of named token patterns.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    patterns: Vec<(&'static str, Vec<TokenPredicate>)>,
}

impl Matcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, id: &'static str, pattern: Vec<TokenPredicate>) -> Self {
        if !pattern.is_empty() {
            self.patterns.push((id, pattern));
        }
        self
    }

    /// All matches in `tokens`, ordered by start then pattern registration order
    pub fn find(&self, tokens: &[Token]) -> Vec<PatternMatch> {
        let mut matches = Vec::new();
        for start in 0..tokens.len() {
            for (id, pattern) in &self.patterns {
                let end = start + pattern.len();
                if end > tokens.len() {
                    continue;
                }
                let hit = pattern
                    .iter()
                    .zip(&tokens[start..end])
                    .all(|(predicate, token)| predicate.matches(token));
                if hit {
                    matches.push(PatternMatch {
                        id: *id,
                        start,
                        end,
                    });
                }
            }
        }
        matches
    }
}
