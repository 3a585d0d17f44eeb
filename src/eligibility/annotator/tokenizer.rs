// src/eligibility/annotator/tokenizer.rs
//! Rule-based tokenizer and sentence segmenter for normalized descriptions

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static CHUNK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+").expect("chunk regex should compile"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9._%+\-]+@[a-z0-9\-]+(\.[a-z0-9\-]+)*\.[a-z]{2,}$")
        .expect("email regex should compile")
});

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(https?://|www\.)\S+$").expect("url regex should compile")
});

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+([.,]\d+)?$").expect("number regex should compile"));

const NUMBER_WORDS: &[&str] = &[
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen", "twenty", "thirty", "forty", "fifty", "hundred",
];

const LEADING_PUNCT: &[char] = &['"', '\'', '(', '[', '{', '«', '“', '‘', '*', '+', '-', '¿', '¡'];
const TRAILING_PUNCT: &[char] = &[
    '.', ',', ';', ':', '!', '?', '"', '\'', ')', ']', '}', '»', '”', '’', '…',
];
const INFIX_PUNCT: &[char] = &[
    ',', ';', ':', '(', ')', '[', ']', '{', '}', '"', '!', '?', '|', '–', '—', '-',
];
const SENTENCE_TERMINATORS: &[&str] = &[".", "!", "?", "…"];
pub const SENTENCE_STARTER_AFTER: &str = ":";

/// A token produced by [`tokenize`], with byte offsets into the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Split `text` into tokens.
///
/// Leading and trailing punctuation is split off each whitespace chunk.
/// Emails and URLs stay whole, and the remaining core is split on infix
/// punctuation, hyphens included. A `+` right after a digit is its own token
/// ("5+" gives "5", "+") while "c++" and "c#" are kept intact.
pub fn tokenize(text: &str) -> Vec<RawToken> {
    let mut tokens = Vec::new();
    for chunk in CHUNK_RE.find_iter(text) {
        split_chunk(chunk.as_str(), chunk.start(), &mut tokens);
    }
    tokens
}

/// Tokenize and return only the token texts.
pub fn token_texts(text: &str) -> Vec<String> {
    tokenize(text).into_iter().map(|t| t.text).collect()
}

fn split_chunk(chunk: &str, offset: usize, out: &mut Vec<RawToken>) {
    let mut start = 0;
    let mut end = chunk.len();

    // Leading punctuation, except when it opens a word like ".net"
    while start < end {
        let Some(ch) = chunk[start..end].chars().next() else {
            break;
        };
        if !LEADING_PUNCT.contains(&ch) {
            break;
        }
        push(out, chunk, offset, start, start + ch.len_utf8());
        start += ch.len_utf8();
    }

    let mut trailing = Vec::new();
    while end > start {
        let Some(ch) = chunk[start..end].chars().next_back() else {
            break;
        };
        if !TRAILING_PUNCT.contains(&ch) {
            break;
        }
        trailing.push((end - ch.len_utf8(), end));
        end -= ch.len_utf8();
    }

    if start < end {
        let core = &chunk[start..end];
        if EMAIL_RE.is_match(core) || URL_RE.is_match(core) {
            push(out, chunk, offset, start, end);
        } else {
            split_infixes(core, offset + start, out);
        }
    }

    for (s, e) in trailing.into_iter().rev() {
        push(out, chunk, offset, s, e);
    }
}

fn split_infixes(core: &str, offset: usize, out: &mut Vec<RawToken>) {
    let mut word_start: Option<usize> = None;
    let mut prev: Option<char> = None;

    for (pos, ch) in core.char_indices() {
        let is_infix = INFIX_PUNCT.contains(&ch)
            || (ch == '+' && prev.is_some_and(|p| p.is_ascii_digit()));

        if is_infix {
            if let Some(ws) = word_start.take() {
                push(out, core, offset, ws, pos);
            }
            push(out, core, offset, pos, pos + ch.len_utf8());
        } else if word_start.is_none() {
            word_start = Some(pos);
        }
        prev = Some(ch);
    }

    if let Some(ws) = word_start {
        push(out, core, offset, ws, core.len());
    }
}

fn push(out: &mut Vec<RawToken>, source: &str, offset: usize, start: usize, end: usize) {
    out.push(RawToken {
        text: source[start..end].to_string(),
        start: offset + start,
        end: offset + end,
    });
}

/// Group tokens into sentences, returned as token index ranges.
///
/// A sentence ends after a terminator, and the token following a colon always
/// starts a new sentence.
pub fn segment_sentences(tokens: &[RawToken]) -> Vec<Range<usize>> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for (i, token) in tokens.iter().enumerate() {
        let closes = SENTENCE_TERMINATORS.contains(&token.text.as_str())
            || token.text == SENTENCE_STARTER_AFTER;
        if closes {
            sentences.push(start..i + 1);
            start = i + 1;
        }
    }

    if start < tokens.len() {
        sentences.push(start..tokens.len());
    }
    sentences
}

/// Token looks like a number: digits or a spelled-out number word.
pub fn like_num(text: &str) -> bool {
    NUMBER_RE.is_match(text) || NUMBER_WORDS.contains(&text.to_lowercase().as_str())
}

/// Token looks like an email address.
pub fn like_email(text: &str) -> bool {
    EMAIL_RE.is_match(text)
}

/// Token looks like a URL.
pub fn like_url(text: &str) -> bool {
    URL_RE.is_match(text)
}

/// Token is made only of punctuation or symbol characters.
pub fn is_punct(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| !c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_plus_after_number() {
        assert_eq!(
            token_texts("5+ years experience"),
            vec!["5", "+", "years", "experience"]
        );
    }

    #[test]
    fn test_splits_ranges() {
        assert_eq!(
            token_texts("2-5 years of experience"),
            vec!["2", "-", "5", "years", "of", "experience"]
        );
    }

    #[test]
    fn test_keeps_technology_names_intact() {
        assert_eq!(
            token_texts("c++, c# and node.js."),
            vec!["c++", ",", "c#", "and", "node.js", "."]
        );
        assert_eq!(token_texts(".net core"), vec![".net", "core"]);
    }

    #[test]
    fn test_keeps_emails_whole() {
        assert_eq!(
            token_texts("apply at jobs@acme.com."),
            vec!["apply", "at", "jobs@acme.com", "."]
        );
    }

    #[test]
    fn test_splits_infix_punctuation() {
        assert_eq!(
            token_texts("python,java (scala)"),
            vec!["python", ",", "java", "(", "scala", ")"]
        );
    }

    #[test]
    fn test_offsets_point_into_source() {
        let text = "senior  engineer: rust";
        for token in tokenize(text) {
            assert_eq!(&text[token.start..token.end], token.text);
        }
    }

    #[test]
    fn test_colon_starts_new_sentence() {
        let tokens = tokenize("requirements: python and sql. remote work");
        let sentences = segment_sentences(&tokens);
        assert_eq!(sentences, vec![0..2, 2..6, 6..8]);
    }

    #[test]
    fn test_like_num() {
        assert!(like_num("5"));
        assert!(like_num("2.5"));
        assert!(like_num("five"));
        assert!(!like_num("years"));
        assert!(!like_num("5+"));
    }

    #[test]
    fn test_like_email() {
        assert!(like_email("jobs@acme.com"));
        assert!(like_email("first.last+hr@mail.example.co.uk"));
        assert!(!like_email("@acme"));
        assert!(!like_email("jobs@acme"));
    }
}
