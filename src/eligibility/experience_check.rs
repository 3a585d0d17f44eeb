// src/eligibility/experience_check.rs
//! Seniority titles and years-of-experience thresholds

use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

use super::annotator::{AnnotatedDocument, LanguageModel, PartOfSpeech, Token};
use super::matcher::{Matcher, PatternMatch, TokenPredicate};
use super::taxonomy::ROLE_EXPERIENCE;
use super::{CheckOutcome, Reason};
use crate::config::RuleConfiguration;

const YEARS_RANGE: &str = "years_range";
const YEARS_PLUS: &str = "years_plus";
const YEARS_PLUS_PREFIX: &str = "years_plus_prefix";
const YEARS_BARE: &str = "years_bare";
const ADJ_YEARS_OF_EXPERIENCE: &str = "adj_years_of_experience";
const ADJ_EXPERIENCE: &str = "adj_experience";

/// Values of 11 or more are placeholders ("100 years"), not requirements.
const YEARS_UPPER_BOUND: u32 = 11;
/// Idioms are only checked for users accepting fewer than this many years.
const IDIOM_CAP_LIMIT: u32 = 4;
const IDIOM_SIMILARITY_THRESHOLD: f32 = 0.7;
const MANY_WORDS: &[&str] = &["many", "multiple"];
const STRONG_WORDS: &[&str] = &["strong", "solid"];

const EXPERIENCE_WORDS: &[&str] = &["experience", "experiences"];

const NUMBER_WORDS: &[(&str, u32)] = &[
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
];

/// Numeric year patterns in precedence order: a range beats the plus forms,
/// which beat a bare number over the same tokens.
static YEARS_MATCHER: LazyLock<Matcher> = LazyLock::new(|| {
    use TokenPredicate::*;
    Matcher::new()
        .add(
            YEARS_RANGE,
            vec![LikeNum, Orth("-"), LikeNum, Lower("years")],
        )
        .add(YEARS_PLUS, vec![LikeNum, Orth("+"), Lower("years")])
        .add(YEARS_PLUS_PREFIX, vec![Orth("+"), LikeNum, Lower("years")])
        .add(YEARS_BARE, vec![LikeNum, Lower("years")])
});

static IDIOM_MATCHER: LazyLock<Matcher> = LazyLock::new(|| {
    use TokenPredicate::*;
    Matcher::new()
        .add(
            ADJ_YEARS_OF_EXPERIENCE,
            vec![
                Pos(PartOfSpeech::Adjective),
                Lower("years"),
                Lower("of"),
                Lower("experience"),
            ],
        )
        .add(
            ADJ_EXPERIENCE,
            vec![Pos(PartOfSpeech::Adjective), Lower("experience")],
        )
});

/// Check seniority labels first, then the year requirements of every
/// sentence talking about experience.
pub fn check_experience_requirement(
    doc: &AnnotatedDocument,
    model: &LanguageModel,
    rules: &RuleConfiguration,
) -> CheckOutcome {
    for entity in doc.entities_labeled(ROLE_EXPERIENCE) {
        if rules
            .seniority_blocklist
            .contains(&entity.text.to_lowercase())
        {
            debug!("Seniority '{}' is blocklisted", entity.text);
            return CheckOutcome::reject(Reason::Seniority);
        }
    }

    let mut checked = HashSet::new();
    for token in doc.tokens() {
        if !EXPERIENCE_WORDS.contains(&token.text.to_lowercase().as_str()) {
            continue;
        }
        if !checked.insert(token.sentence) {
            continue;
        }

        let sentence = doc.sentence_tokens(token.sentence);
        if years_exceed_cap(sentence, rules.experience_year_cap) {
            return CheckOutcome::reject(Reason::Experience);
        }
        if rules.experience_year_cap < IDIOM_CAP_LIMIT && demanding_idiom(sentence, model) {
            return CheckOutcome::reject(Reason::Experience);
        }
    }

    CheckOutcome::pass()
}

fn years_exceed_cap(sentence: &[Token], cap: u32) -> bool {
    let matches = YEARS_MATCHER.find(sentence);
    let mut consumed: HashSet<usize> = HashSet::new();

    for id in [YEARS_RANGE, YEARS_PLUS, YEARS_PLUS_PREFIX, YEARS_BARE] {
        for m in matches.iter().filter(|m| m.id == id) {
            if id == YEARS_BARE && m.start > 0 && sentence[m.start - 1].text == "-" {
                continue;
            }

            let number_tokens: Vec<usize> =
                (m.start..m.end).filter(|&i| sentence[i].like_num).collect();
            if number_tokens.iter().any(|i| consumed.contains(i)) {
                continue;
            }
            consumed.extend(number_tokens.iter().copied());

            let Some(years) = parse_years(sentence, &number_tokens) else {
                continue;
            };

            if exceeds_cap(m, &years, cap) {
                debug!(
                    "Experience pattern '{}' with {:?} years exceeds cap {}",
                    m.id, years, cap
                );
                return true;
            }
        }
    }
    false
}

fn exceeds_cap(m: &PatternMatch, years: &[u32], cap: u32) -> bool {
    match (m.id, years) {
        (YEARS_RANGE, [low, high]) => (*low).min(*high) > cap,
        (YEARS_PLUS | YEARS_PLUS_PREFIX, [n]) => *n < YEARS_UPPER_BOUND && n + 1 > cap,
        (YEARS_BARE, [n]) => *n > cap && *n < YEARS_UPPER_BOUND,
        _ => false,
    }
}

fn parse_years(sentence: &[Token], number_tokens: &[usize]) -> Option<Vec<u32>> {
    number_tokens
        .iter()
        .map(|&i| parse_year_count(&sentence[i].text))
        .collect()
}

/// Parse "5" or "five" into a year count
pub fn parse_year_count(text: &str) -> Option<u32> {
    let lower = text.to_lowercase();
    if let Ok(n) = lower.parse::<u32>() {
        return Some(n);
    }
    NUMBER_WORDS
        .iter()
        .find(|(word, _)| *word == lower)
        .map(|(_, n)| *n)
}

fn demanding_idiom(sentence: &[Token], model: &LanguageModel) -> bool {
    IDIOM_MATCHER.find(sentence).iter().any(|m| {
        let adjective = &sentence[m.start].text;
        let probes = if m.id == ADJ_YEARS_OF_EXPERIENCE {
            MANY_WORDS
        } else {
            STRONG_WORDS
        };
        let score = probes
            .iter()
            .map(|probe| model.similarity(adjective, probe))
            .fold(0.0, f32::max);
        if score > IDIOM_SIMILARITY_THRESHOLD {
            debug!("Idiom '{}' with '{}' scores {:.3}", m.id, adjective, score);
            true
        } else {
            false
        }
    })
}
