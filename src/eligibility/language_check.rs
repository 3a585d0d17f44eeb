// src/eligibility/language_check.rs
//! Rejects descriptions that demand a language the user does not speak

use tracing::debug;

use super::annotator::{AnnotatedDocument, EntitySpan, LanguageModel, Token};
use super::taxonomy::LANGUAGE;
use super::{CheckOutcome, Reason};
use crate::config::{CheckWords, RuleConfiguration};

/// Flag a sentence around an unspoken language when its words resemble the
/// configured requirement vocabulary.
pub fn check_language_requirement(
    doc: &AnnotatedDocument,
    model: &LanguageModel,
    rules: &RuleConfiguration,
) -> CheckOutcome {
    for entity in doc.entities_labeled(LANGUAGE) {
        if rules.fluent_languages.contains(&entity.text.to_lowercase()) {
            continue;
        }

        let score = requirement_similarity(doc, entity, model, &rules.check_words);
        debug!(
            "Language '{}' requirement similarity {:.3} (threshold {})",
            entity.text, score, rules.similarity_threshold
        );

        if score > rules.similarity_threshold {
            return CheckOutcome::reject(Reason::LanguageRequirement);
        }
    }
    CheckOutcome::pass()
}

/// Best similarity between the entity's sentence words and the check words of
/// the same part of speech; 0.0 when there is nothing to compare.
fn requirement_similarity(
    doc: &AnnotatedDocument,
    entity: &EntitySpan,
    model: &LanguageModel,
    check_words: &CheckWords,
) -> f32 {
    let range = doc.sentence_range(entity.sentence);

    CheckWords::CLASSES
        .iter()
        .map(|&pos| {
            let bucket: Vec<&Token> = range
                .clone()
                .filter(|i| !entity.tokens.contains(i))
                .map(|i| &doc.tokens()[i])
                .filter(|t| t.pos == pos)
                .collect();
            max_similarity(&bucket, check_words.for_pos(pos), model)
        })
        .fold(0.0, f32::max)
}

fn max_similarity(tokens: &[&Token], check_words: &[String], model: &LanguageModel) -> f32 {
    let mut best = 0.0_f32;
    for token in tokens {
        for word in check_words {
            best = best.max(model.similarity(&token.text, word));
        }
    }
    best
}
