// src/eligibility/technology_check.rs
//! Technology stack requirements and tag extraction

use std::collections::BTreeSet;
use tracing::debug;

use super::annotator::tokenizer::token_texts;
use super::annotator::{AnnotatedDocument, EntitySpan, PERSON_LABEL};
use super::taxonomy::{EntityTaxonomy, BACKEND_WEB_FRAMEWORK, PROGRAMMING_LANGUAGE};
use super::Reason;
use crate::config::RuleConfiguration;

const DISJUNCTION_WORD: &str = "or";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TechnologyOutcome {
    pub apply: bool,
    pub reasons: BTreeSet<Reason>,
    pub unknown_technologies: BTreeSet<String>,
    pub tags: BTreeSet<String>,
}

impl TechnologyOutcome {
    fn reject(&mut self, reason: Reason, entity: &EntitySpan) {
        self.apply = false;
        self.reasons.insert(reason);
        self.unknown_technologies.insert(entity.text.clone());
    }
}

pub fn check_technology_requirement(
    doc: &AnnotatedDocument,
    taxonomy: &EntityTaxonomy,
    rules: &RuleConfiguration,
) -> TechnologyOutcome {
    let mut outcome = TechnologyOutcome {
        apply: true,
        ..Default::default()
    };

    for entity in doc.entities() {
        let text = entity.text.to_lowercase();

        if taxonomy.contains_surface_form(&text) {
            outcome.tags.insert(text.clone());
        }

        if rules.disqualifying_tech_categories.contains(&entity.label) {
            debug!("'{}' belongs to disqualifying group '{}'", text, entity.label);
            outcome.reject(Reason::TechnologyGroup, entity);
        }

        if entity.label == PROGRAMMING_LANGUAGE
            && !rules.known_programming_languages.contains(&text)
            && !language_requirement_is_waived(doc, entity, rules)
        {
            debug!("Unknown programming language '{}'", text);
            outcome.reject(Reason::ProgrammingLanguage, entity);
        }

        if entity.label == BACKEND_WEB_FRAMEWORK && !rules.known_backend_frameworks.contains(&text) {
            debug!("Unknown backend framework '{}'", text);
            outcome.reject(Reason::BackendWebFramework, entity);
        }
    }

    outcome
}

/// Two literal rules excuse an unknown programming language: the sentence
/// names a person (a consultant listing their languages), or it offers a
/// known language as an alternative ("python, java or scala").
fn language_requirement_is_waived(
    doc: &AnnotatedDocument,
    entity: &EntitySpan,
    rules: &RuleConfiguration,
) -> bool {
    if mentions_person(doc, entity.sentence) {
        debug!("Skipping '{}': sentence mentions a person", entity.text);
        return true;
    }
    if offers_known_alternative(doc, entity.sentence, rules) {
        debug!("Skipping '{}': a known language is an alternative", entity.text);
        return true;
    }
    false
}

fn mentions_person(doc: &AnnotatedDocument, sentence: usize) -> bool {
    doc.sentence_entities(sentence)
        .any(|e| e.label == PERSON_LABEL)
}

fn offers_known_alternative(
    doc: &AnnotatedDocument,
    sentence: usize,
    rules: &RuleConfiguration,
) -> bool {
    let has_disjunction = doc
        .sentence_tokens(sentence)
        .iter()
        .any(|t| t.text == DISJUNCTION_WORD);
    if !has_disjunction {
        return false;
    }

    rules
        .known_programming_languages
        .iter()
        .any(|known| doc.sentence_contains_sequence(sentence, &token_texts(known)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::normalizer::normalize_description;
    use crate::eligibility::test_support::{sample_annotator, sample_rules, sample_taxonomy};

    fn check(description: &str, rules: &RuleConfiguration) -> TechnologyOutcome {
        let doc = sample_annotator().annotate(&normalize_description(description));
        check_technology_requirement(&doc, &sample_taxonomy(), rules)
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|i| i.to_string()).collect()
    }

    #[test]
    fn test_disqualifying_group() {
        let outcome = check("Experience with Jenkins is required.", &sample_rules());
        assert!(!outcome.apply);
        assert!(outcome.reasons.contains(&Reason::TechnologyGroup));
        assert_eq!(outcome.unknown_technologies, set(&["jenkins"]));
        assert!(outcome.tags.contains("jenkins"));
    }

    #[test]
    fn test_known_stack_passes_with_tags() {
        let outcome = check("Python and Django on AWS.", &sample_rules());
        assert!(outcome.apply);
        assert!(outcome.reasons.is_empty());
        assert_eq!(outcome.tags, set(&["aws", "django", "python"]));
    }

    #[test]
    fn test_unknown_programming_language() {
        let outcome = check("Strong Java background needed.", &sample_rules());
        assert!(!outcome.apply);
        assert_eq!(outcome.reasons, BTreeSet::from([Reason::ProgrammingLanguage]));
        assert_eq!(outcome.unknown_technologies, set(&["java"]));
    }

    #[test]
    fn test_disjunction_with_known_language() {
        let outcome = check("Proficiency in python, java, or scala", &sample_rules());
        assert!(outcome.apply);
        assert!(outcome.unknown_technologies.is_empty());
        assert_eq!(outcome.tags, set(&["java", "python", "scala"]));
    }

    #[test]
    fn test_disjunction_needs_known_language_in_same_sentence() {
        let outcome = check("We use python.\nJava or scala is required.", &sample_rules());
        assert!(!outcome.apply);
        assert_eq!(outcome.unknown_technologies, set(&["java", "scala"]));
    }

    #[test]
    fn test_or_inside_a_word_is_not_a_disjunction() {
        let outcome = check("Python work with java.", &sample_rules());
        assert!(!outcome.apply);
        assert!(outcome.unknown_technologies.contains("java"));
    }

    #[test]
    fn test_person_sentence_is_skipped() {
        let outcome = check("Luke Skywalker – Candidate Consultant PHP | Python", &sample_rules());
        assert!(outcome.apply);
        assert!(outcome.tags.contains("php"));
    }

    #[test]
    fn test_person_with_common_name_is_skipped() {
        let outcome = check("Kevin Smith – Consultant PHP", &sample_rules());
        assert!(outcome.apply);
    }

    #[test]
    fn test_person_skip_is_per_sentence() {
        let outcome = check(
            "Luke Skywalker – Consultant PHP.\nBackend in Rust.",
            &sample_rules(),
        );
        assert!(!outcome.apply);
        assert_eq!(outcome.unknown_technologies, set(&["rust"]));
    }

    #[test]
    fn test_unknown_backend_framework() {
        let outcome = check("Spring Boot microservices with Redis", &sample_rules());
        assert!(!outcome.apply);
        assert_eq!(outcome.reasons, BTreeSet::from([Reason::BackendWebFramework]));
        assert_eq!(outcome.unknown_technologies, set(&["spring boot"]));
        assert!(outcome.tags.contains("redis"));
    }

    #[test]
    fn test_tags_come_from_taxonomy_only() {
        let taxonomy = sample_taxonomy();
        let outcome = check(
            "Anna needs Java, Kotlin, Flask, Jenkins and fluent German.",
            &sample_rules(),
        );
        for tag in &outcome.tags {
            assert!(taxonomy.contains_surface_form(tag), "tag {} not in taxonomy", tag);
        }
        assert!(!outcome.tags.contains("anna"));
    }
}
