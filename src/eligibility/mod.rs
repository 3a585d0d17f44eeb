// src/eligibility/mod.rs
//! Eligibility decision engine: raw job description in, [`Verdict`] out
//!
//! The pipeline normalizes and translates the description, annotates it once,
//! runs the language, experience and technology checkers over the same
//! document, extracts contact emails and fuses everything into a verdict.

pub mod annotator;
pub mod email;
pub mod error;
pub mod experience_check;
pub mod language_check;
pub mod matcher;
pub mod normalizer;
pub mod taxonomy;
pub mod technology_check;
pub mod translator;
pub mod verdict;

#[cfg(test)]
pub(crate) mod test_support;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub use annotator::{AnnotatedDocument, Annotator, LanguageModel, PartOfSpeech};
pub use error::EngineError;
pub use taxonomy::EntityTaxonomy;
pub use translator::{NoopTranslator, Translator};
pub use verdict::{CheckOutcome, Reason, Verdict};

use crate::config::RuleConfiguration;

const DEFAULT_TRANSLATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Stateless facade over the pipeline. Cloning is cheap: all handles are shared
/// and read-only.
#[derive(Clone)]
pub struct EligibilityEngine {
    annotator: Arc<Annotator>,
    taxonomy: Arc<EntityTaxonomy>,
    rules: Arc<RuleConfiguration>,
    translator: Arc<dyn Translator>,
    translation_timeout: Duration,
}

impl EligibilityEngine {
    pub fn new(
        annotator: Arc<Annotator>,
        taxonomy: Arc<EntityTaxonomy>,
        rules: Arc<RuleConfiguration>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        Self {
            annotator,
            taxonomy,
            rules,
            translator,
            translation_timeout: DEFAULT_TRANSLATION_TIMEOUT,
        }
    }

    pub fn with_translation_timeout(mut self, timeout: Duration) -> Self {
        self.translation_timeout = timeout;
        self
    }

    /// Load the taxonomy and language model from disk and build the engine.
    /// Missing or malformed assets are fatal.
    pub async fn load(
        model_dir: &Path,
        taxonomy_path: &Path,
        rules: RuleConfiguration,
        translator: Arc<dyn Translator>,
    ) -> Result<Self, EngineError> {
        let model_dir = model_dir.to_path_buf();
        let taxonomy_path = taxonomy_path.to_path_buf();

        let (annotator, taxonomy) = tokio::task::spawn_blocking(move || {
            let taxonomy = EntityTaxonomy::load(&taxonomy_path)?;
            let model = LanguageModel::load(&model_dir)?;
            let annotator = Annotator::load(model, &taxonomy)?;
            Ok::<_, EngineError>((annotator, taxonomy))
        })
        .await
        .map_err(|e| EngineError::Worker(e.to_string()))??;

        info!("Eligibility engine ready");
        Ok(Self::new(
            Arc::new(annotator),
            Arc::new(taxonomy),
            Arc::new(rules),
            translator,
        ))
    }

    pub fn rules(&self) -> &RuleConfiguration {
        &self.rules
    }

    pub fn taxonomy(&self) -> &EntityTaxonomy {
        &self.taxonomy
    }

    /// Normalize, translate to English when needed, and normalize the
    /// translation again so the annotator always sees lowercase text.
    pub async fn prepare_description(&self, raw: &str) -> String {
        let normalized = normalizer::normalize_description(raw);
        let translated = translator::translate_to_english(
            self.translator.as_ref(),
            &normalized,
            self.translation_timeout,
        )
        .await;

        if translated == normalized {
            normalized
        } else {
            normalizer::normalize_description(&translated)
        }
    }

    /// Run the whole pipeline on a raw description
    pub async fn evaluate(&self, raw: &str) -> Result<Verdict, EngineError> {
        let clean = self.prepare_description(raw).await;
        let engine = self.clone();

        tokio::task::spawn_blocking(move || engine.evaluate_clean(clean))
            .await
            .map_err(|e| EngineError::Worker(e.to_string()))
    }

    /// Annotate an already prepared description and decide. CPU-bound.
    pub fn evaluate_clean(&self, clean_description: String) -> Verdict {
        let doc = self.annotator.annotate(&clean_description);
        let model = self.annotator.model();

        let language = language_check::check_language_requirement(&doc, model, &self.rules);
        let experience = experience_check::check_experience_requirement(&doc, model, &self.rules);
        let technology =
            technology_check::check_technology_requirement(&doc, &self.taxonomy, &self.rules);
        let emails = email::extract_emails(&doc);

        debug!(
            "Checks: language={} experience={} technology={} ({} entities, {} sentences)",
            language.apply,
            experience.apply,
            technology.apply,
            doc.entities().len(),
            doc.sentence_count()
        );

        verdict::aggregate(language, experience, technology, emails, clean_description)
    }
}
