// src/eligibility/annotator/mod.rs
//! Linguistic annotation: tokens, sentences, part-of-speech and entities

pub mod document;
pub mod pos;
pub mod recognizer;
#[cfg(feature = "ner")]
pub mod statistical;
pub mod tokenizer;
pub mod vectors;

use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

pub use document::{AnnotatedDocument, EntitySpan, PartOfSpeech, Token, PERSON_LABEL};
pub use pos::PosTagger;
pub use recognizer::{EntityRecognizer, PersonRecognizer, TaxonomyRecognizer};
#[cfg(feature = "ner")]
pub use statistical::StatisticalRecognizer;
pub use vectors::WordVectors;

use super::taxonomy::EntityTaxonomy;
use super::EngineError;

pub const VECTORS_FILE: &str = "vectors.txt";
pub const LEXICON_FILE: &str = "pos_lexicon.tsv";
pub const GIVEN_NAMES_FILE: &str = "given_names.txt";

/// The general-purpose language model: tagger, word vectors and name gazetteer.
#[derive(Debug, Clone)]
pub struct LanguageModel {
    tagger: PosTagger,
    vectors: WordVectors,
    given_names: HashSet<String>,
}

impl LanguageModel {
    pub fn new(tagger: PosTagger, vectors: WordVectors, given_names: HashSet<String>) -> Self {
        Self {
            tagger,
            vectors,
            given_names,
        }
    }

    /// Load the model assets from `dir`. The vectors file is mandatory.
    pub fn load(dir: &Path) -> Result<Self, EngineError> {
        let vectors = WordVectors::load(&dir.join(VECTORS_FILE))?;

        let lexicon_path = dir.join(LEXICON_FILE);
        let tagger = if lexicon_path.exists() {
            PosTagger::new().with_overrides(PosTagger::load_lexicon(&lexicon_path)?)
        } else {
            PosTagger::new()
        };

        let names_path = dir.join(GIVEN_NAMES_FILE);
        let given_names = if names_path.exists() {
            std::fs::read_to_string(&names_path)
                .map_err(|source| EngineError::ModelUnavailable {
                    path: names_path.clone(),
                    source,
                })?
                .lines()
                .map(|l| l.trim().to_lowercase())
                .filter(|l| !l.is_empty() && !l.starts_with('#'))
                .collect()
        } else {
            default_given_names()
        };

        info!(
            "Loaded language model from {}: {} vectors ({} dims), {} given names",
            dir.display(),
            vectors.len(),
            vectors.dim(),
            given_names.len()
        );
        Ok(Self::new(tagger, vectors, given_names))
    }

    pub fn tagger(&self) -> &PosTagger {
        &self.tagger
    }

    pub fn vectors(&self) -> &WordVectors {
        &self.vectors
    }

    pub fn similarity(&self, a: &str, b: &str) -> f32 {
        self.vectors.similarity(a, b)
    }
}

pub fn default_given_names() -> HashSet<String> {
    recognizer::DEFAULT_GIVEN_NAMES
        .iter()
        .map(|n| n.to_string())
        .collect()
}

/// Builds [`AnnotatedDocument`]s. Constructed once and shared by all workers.
pub struct Annotator {
    model: LanguageModel,
    recognizers: Vec<Box<dyn EntityRecognizer>>,
}

impl Annotator {
    /// Taxonomy matches first, then PERSON from the given-name gazetteer.
    pub fn new(model: LanguageModel, taxonomy: &EntityTaxonomy) -> Self {
        let person = Box::new(PersonRecognizer::new(model.given_names.clone()));
        Self::with_person_recognizer(model, taxonomy, person)
    }

    /// Taxonomy matches take precedence over the given person recognizer.
    pub fn with_person_recognizer(
        model: LanguageModel,
        taxonomy: &EntityTaxonomy,
        person: Box<dyn EntityRecognizer>,
    ) -> Self {
        let recognizers: Vec<Box<dyn EntityRecognizer>> =
            vec![Box::new(TaxonomyRecognizer::new(taxonomy)), person];
        Self { model, recognizers }
    }

    /// Build the annotator used by the engine. With the `ner` feature the
    /// statistical model supplies PERSON entities, else the gazetteer does.
    pub fn load(model: LanguageModel, taxonomy: &EntityTaxonomy) -> Result<Self, EngineError> {
        #[cfg(feature = "ner")]
        {
            let person = Box::new(StatisticalRecognizer::load()?);
            Ok(Self::with_person_recognizer(model, taxonomy, person))
        }
        #[cfg(not(feature = "ner"))]
        {
            Ok(Self::new(model, taxonomy))
        }
    }

    pub fn recognizer_names(&self) -> Vec<&'static str> {
        self.recognizers.iter().map(|r| r.name()).collect()
    }

    pub fn model(&self) -> &LanguageModel {
        &self.model
    }

    /// Annotate a normalized, English description
    pub fn annotate(&self, text: &str) -> AnnotatedDocument {
        let raw = tokenizer::tokenize(text);
        let sentences = tokenizer::segment_sentences(&raw);

        let words: Vec<&str> = raw.iter().map(|t| t.text.as_str()).collect();
        let tags = self.model.tagger.tag(&words);

        let mut sentence_of = vec![0; raw.len()];
        for (idx, range) in sentences.iter().enumerate() {
            for slot in &mut sentence_of[range.clone()] {
                *slot = idx;
            }
        }

        let tokens = raw
            .into_iter()
            .zip(tags)
            .zip(sentence_of)
            .map(|((token, pos), sentence)| Token {
                like_num: tokenizer::like_num(&token.text),
                like_email: tokenizer::like_email(&token.text),
                text: token.text,
                start: token.start,
                end: token.end,
                pos,
                sentence,
            })
            .collect();

        let mut doc = AnnotatedDocument::new(text.to_string(), tokens, sentences);
        for recognizer in &self.recognizers {
            let spans = recognizer.recognize(&doc);
            let proposed = spans.len();
            let kept = doc.add_entities(spans);
            debug!(
                "Recognizer '{}' kept {} of {} spans",
                recognizer.name(),
                kept,
                proposed
            );
        }
        doc
    }
}
