// src/eligibility/annotator/statistical.rs
//! PERSON entities from a pretrained rust-bert token-classification model

use std::sync::mpsc;
use std::thread;

use rust_bert::pipelines::ner::NERModel;
use tracing::{info, warn};

use super::document::{AnnotatedDocument, EntitySpan, PERSON_LABEL};
use super::recognizer::EntityRecognizer;
use crate::eligibility::EngineError;

/// Label of people once the model's word pieces are merged into entities
const MODEL_PERSON_LABEL: &str = "PER";

/// Character offsets of the people found in each sentence
type SentenceOffsets = Vec<Vec<(usize, usize)>>;
type Request = (Vec<String>, mpsc::Sender<SentenceOffsets>);

/// Statistical PERSON recognizer.
///
/// The model lives on its own thread; `recognize` sends the sentences of a
/// document and blocks until the offsets come back.
pub struct StatisticalRecognizer {
    requests: mpsc::Sender<Request>,
}

impl StatisticalRecognizer {
    /// Start the model thread and wait until the pipeline is loaded
    pub fn load() -> Result<Self, EngineError> {
        let (requests, inbox) = mpsc::channel::<Request>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), String>>();

        thread::Builder::new()
            .name("ner-model".to_string())
            .spawn(move || {
                let model = match NERModel::new(Default::default()) {
                    Ok(model) => {
                        let _ = ready_tx.send(Ok(()));
                        model
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e.to_string()));
                        return;
                    }
                };
                for (sentences, reply) in inbox {
                    let _ = reply.send(person_offsets(&model, &sentences));
                }
            })
            .map_err(|e| EngineError::RecognizerUnavailable(e.to_string()))?;

        ready_rx
            .recv()
            .map_err(|e| EngineError::RecognizerUnavailable(e.to_string()))?
            .map_err(EngineError::RecognizerUnavailable)?;

        info!("Loaded statistical entity recognizer");
        Ok(Self { requests })
    }
}

fn person_offsets(model: &NERModel, sentences: &[String]) -> SentenceOffsets {
    model
        .predict_full_entities(sentences)
        .into_iter()
        .map(|entities| {
            entities
                .into_iter()
                .filter(|e| e.label == MODEL_PERSON_LABEL)
                .map(|e| (e.offset.begin as usize, e.offset.end as usize))
                .collect()
        })
        .collect()
}

impl EntityRecognizer for StatisticalRecognizer {
    fn name(&self) -> &'static str {
        "statistical"
    }

    fn recognize(&self, doc: &AnnotatedDocument) -> Vec<EntitySpan> {
        let sentences: Vec<String> = (0..doc.sentence_count())
            .map(|s| doc.sentence_text(s).to_string())
            .collect();

        let (reply, response) = mpsc::channel();
        if self.requests.send((sentences, reply)).is_err() {
            warn!("Entity model thread is gone, no PERSON entities");
            return Vec::new();
        }
        let Ok(found) = response.recv() else {
            warn!("Entity model thread dropped the request");
            return Vec::new();
        };

        found
            .iter()
            .enumerate()
            .flat_map(|(sentence, offsets)| spans_from_offsets(doc, sentence, offsets))
            .collect()
    }
}

/// Turn character offsets within a sentence into PERSON spans over the
/// tokens they overlap
fn spans_from_offsets(
    doc: &AnnotatedDocument,
    sentence: usize,
    offsets: &[(usize, usize)],
) -> Vec<EntitySpan> {
    let range = doc.sentence_range(sentence);
    let Some(first) = doc.tokens().get(range.start) else {
        return Vec::new();
    };
    let text = doc.sentence_text(sentence);

    let mut spans = Vec::new();
    for &(begin, end) in offsets {
        let (Some(begin), Some(end)) = (byte_offset(text, begin), byte_offset(text, end)) else {
            continue;
        };
        let (begin, end) = (first.start + begin, first.start + end);

        let mut covered = range.clone().filter(|&i| {
            let token = &doc.tokens()[i];
            token.start < end && begin < token.end
        });
        let Some(start) = covered.next() else {
            continue;
        };
        let stop = covered.last().unwrap_or(start) + 1;

        spans.push(EntitySpan {
            label: PERSON_LABEL.to_string(),
            text: doc.span_text(start..stop).to_string(),
            tokens: start..stop,
            sentence,
        });
    }
    spans
}

fn byte_offset(text: &str, chars: usize) -> Option<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .nth(chars)
}
