// src/eligibility/translator.rs
//! Best-effort translation of descriptions into English

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::utils::normalize_language_code;

pub const TARGET_LANGUAGE: &str = "en";

/// Language identification plus translation, as offered by a translation service.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Detect the language of `text`, returning an ISO 639-1 code or a language name
    async fn detect_language(&self, text: &str) -> Result<String>;

    /// Translate `text` from `source` into `target`
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String>;
}

/// Translator used when no translation service is configured: everything is English.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTranslator;

#[async_trait]
impl Translator for NoopTranslator {
    async fn detect_language(&self, _text: &str) -> Result<String> {
        Ok(TARGET_LANGUAGE.to_string())
    }

    async fn translate(&self, text: &str, _source: &str, _target: &str) -> Result<String> {
        Ok(text.to_string())
    }
}

/// Translate `text` into English when it is written in another language.
///
/// Never fails: service errors, empty answers and timeouts all fall back to the
/// original text.
pub async fn translate_to_english(
    translator: &dyn Translator,
    text: &str,
    timeout: Duration,
) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }

    let attempt = async {
        let detected = translator.detect_language(text).await?;
        let source = normalize_language_code(&detected);
        if source == TARGET_LANGUAGE {
            return Ok::<_, anyhow::Error>(None);
        }

        debug!("Translating description from '{}' to English", source);
        let translated = translator.translate(text, &source, TARGET_LANGUAGE).await?;
        Ok(Some(translated))
    };

    match tokio::time::timeout(timeout, attempt).await {
        Ok(Ok(Some(translated))) if !translated.trim().is_empty() => translated,
        Ok(Ok(Some(_))) => {
            warn!("Translation service returned an empty text, keeping original");
            text.to_string()
        }
        Ok(Ok(None)) => text.to_string(),
        Ok(Err(e)) => {
            warn!("Translation failed, keeping original text: {:#}", e);
            text.to_string()
        }
        Err(_) => {
            warn!(
                "Translation timed out after {:?}, keeping original text",
                timeout
            );
            text.to_string()
        }
    }
}
