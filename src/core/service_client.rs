// src/core/service_client.rs
//! HTTP client for a LibreTranslate-compatible translation service

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

use crate::config::TranslatorSettings;
use crate::eligibility::Translator;
use crate::types::response::{
    DetectRequest, DetectedLanguage, ServiceError, TranslateRequest, TranslateResponse,
};

const DETECT_ENDPOINT: &str = "/detect";
const TRANSLATE_ENDPOINT: &str = "/translate";

pub struct TranslationClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl TranslationClient {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: std::time::Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Client for the configured service, or `None` when translation is disabled
    pub fn from_settings(settings: &TranslatorSettings) -> Result<Option<Self>> {
        match settings.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => {
                Self::new(url, settings.api_key.clone(), settings.timeout).map(Some)
            }
            _ => Ok(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a JSON payload and decode the JSON answer
    async fn post_json<T, R>(&self, endpoint: &str, payload: &T) -> Result<R>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("Calling translation service: {}", url);

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .with_context(|| format!("Failed to POST to {}", url))?;

        let status = response.status();
        if status.is_success() {
            response
                .json::<R>()
                .await
                .context("Failed to parse JSON response")
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<ServiceError>(&error_text)
                .map(|e| e.error)
                .unwrap_or(error_text);

            error!("Translation service error response: {}", message);
            anyhow::bail!("HTTP {} error: {}", status, message)
        }
    }
}

#[async_trait]
impl Translator for TranslationClient {
    async fn detect_language(&self, text: &str) -> Result<String> {
        let payload = DetectRequest {
            q: text,
            api_key: self.api_key.as_deref(),
        };
        let detected: Vec<DetectedLanguage> = self.post_json(DETECT_ENDPOINT, &payload).await?;

        detected
            .into_iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
            .map(|d| d.language)
            .context("Translation service detected no language")
    }

    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let payload = TranslateRequest {
            q: text,
            source,
            target,
            format: "text",
            api_key: self.api_key.as_deref(),
        };
        let response: TranslateResponse = self.post_json(TRANSLATE_ENDPOINT, &payload).await?;
        Ok(response.translated_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::translator::translate_to_english;
    use std::time::Duration;

    #[test]
    fn test_from_settings_without_url_disables_translation() {
        let settings = TranslatorSettings::default();
        assert!(TranslationClient::from_settings(&settings).unwrap().is_none());

        let settings = TranslatorSettings {
            url: Some("  ".to_string()),
            ..TranslatorSettings::default()
        };
        assert!(TranslationClient::from_settings(&settings).unwrap().is_none());
    }

    #[test]
    fn test_base_url_is_trimmed() {
        let settings = TranslatorSettings {
            url: Some("http://localhost:5000/".to_string()),
            ..TranslatorSettings::default()
        };
        let client = TranslationClient::from_settings(&settings).unwrap().unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[tokio::test]
    async fn test_unreachable_service_keeps_original_text() {
        let client =
            TranslationClient::new("http://127.0.0.1:9", None, Duration::from_secs(2)).unwrap();
        assert!(client.detect_language("hallo welt").await.is_err());

        let text = translate_to_english(&client, "hallo welt", Duration::from_secs(3)).await;
        assert_eq!(text, "hallo welt");
    }
}
