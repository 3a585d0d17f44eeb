// src/types/response.rs
//! Wire types of the LibreTranslate-compatible translation service

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct DetectRequest<'a> {
    pub q: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetectedLanguage {
    pub language: String,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Debug, Serialize)]
pub struct TranslateRequest<'a> {
    pub q: &'a str,
    pub source: &'a str,
    pub target: &'a str,
    pub format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct TranslateResponse {
    #[serde(rename = "translatedText")]
    pub translated_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ServiceError {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_request_omits_missing_key() {
        let request = TranslateRequest {
            q: "hallo",
            source: "de",
            target: "en",
            format: "text",
            api_key: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["source"], "de");
        assert!(json.get("api_key").is_none());
    }

    #[test]
    fn test_parse_service_payloads() {
        let detected: Vec<DetectedLanguage> =
            serde_json::from_str(r#"[{"language":"de","confidence":92.0}]"#).unwrap();
        assert_eq!(detected[0].language, "de");

        let translated: TranslateResponse =
            serde_json::from_str(r#"{"translatedText":"hello"}"#).unwrap();
        assert_eq!(translated.translated_text, "hello");
    }
}
