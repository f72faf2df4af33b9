//! Generative replies through the Gemini `generateContent` API

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Produces free-form replies to a prompt
#[async_trait(?Send)]
pub trait Generator {
    /// Generate a reply; may return empty text
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Gemini REST client
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Create a client for `model`
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty or the HTTP client cannot be built
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config("GEMINI_API_KEY required for generative chat".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            api_key,
            model,
        })
    }
}

#[async_trait(?Send)]
impl Generator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{GEMINI_BASE_URL}/{}:generateContent", self.model);
        let body = GeminiRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::service("gemini", format!("{status}: {text}")));
        }

        let parsed: GeminiResponse = response.json().await?;
        let text = parsed
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect::<String>())
            .unwrap_or_default();

        tracing::debug!(model = %self.model, chars = text.len(), "generated reply");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let body = GeminiRequest {
            contents: [Content {
                parts: [Part { text: "hi" }],
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
    }

    #[test]
    fn test_blocked_response_parses_to_no_text() {
        let parsed: GeminiResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        let candidate = parsed.candidates.unwrap().into_iter().next().unwrap();
        assert!(candidate.content.is_none());
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(GeminiClient::new(String::new(), "m".into(), Duration::from_secs(1)).is_err());
    }
}
