//! Speech-to-text (STT) clients

use std::time::Duration;

use crate::config::{ApiKeys, SttProvider, VoiceConfig};
use crate::{Error, Result};

/// Response from `OpenAI` Whisper transcription API
#[derive(serde::Deserialize)]
struct WhisperResponse {
    text: String,
}

/// Response from Deepgram transcription API
#[derive(serde::Deserialize)]
struct DeepgramResponse {
    results: DeepgramResults,
}

#[derive(serde::Deserialize)]
struct DeepgramResults {
    channels: Vec<DeepgramChannel>,
}

#[derive(serde::Deserialize)]
struct DeepgramChannel {
    alternatives: Vec<DeepgramAlternative>,
}

#[derive(serde::Deserialize)]
struct DeepgramAlternative {
    transcript: String,
}

/// Transcribes WAV audio to text
pub struct SpeechToText {
    client: reqwest::Client,
    api_key: String,
    model: String,
    language: String,
    provider: SttProvider,
}

impl SpeechToText {
    /// Build the client selected by the voice configuration
    ///
    /// # Errors
    ///
    /// Returns error if the provider's API key is missing
    pub fn from_config(voice: &VoiceConfig, keys: &ApiKeys, timeout: Duration) -> Result<Self> {
        let (api_key, name) = match voice.stt_provider {
            SttProvider::Whisper => (keys.openai.clone(), "OPENAI_API_KEY"),
            SttProvider::Deepgram => (keys.deepgram.clone(), "DEEPGRAM_API_KEY"),
        };
        let api_key = api_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Config(format!("{name} required for speech recognition")))?;

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            model: voice.stt_model.clone(),
            language: voice.language.clone(),
            provider: voice.stt_provider,
        })
    }

    /// Transcribe WAV audio to text
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stt`] or [`Error::Http`] if the service fails
    pub async fn transcribe(&self, audio: &[u8]) -> Result<String> {
        match self.provider {
            SttProvider::Whisper => self.transcribe_whisper(audio).await,
            SttProvider::Deepgram => self.transcribe_deepgram(audio).await,
        }
    }

    /// Whisper wants ISO-639-1 ("en"), not a locale ("en-US")
    fn language_code(&self) -> &str {
        self.language
            .split(['-', '_'])
            .next()
            .unwrap_or(&self.language)
    }

    async fn transcribe_whisper(&self, audio: &[u8]) -> Result<String> {
        tracing::debug!(audio_bytes = audio.len(), "starting Whisper transcription");

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(audio.to_vec())
                    .file_name("audio.wav")
                    .mime_str("audio/wav")
                    .map_err(|e| Error::Stt(e.to_string()))?,
            )
            .text("model", self.model.clone())
            .text("language", self.language_code().to_string());

        let response = self
            .client
            .post("https://api.openai.com/v1/audio/transcriptions")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Whisper request failed");
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Whisper API error");
            return Err(Error::Stt(format!("Whisper API error {status}: {body}")));
        }

        let result: WhisperResponse = response.json().await?;
        tracing::debug!(transcript = %result.text, "transcription complete");
        Ok(result.text)
    }

    async fn transcribe_deepgram(&self, audio: &[u8]) -> Result<String> {
        tracing::debug!(audio_bytes = audio.len(), "starting Deepgram transcription");

        let url = format!(
            "https://api.deepgram.com/v1/listen?model={}&language={}&punctuate=true",
            urlencoding::encode(&self.model),
            urlencoding::encode(&self.language)
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Token {}", self.api_key))
            .header("Content-Type", "audio/wav")
            .body(audio.to_vec())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Deepgram request failed");
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Deepgram API error");
            return Err(Error::Stt(format!("Deepgram API error {status}: {body}")));
        }

        let result: DeepgramResponse = response.json().await?;
        let transcript = result
            .results
            .channels
            .into_iter()
            .next()
            .and_then(|c| c.alternatives.into_iter().next())
            .map(|a| a.transcript)
            .unwrap_or_default();

        tracing::debug!(transcript = %transcript, "transcription complete");
        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_config_error() {
        let voice = VoiceConfig::default();
        let keys = ApiKeys::default();
        let result = SpeechToText::from_config(&voice, &keys, Duration::from_secs(5));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_language_code_strips_region() {
        let voice = VoiceConfig::default();
        let keys = ApiKeys {
            openai: Some("sk-test".to_string()),
            ..ApiKeys::default()
        };
        let stt = SpeechToText::from_config(&voice, &keys, Duration::from_secs(5)).unwrap();
        assert_eq!(stt.language_code(), "en");
    }
}
