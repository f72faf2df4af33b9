//! Text-to-speech (TTS) clients for the cloud engines

use std::time::Duration;

use crate::config::{ApiKeys, TtsProvider, VoiceConfig};
use crate::{Error, Result};

/// Default ElevenLabs model when the configured model is an `OpenAI` one
const ELEVENLABS_DEFAULT_MODEL: &str = "eleven_monolingual_v1";

/// Cloud engine backend
#[derive(Clone, Copy, Debug)]
enum Backend {
    OpenAi,
    ElevenLabs,
}

/// Synthesizes MP3 speech from text
pub struct TextToSpeech {
    client: reqwest::Client,
    api_key: String,
    voice: String,
    speed: f32,
    model: String,
    backend: Backend,
}

impl TextToSpeech {
    /// Build the cloud client selected by the voice configuration
    ///
    /// # Errors
    ///
    /// Returns error if the engine is `system` (no client needed) or its
    /// API key is missing
    pub fn from_config(voice: &VoiceConfig, keys: &ApiKeys, timeout: Duration) -> Result<Self> {
        let (backend, api_key, name) = match voice.tts_provider {
            TtsProvider::System => {
                return Err(Error::Config(
                    "system speech engine has no cloud client".to_string(),
                ));
            }
            TtsProvider::OpenAi => (Backend::OpenAi, keys.openai.clone(), "OPENAI_API_KEY"),
            TtsProvider::ElevenLabs => (
                Backend::ElevenLabs,
                keys.elevenlabs.clone(),
                "ELEVENLABS_API_KEY",
            ),
        };
        let api_key = api_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Config(format!("{name} required for speech synthesis")))?;

        let model = match backend {
            Backend::ElevenLabs if voice.tts_model.starts_with("tts-") => {
                ELEVENLABS_DEFAULT_MODEL.to_string()
            }
            _ => voice.tts_model.clone(),
        };

        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            api_key,
            voice: voice.tts_voice.clone(),
            speed: voice.tts_speed.clamp(0.25, 4.0),
            model,
            backend,
        })
    }

    /// Synthesize text to MP3 bytes
    ///
    /// # Errors
    ///
    /// Returns error if synthesis fails
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        match self.backend {
            Backend::OpenAi => self.synthesize_openai(text).await,
            Backend::ElevenLabs => self.synthesize_elevenlabs(text).await,
        }
    }

    async fn synthesize_openai(&self, text: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct TtsRequest<'a> {
            model: &'a str,
            input: &'a str,
            voice: &'a str,
            speed: f32,
            response_format: &'a str,
        }

        let request = TtsRequest {
            model: &self.model,
            input: text,
            voice: &self.voice,
            speed: self.speed,
            response_format: "mp3",
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/audio/speech")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("OpenAI TTS error {status}: {body}")));
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn synthesize_elevenlabs(&self, text: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct ElevenLabsRequest<'a> {
            text: &'a str,
            model_id: &'a str,
        }

        let url = format!(
            "https://api.elevenlabs.io/v1/text-to-speech/{}",
            urlencoding::encode(&self.voice)
        );

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .header("Accept", "audio/mpeg")
            .json(&ElevenLabsRequest {
                text,
                model_id: &self.model,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("ElevenLabs TTS error {status}: {body}")));
        }

        Ok(response.bytes().await?.to_vec())
    }
}
