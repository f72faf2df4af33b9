//! TOML configuration file loading
//!
//! Supports `~/.config/elsa/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ElsaConfigFile {
    /// Assistant identity
    #[serde(default)]
    pub assistant: AssistantFileConfig,

    /// Voice/audio configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// Conversational fallback configuration
    #[serde(default)]
    pub chat: ChatFileConfig,

    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,

    /// Outgoing mail account
    #[serde(default)]
    pub email: EmailFileConfig,

    /// News briefing
    #[serde(default)]
    pub news: NewsFileConfig,

    /// Where artifacts are written and media is read
    #[serde(default)]
    pub paths: PathsFileConfig,

    /// Spoken name -> URL for the "open" command
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub websites: BTreeMap<String, String>,

    /// Spoken name -> program for the "open" command
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub apps: BTreeMap<String, String>,
}

/// Assistant identity
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AssistantFileConfig {
    /// Name used in greetings and printed output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Wake word stripped from commands
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wake_word: Option<String>,
}

/// Voice processing configuration
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct VoiceFileConfig {
    /// Enable microphone input and spoken output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Recognition locale (e.g. "en-US")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// STT provider ("whisper" or "deepgram")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stt_provider: Option<String>,

    /// STT model (e.g. "whisper-1")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stt_model: Option<String>,

    /// TTS engine ("system", "openai" or "elevenlabs")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts_provider: Option<String>,

    /// TTS model (e.g. "tts-1")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts_model: Option<String>,

    /// TTS voice identifier (e.g. "nova")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts_voice: Option<String>,

    /// TTS speed multiplier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts_speed: Option<f32>,

    /// Audio attempts before switching to typed input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,

    /// Longest phrase recorded per attempt, in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phrase_limit_secs: Option<u64>,
}

/// Conversational fallback configuration
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatFileConfig {
    /// Use the generative collaborator (asked at startup when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generative: Option<bool>,

    /// Gemini model identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Extra static responses (TOML table of phrase = reply)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses_file: Option<String>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiKeysFileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deepgram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevenlabs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub news: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openweather: Option<String>,
}

/// Outgoing mail account
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EmailFileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smtp_host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smtp_port: Option<u16>,
}

/// News briefing
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NewsFileConfig {
    /// Two-letter country code for top headlines
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Artifact and media locations
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PathsFileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meetings_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshots_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music_dir: Option<String>,
}

/// Load the TOML config file from the standard path
///
/// Returns `ElsaConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> ElsaConfigFile {
    let Some(path) = config_file_path() else {
        return ElsaConfigFile::default();
    };

    if !path.exists() {
        return ElsaConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                ElsaConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            ElsaConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/elsa/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("elsa").join("config.toml"))
}
