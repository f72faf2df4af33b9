//! Configuration management for the assistant

pub mod file;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::Result;

/// Assistant configuration, built once at startup and passed everywhere
#[derive(Debug, Clone)]
pub struct Config {
    /// Name spoken in greetings and printed before each reply
    pub name: String,

    /// Wake word stripped from every command
    pub wake_word: String,

    /// Voice configuration
    pub voice: VoiceConfig,

    /// Conversational fallback configuration
    pub chat: ChatConfig,

    /// API keys
    pub api_keys: ApiKeys,

    /// Outgoing mail account; `None` disables the email task
    pub email: Option<EmailConfig>,

    /// News briefing configuration
    pub news: NewsConfig,

    /// Artifact and media locations
    pub paths: PathsConfig,

    /// Websites and programs reachable through "open"
    pub launch: LaunchConfig,

    /// Per-collaborator time limits
    pub timeouts: Timeouts,
}

/// Speech-to-text backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SttProvider {
    /// `OpenAI` Whisper
    Whisper,
    /// Deepgram
    Deepgram,
}

impl SttProvider {
    /// Parse a provider name, defaulting to Whisper
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "deepgram" => Self::Deepgram,
            _ => Self::Whisper,
        }
    }
}

/// Text-to-speech engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtsProvider {
    /// Platform speech command (`say`, `espeak-ng`, `espeak`)
    System,
    /// `OpenAI` speech API
    OpenAi,
    /// `ElevenLabs` speech API
    ElevenLabs,
}

impl TtsProvider {
    /// Parse an engine name, defaulting to the system command
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "openai" => Self::OpenAi,
            "elevenlabs" => Self::ElevenLabs,
            _ => Self::System,
        }
    }
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Enable microphone input and synthesized output
    pub enabled: bool,

    /// Recognition locale (e.g. "en-US")
    pub language: String,

    /// STT backend
    pub stt_provider: SttProvider,

    /// STT model (e.g. "whisper-1", "nova-2")
    pub stt_model: String,

    /// TTS engine
    pub tts_provider: TtsProvider,

    /// TTS model for cloud engines
    pub tts_model: String,

    /// TTS voice identifier
    pub tts_voice: String,

    /// TTS speed multiplier (0.25 to 4.0)
    pub tts_speed: f32,

    /// Audio attempts before switching to typed input
    pub max_attempts: u32,

    /// Ambient noise calibration window
    pub calibration: Duration,

    /// Longest phrase recorded per attempt
    pub phrase_limit: Duration,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            language: "en-US".to_string(),
            stt_provider: SttProvider::Whisper,
            stt_model: "whisper-1".to_string(),
            tts_provider: TtsProvider::System,
            tts_model: "tts-1".to_string(),
            tts_voice: "nova".to_string(),
            tts_speed: 1.0,
            max_attempts: 3,
            calibration: Duration::from_secs(1),
            phrase_limit: Duration::from_secs(10),
        }
    }
}

/// Conversational fallback configuration
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Generative mode; `None` means ask at startup
    pub generative: Option<bool>,

    /// Gemini model identifier
    pub model: String,

    /// Optional TOML file overlaying the static response table
    pub responses_file: Option<PathBuf>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            generative: None,
            model: "gemini-1.5-flash".to_string(),
            responses_file: None,
        }
    }
}

/// API keys for external services
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// `OpenAI` API key (Whisper and TTS)
    pub openai: Option<String>,

    /// Deepgram API key (optional STT)
    pub deepgram: Option<String>,

    /// `ElevenLabs` API key (optional TTS)
    pub elevenlabs: Option<String>,

    /// Google Gemini API key (generative chat)
    pub gemini: Option<String>,

    /// `NewsAPI` key
    pub news: Option<String>,

    /// `OpenWeatherMap` key
    pub openweather: Option<String>,
}

/// Outgoing mail account
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Sender address, also the SMTP login
    pub address: String,

    /// SMTP password (app password for Gmail)
    pub password: String,

    /// SMTP relay host
    pub smtp_host: String,

    /// SMTP TLS port
    pub smtp_port: u16,
}

/// News briefing configuration
#[derive(Debug, Clone)]
pub struct NewsConfig {
    /// Two-letter country code for top headlines
    pub country: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            country: "in".to_string(),
        }
    }
}

/// Artifact and media locations
#[derive(Debug, Clone)]
pub struct PathsConfig {
    /// Append-only notes log
    pub notes_file: PathBuf,

    /// Append-only meetings log
    pub meetings_file: PathBuf,

    /// Where "create text file" writes
    pub documents_dir: PathBuf,

    /// Where screenshots are saved
    pub screenshots_dir: PathBuf,

    /// Where "play music" looks for tracks
    pub music_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        let desktop = desktop_dir();
        Self {
            notes_file: desktop.join("notes.txt"),
            meetings_file: desktop.join("meetings.txt"),
            documents_dir: desktop,
            screenshots_dir: screenshots_dir(),
            music_dir: music_dir(),
        }
    }
}

impl PathsConfig {
    /// Place every artifact under one directory
    #[must_use]
    pub fn under(dir: &Path) -> Self {
        Self {
            notes_file: dir.join("notes.txt"),
            meetings_file: dir.join("meetings.txt"),
            documents_dir: dir.to_path_buf(),
            screenshots_dir: dir.join("Screenshots"),
            music_dir: dir.join("Music"),
        }
    }
}

/// Websites and programs reachable through "open"
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// Spoken name -> URL
    pub websites: BTreeMap<String, String>,

    /// Spoken name -> program path or name
    pub apps: BTreeMap<String, String>,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        let websites = [
            ("youtube", "https://youtube.com"),
            ("google", "https://google.com"),
            ("stack overflow", "https://stackoverflow.com"),
            ("gmail", "https://mail.google.com"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let apps = default_apps()
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();

        Self { websites, apps }
    }
}

/// Built-in program table for the current platform
#[cfg(target_os = "macos")]
const fn default_apps() -> &'static [(&'static str, &'static str)] {
    &[
        ("notepad", "TextEdit"),
        ("calculator", "Calculator"),
        ("chrome", "Google Chrome"),
        ("vlc", "VLC"),
    ]
}

/// Built-in program table for the current platform
#[cfg(target_os = "windows")]
const fn default_apps() -> &'static [(&'static str, &'static str)] {
    &[
        ("notepad", "notepad.exe"),
        ("calculator", "calc.exe"),
        ("chrome", "C:\\Program Files\\Google\\Chrome\\Application\\chrome.exe"),
        ("vlc", "C:\\Program Files\\VideoLAN\\VLC\\vlc.exe"),
    ]
}

/// Built-in program table for the current platform
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const fn default_apps() -> &'static [(&'static str, &'static str)] {
    &[
        ("notepad", "gedit"),
        ("calculator", "gnome-calculator"),
        ("chrome", "google-chrome"),
        ("vlc", "vlc"),
    ]
}

/// Per-collaborator time limits
#[derive(Debug, Clone)]
pub struct Timeouts {
    /// Single-request HTTP collaborators (weather, news, encyclopedia, chat)
    pub http: Duration,

    /// Speech-to-text submission
    pub stt: Duration,

    /// Speech synthesis
    pub tts: Duration,

    /// Download + upload measurement
    pub speed_test: Duration,

    /// SMTP submission
    pub email: Duration,

    /// Launching a program or screenshot tool
    pub launch: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            http: Duration::from_secs(15),
            stt: Duration::from_secs(30),
            tts: Duration::from_secs(30),
            speed_test: Duration::from_secs(90),
            email: Duration::from_secs(30),
            launch: Duration::from_secs(10),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: "ELSA".to_string(),
            wake_word: "elsa".to_string(),
            voice: VoiceConfig::default(),
            chat: ChatConfig::default(),
            api_keys: ApiKeys::default(),
            email: None,
            news: NewsConfig::default(),
            paths: PathsConfig::default(),
            launch: LaunchConfig::default(),
            timeouts: Timeouts::default(),
        }
    }
}

/// `~/Desktop`, or the current directory when no home is known
fn desktop_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from("."),
        |d| {
            d.desktop_dir()
                .map_or_else(|| d.home_dir().join("Desktop"), Path::to_path_buf)
        },
    )
}

/// `~/Pictures/Screenshots`
fn screenshots_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from("Screenshots"),
        |d| {
            d.picture_dir()
                .map_or_else(|| d.home_dir().join("Pictures"), Path::to_path_buf)
                .join("Screenshots")
        },
    )
}

/// `~/Music`
fn music_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from("Music"),
        |d| {
            d.audio_dir()
                .map_or_else(|| d.home_dir().join("Music"), Path::to_path_buf)
        },
    )
}

/// Read an environment variable, treating empty values as unset
fn env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Interpret "1"/"true"/"yes" as true and "0"/"false"/"no" as false
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Load configuration from environment, config file and defaults
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is unusable
    pub fn load() -> Result<Self> {
        Self::load_with_options(false)
    }

    /// Load configuration with explicit voice disable option
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is unusable
    pub fn load_with_options(disable_voice: bool) -> Result<Self> {
        // env > toml > default
        let fc = file::load_config_file();
        let defaults = Self::default();

        let api_keys = ApiKeys {
            openai: env("OPENAI_API_KEY").or(fc.api_keys.openai),
            deepgram: env("DEEPGRAM_API_KEY").or(fc.api_keys.deepgram),
            elevenlabs: env("ELEVENLABS_API_KEY").or(fc.api_keys.elevenlabs),
            gemini: env("GEMINI_API_KEY").or(fc.api_keys.gemini),
            news: env("NEWS_API_KEY").or(fc.api_keys.news),
            openweather: env("OPENWEATHER_API_KEY").or(fc.api_keys.openweather),
        };

        let voice_defaults = defaults.voice;
        let voice_enabled = if disable_voice {
            tracing::info!("voice explicitly disabled via --text");
            false
        } else {
            env("ELSA_VOICE")
                .and_then(|v| parse_flag(&v))
                .or(fc.voice.enabled)
                .unwrap_or(voice_defaults.enabled)
        };
        let voice = VoiceConfig {
            enabled: voice_enabled,
            language: env("ELSA_LANGUAGE")
                .or(fc.voice.language)
                .unwrap_or(voice_defaults.language),
            stt_provider: env("ELSA_STT_PROVIDER")
                .or(fc.voice.stt_provider)
                .map_or(voice_defaults.stt_provider, |s| SttProvider::from_str(&s)),
            stt_model: env("ELSA_STT_MODEL")
                .or(fc.voice.stt_model)
                .unwrap_or(voice_defaults.stt_model),
            tts_provider: env("ELSA_TTS_PROVIDER")
                .or(fc.voice.tts_provider)
                .map_or(voice_defaults.tts_provider, |s| TtsProvider::from_str(&s)),
            tts_model: env("ELSA_TTS_MODEL")
                .or(fc.voice.tts_model)
                .unwrap_or(voice_defaults.tts_model),
            tts_voice: env("ELSA_TTS_VOICE")
                .or(fc.voice.tts_voice)
                .unwrap_or(voice_defaults.tts_voice),
            tts_speed: fc.voice.tts_speed.unwrap_or(voice_defaults.tts_speed),
            max_attempts: fc
                .voice
                .max_attempts
                .filter(|n| *n > 0)
                .unwrap_or(voice_defaults.max_attempts),
            calibration: voice_defaults.calibration,
            phrase_limit: fc
                .voice
                .phrase_limit_secs
                .map_or(voice_defaults.phrase_limit, Duration::from_secs),
        };

        let chat = ChatConfig {
            generative: env("ELSA_GENERATIVE")
                .and_then(|v| parse_flag(&v))
                .or(fc.chat.generative),
            model: env("ELSA_GEMINI_MODEL")
                .or(fc.chat.model)
                .unwrap_or(defaults.chat.model),
            responses_file: env("ELSA_RESPONSES_FILE")
                .or(fc.chat.responses_file)
                .map(PathBuf::from),
        };

        // Both halves of the credential pair are required
        let email = match (
            env("EMAIL_ADDRESS").or(fc.email.address),
            env("EMAIL_PASSWORD").or(fc.email.password),
        ) {
            (Some(address), Some(password)) => Some(EmailConfig {
                address,
                password,
                smtp_host: env("ELSA_SMTP_HOST")
                    .or(fc.email.smtp_host)
                    .unwrap_or_else(|| "smtp.gmail.com".to_string()),
                smtp_port: env("ELSA_SMTP_PORT")
                    .and_then(|s| s.parse().ok())
                    .or(fc.email.smtp_port)
                    .unwrap_or(465),
            }),
            _ => {
                tracing::debug!("email credentials not configured");
                None
            }
        };

        let news = NewsConfig {
            country: env("ELSA_NEWS_COUNTRY")
                .or(fc.news.country)
                .unwrap_or(defaults.news.country),
        };

        let path_defaults = defaults.paths;
        let paths = PathsConfig {
            notes_file: env("ELSA_NOTES_FILE")
                .or(fc.paths.notes_file)
                .map_or(path_defaults.notes_file, PathBuf::from),
            meetings_file: env("ELSA_MEETINGS_FILE")
                .or(fc.paths.meetings_file)
                .map_or(path_defaults.meetings_file, PathBuf::from),
            documents_dir: env("ELSA_DOCUMENTS_DIR")
                .or(fc.paths.documents_dir)
                .map_or(path_defaults.documents_dir, PathBuf::from),
            screenshots_dir: env("ELSA_SCREENSHOT_DIR")
                .or(fc.paths.screenshots_dir)
                .map_or(path_defaults.screenshots_dir, PathBuf::from),
            music_dir: env("ELSA_MUSIC_DIR")
                .or(fc.paths.music_dir)
                .map_or(path_defaults.music_dir, PathBuf::from),
        };

        // File entries extend the built-in tables rather than replace them
        let mut launch = defaults.launch;
        launch.websites.extend(
            fc.websites
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v)),
        );
        launch
            .apps
            .extend(fc.apps.into_iter().map(|(k, v)| (k.to_lowercase(), v)));

        let config = Self {
            name: env("ELSA_NAME")
                .or(fc.assistant.name)
                .unwrap_or(defaults.name),
            wake_word: env("ELSA_WAKE_WORD")
                .or(fc.assistant.wake_word)
                .unwrap_or(defaults.wake_word)
                .to_lowercase(),
            voice,
            chat,
            api_keys,
            email,
            news,
            paths,
            launch,
            timeouts: defaults.timeouts,
        };

        config.warn_missing_keys();
        Ok(config)
    }

    /// Log which tasks are disabled for lack of credentials
    fn warn_missing_keys(&self) {
        if self.api_keys.openweather.is_none() {
            tracing::warn!("OPENWEATHER_API_KEY not set, weather reports disabled");
        }
        if self.api_keys.news.is_none() {
            tracing::warn!("NEWS_API_KEY not set, news briefings disabled");
        }
        if self.api_keys.gemini.is_none() {
            tracing::warn!("GEMINI_API_KEY not set, using static responses");
        }
        if self.email.is_none() {
            tracing::warn!("EMAIL_ADDRESS/EMAIL_PASSWORD not set, email disabled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.wake_word, "elsa");
        assert_eq!(config.voice.max_attempts, 3);
        assert_eq!(config.voice.phrase_limit, Duration::from_secs(10));
        assert_eq!(config.news.country, "in");
        assert!(config.chat.generative.is_none());
        assert!(config.launch.websites.contains_key("stack overflow"));
        assert!(config.launch.apps.contains_key("calculator"));
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!(SttProvider::from_str("Deepgram"), SttProvider::Deepgram);
        assert_eq!(SttProvider::from_str("anything"), SttProvider::Whisper);
        assert_eq!(TtsProvider::from_str("OPENAI"), TtsProvider::OpenAi);
        assert_eq!(TtsProvider::from_str("elevenlabs"), TtsProvider::ElevenLabs);
        assert_eq!(TtsProvider::from_str(""), TtsProvider::System);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("YES"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_paths_under() {
        let paths = PathsConfig::under(Path::new("/tmp/elsa"));
        assert_eq!(paths.notes_file, PathBuf::from("/tmp/elsa/notes.txt"));
        assert_eq!(paths.meetings_file, PathBuf::from("/tmp/elsa/meetings.txt"));
    }
}
