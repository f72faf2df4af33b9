//! Speech output
//!
//! Every reply is printed as `NAME: text` and then, when an engine is
//! available, spoken aloud. Engine failures are logged and never reach the
//! caller.

use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::{Config, TtsProvider};
use crate::services::run_program;
use crate::voice::{AudioPlayback, TextToSpeech};
use crate::Result;

/// Extra time allowed per character when a system voice reads text aloud
const SYSTEM_VOICE_MS_PER_CHAR: u64 = 80;

/// Something that can talk to the user
#[async_trait(?Send)]
pub trait Speaker {
    /// Print and speak `text`, returning once playback has finished
    async fn speak(&mut self, text: &str);

    /// Play a tone
    async fn beep(&mut self, freq_hz: u32, duration_ms: u64);
}

/// How synthesized speech is produced
enum Engine {
    /// A platform speech command that plays audio itself
    System(&'static str),
    /// A cloud engine returning MP3 played through cpal
    Cloud(TextToSpeech),
}

/// Prints replies and speaks them through the configured engine
pub struct VoiceSpeaker {
    name: String,
    engine: Option<Engine>,
    playback: Option<AudioPlayback>,
    timeout: Duration,
}

impl VoiceSpeaker {
    /// Initialize the engine once; failures leave speech disabled
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let playback = AudioPlayback::new()
            .inspect_err(|e| tracing::warn!(error = %e, "no audio output, beeps use the terminal bell"))
            .ok();

        let engine = match config.voice.tts_provider {
            TtsProvider::System => system_voice().map(Engine::System),
            TtsProvider::OpenAi | TtsProvider::ElevenLabs => {
                TextToSpeech::from_config(&config.voice, &config.api_keys, config.timeouts.tts)
                    .inspect_err(|e| tracing::warn!(error = %e, "speech synthesis unavailable"))
                    .ok()
                    .filter(|_| playback.is_some())
                    .map(Engine::Cloud)
            }
        };

        if engine.is_none() {
            tracing::warn!("speech engine unavailable, replies will only be printed");
        }

        Self {
            name: config.name.clone(),
            engine,
            playback,
            timeout: config.timeouts.tts,
        }
    }

    /// Whether replies are spoken as well as printed
    #[must_use]
    pub const fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    async fn say_aloud(&self, text: &str) -> Result<()> {
        match &self.engine {
            None => Ok(()),
            Some(Engine::System(program)) => {
                let limit = self.timeout
                    + Duration::from_millis(SYSTEM_VOICE_MS_PER_CHAR * text.len() as u64);
                if *program == "powershell" {
                    let script = format!(
                        "Add-Type -AssemblyName System.Speech; (New-Object System.Speech.Synthesis.SpeechSynthesizer).Speak('{}')",
                        text.replace('\'', "''")
                    );
                    run_program(program, &["-NoProfile", "-Command", &script], limit).await?;
                } else {
                    run_program(program, &[text], limit).await?;
                }
                Ok(())
            }
            Some(Engine::Cloud(tts)) => {
                let audio = tts.synthesize(text).await?;
                match &self.playback {
                    Some(playback) => playback.play_mp3(&audio),
                    None => Ok(()),
                }
            }
        }
    }
}

#[async_trait(?Send)]
impl Speaker for VoiceSpeaker {
    async fn speak(&mut self, text: &str) {
        println!("{}: {text}", self.name);
        if text.trim().is_empty() {
            return;
        }
        if let Err(e) = self.say_aloud(text).await {
            tracing::warn!(error = %e, "speech failed");
        }
    }

    async fn beep(&mut self, freq_hz: u32, duration_ms: u64) {
        match &self.playback {
            Some(playback) => {
                if let Err(e) = playback.beep(freq_hz, duration_ms) {
                    tracing::warn!(error = %e, "beep failed");
                    bell();
                }
            }
            None => bell(),
        }
    }
}

/// Prints replies without audio
#[derive(Debug, Clone)]
pub struct ConsoleSpeaker {
    name: String,
}

impl ConsoleSpeaker {
    /// Speaker printing under `name`
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait(?Send)]
impl Speaker for ConsoleSpeaker {
    async fn speak(&mut self, text: &str) {
        println!("{}: {text}", self.name);
    }

    async fn beep(&mut self, _freq_hz: u32, _duration_ms: u64) {
        bell();
    }
}

/// Terminal bell
fn bell() {
    let mut stdout = std::io::stdout();
    let _ = stdout.write_all(b"\x07");
    let _ = stdout.flush();
}

/// First installed platform speech command
fn system_voice() -> Option<&'static str> {
    let candidates: &[&'static str] = if cfg!(target_os = "macos") {
        &["say"]
    } else if cfg!(target_os = "windows") {
        &["powershell"]
    } else {
        &["espeak-ng", "espeak", "spd-say"]
    };
    let found = candidates.iter().copied().find(|p| which::which(p).is_ok());
    if let Some(program) = found {
        tracing::debug!(program, "using system voice");
    }
    found
}
