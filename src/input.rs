//! Command input
//!
//! The [`InputAdapter`] turns whatever the user said or typed into a
//! normalized command. Voice is tried a bounded number of times; after that
//! the adapter falls back to a typed line so the session never stalls.

use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use regex::Regex;

use crate::config::Config;
use crate::services;
use crate::speech::Speaker;
use crate::voice::{AudioCapture, SAMPLE_RATE, SpeechToText, UtteranceDetector, samples_to_wav};
use crate::{Error, Result};

/// Spoken when audio contained no recognizable speech
pub const UNINTELLIGIBLE_REPLY: &str = "Sorry, I did not understand. Please repeat.";

/// Spoken when the recognition service failed
pub const SERVICE_UNAVAILABLE_REPLY: &str = "Speech service is unavailable.";

/// Printed before switching to typed input
pub const MANUAL_FALLBACK_NOTICE: &str = "No voice detected, switching to manual input.";

/// How often the microphone buffer is drained while recording
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Produces one transcript per call
///
/// Errors: [`Error::Unintelligible`] for audio without recognizable speech,
/// [`Error::Stt`] when the recognition service fails, anything else for
/// device problems.
#[async_trait(?Send)]
pub trait Listener {
    /// Record one phrase and transcribe it
    async fn listen(&mut self) -> Result<String>;
}

/// Line-oriented text input
pub trait TextChannel {
    /// Show `prompt` and read one line
    ///
    /// # Errors
    ///
    /// Returns error at end of input or on read failure
    fn read_line(&mut self, prompt: &str) -> Result<String>;
}

/// Standard input
#[derive(Debug, Default)]
pub struct ConsoleChannel;

impl TextChannel for ConsoleChannel {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        let mut stdout = std::io::stdout();
        write!(stdout, "{prompt}")?;
        stdout.flush()?;

        let mut line = String::new();
        let read = std::io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "end of input",
            )));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Microphone + speech-to-text listener
pub struct MicListener {
    capture: AudioCapture,
    stt: SpeechToText,
    detector: UtteranceDetector,
    calibration: Duration,
    phrase_limit: Duration,
    stt_timeout: Duration,
}

impl MicListener {
    /// Open the microphone and the configured STT client
    ///
    /// # Errors
    ///
    /// Returns error if there is no usable input device or STT key
    pub fn from_config(config: &Config) -> Result<Self> {
        let stt = SpeechToText::from_config(&config.voice, &config.api_keys, config.timeouts.stt)?;
        let capture = AudioCapture::new()?;

        Ok(Self {
            capture,
            stt,
            detector: UtteranceDetector::new(),
            calibration: config.voice.calibration,
            phrase_limit: config.voice.phrase_limit,
            stt_timeout: config.timeouts.stt,
        })
    }

    /// Calibrate, then record until the phrase ends or the limit passes
    async fn record(&mut self) -> Result<Vec<f32>> {
        tokio::time::sleep(self.calibration).await;
        self.detector.calibrate(&self.capture.take_buffer());
        self.detector.reset();

        let deadline = Instant::now() + self.phrase_limit;
        loop {
            tokio::time::sleep(POLL_INTERVAL).await;
            let chunk = self.capture.take_buffer();
            if self.detector.process(&chunk) || Instant::now() >= deadline {
                break;
            }
        }

        if !self.detector.heard_speech() {
            return Err(Error::Unintelligible);
        }
        Ok(self.detector.take_speech_buffer())
    }
}

#[async_trait(?Send)]
impl Listener for MicListener {
    async fn listen(&mut self) -> Result<String> {
        println!("Listening...");
        self.capture.clear_buffer();
        self.capture.start()?;
        let recorded = self.record().await;
        self.capture.stop();

        let wav = samples_to_wav(&recorded?, SAMPLE_RATE)?;
        let transcript = services::call(
            "speech recognition",
            self.stt_timeout,
            self.stt.transcribe(&wav),
        )
        .await
        .map_err(|e| match e {
            Error::Stt(_) | Error::Unintelligible => e,
            other => Error::Stt(other.to_string()),
        })?;

        if transcript.trim().is_empty() {
            return Err(Error::Unintelligible);
        }
        Ok(transcript)
    }
}

/// Lowercase, strip the wake word (with trailing punctuation) and trim
#[must_use]
pub fn normalize(text: &str, wake_word: &str) -> String {
    let lower = text.to_lowercase();
    let wake_word = wake_word.trim().to_lowercase();
    if wake_word.is_empty() {
        return lower.trim().to_string();
    }

    match Regex::new(&format!(r"\b{}\b[,.!?]?\s*", regex::escape(&wake_word))) {
        Ok(pattern) => pattern.replace_all(&lower, "").trim().to_string(),
        Err(e) => {
            tracing::warn!(error = %e, wake_word, "invalid wake word pattern");
            lower.trim().to_string()
        }
    }
}

/// Voice input with bounded retries and a typed fallback
pub struct InputAdapter {
    listener: Option<Box<dyn Listener>>,
    text: Box<dyn TextChannel>,
    wake_word: String,
    max_attempts: u32,
    closed: bool,
}

impl InputAdapter {
    /// Adapter over an optional listener and a text channel
    #[must_use]
    pub fn new(
        listener: Option<Box<dyn Listener>>,
        text: Box<dyn TextChannel>,
        wake_word: impl Into<String>,
        max_attempts: u32,
    ) -> Self {
        Self {
            listener,
            text,
            wake_word: wake_word.into(),
            max_attempts: max_attempts.max(1),
            closed: false,
        }
    }

    /// Build from configuration
    ///
    /// Voice is used when enabled and the microphone and STT client open;
    /// otherwise commands are typed.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let listener: Option<Box<dyn Listener>> = if config.voice.enabled {
            match MicListener::from_config(config) {
                Ok(mic) => Some(Box::new(mic)),
                Err(e) => {
                    tracing::warn!(error = %e, "voice input unavailable, using typed input");
                    None
                }
            }
        } else {
            None
        };

        Self::new(
            listener,
            Box::new(ConsoleChannel),
            config.wake_word.clone(),
            config.voice.max_attempts,
        )
    }

    /// Whether the text stream has ended
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether commands are listened for rather than typed
    #[must_use]
    pub const fn has_voice(&self) -> bool {
        self.listener.is_some()
    }

    /// Get the next normalized command; empty once input is closed
    pub async fn capture(&mut self, speaker: &mut dyn Speaker) -> String {
        if self.closed {
            return String::new();
        }

        let Some(listener) = self.listener.as_mut() else {
            return self.typed("You: ");
        };

        for attempt in 1..=self.max_attempts {
            match listener.listen().await {
                Ok(transcript) => {
                    let command = normalize(&transcript, &self.wake_word);
                    println!("User said: {command}");
                    return command;
                }
                Err(Error::Unintelligible) => {
                    tracing::debug!(attempt, "unintelligible audio");
                    speaker.speak(UNINTELLIGIBLE_REPLY).await;
                }
                Err(e @ (Error::Stt(_) | Error::Http(_) | Error::Timeout { .. })) => {
                    tracing::warn!(attempt, error = %e, "speech recognition failed");
                    speaker.speak(SERVICE_UNAVAILABLE_REPLY).await;
                }
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "voice input error");
                }
            }
        }

        println!("{MANUAL_FALLBACK_NOTICE}");
        self.typed("Type your command: ")
    }

    /// Read a typed line without normalization (addresses, times)
    ///
    /// Returns an empty string once input is closed.
    pub fn read_typed(&mut self, prompt: &str) -> String {
        if self.closed {
            return String::new();
        }
        match self.text.read_line(prompt) {
            Ok(line) => line.trim().to_string(),
            Err(e) => {
                self.close(&e);
                String::new()
            }
        }
    }

    fn typed(&mut self, prompt: &str) -> String {
        match self.text.read_line(prompt) {
            Ok(line) => normalize(&line, &self.wake_word),
            Err(e) => {
                self.close(&e);
                String::new()
            }
        }
    }

    fn close(&mut self, reason: &Error) {
        tracing::info!(reason = %reason, "text input closed");
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_wake_word() {
        assert_eq!(normalize("Elsa, open YouTube", "elsa"), "open youtube");
        assert_eq!(normalize("hey ELSA! what time is it", "elsa"), "hey what time is it");
        assert_eq!(normalize("  Tell me a joke  ", "elsa"), "tell me a joke");
    }

    #[test]
    fn test_normalize_respects_word_boundaries() {
        assert_eq!(normalize("play elsavador radio", "elsa"), "play elsavador radio");
        assert_eq!(normalize("open youtube", ""), "open youtube");
    }
}
