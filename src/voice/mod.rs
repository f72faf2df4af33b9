//! Voice processing module
//!
//! Handles audio capture, utterance detection, playback, and the
//! speech-to-text and text-to-speech clients.

mod capture;
mod playback;
mod stt;
mod tts;
mod vad;

pub use capture::{AudioCapture, SAMPLE_RATE, samples_to_wav};
pub use playback::{AudioPlayback, PLAYBACK_SAMPLE_RATE, sine_tone};
pub use stt::SpeechToText;
pub use tts::TextToSpeech;
pub use vad::{DetectorState, UtteranceDetector};
