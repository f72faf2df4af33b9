//! Utterance detection
//!
//! Finds the start and end of a spoken phrase in the microphone stream
//! using RMS energy against a threshold calibrated from ambient noise.

/// Energy floor below which audio is never treated as speech
const ENERGY_THRESHOLD: f32 = 0.03;

/// Calibrated threshold is this many times the ambient energy
const AMBIENT_MULTIPLIER: f32 = 1.5;

/// Minimum duration of speech to count as a phrase (in samples at 16kHz)
const MIN_SPEECH_SAMPLES: usize = 4800; // 0.3 seconds

/// Silence duration that ends a phrase (in samples)
const SILENCE_SAMPLES: usize = 8000; // 0.5 seconds

/// State of the utterance detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    /// Waiting for speech
    Idle,
    /// Speech started, accumulating
    Listening,
    /// Speech followed by enough silence
    Complete,
}

/// Detects a single spoken phrase in a stream of samples
#[derive(Debug)]
pub struct UtteranceDetector {
    threshold: f32,
    state: DetectorState,
    speech_buffer: Vec<f32>,
    silence_counter: usize,
}

impl Default for UtteranceDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl UtteranceDetector {
    /// Create a detector using the fixed energy floor
    #[must_use]
    pub const fn new() -> Self {
        Self {
            threshold: ENERGY_THRESHOLD,
            state: DetectorState::Idle,
            speech_buffer: Vec::new(),
            silence_counter: 0,
        }
    }

    /// Adjust the speech threshold to the ambient noise in `samples`
    pub fn calibrate(&mut self, samples: &[f32]) {
        let ambient = calculate_energy(samples);
        self.threshold = (ambient * AMBIENT_MULTIPLIER).max(ENERGY_THRESHOLD);
        tracing::debug!(ambient, threshold = self.threshold, "calibrated for ambient noise");
    }

    /// Process audio samples
    ///
    /// Returns true once a phrase has been followed by enough silence
    pub fn process(&mut self, samples: &[f32]) -> bool {
        let energy = calculate_energy(samples);
        let is_speech = energy > self.threshold;

        match self.state {
            DetectorState::Idle => {
                if is_speech {
                    self.state = DetectorState::Listening;
                    self.speech_buffer.clear();
                    self.speech_buffer.extend_from_slice(samples);
                    self.silence_counter = 0;
                    tracing::trace!(energy, "speech detected, listening");
                }
            }
            DetectorState::Listening => {
                self.speech_buffer.extend_from_slice(samples);

                if is_speech {
                    self.silence_counter = 0;
                } else {
                    self.silence_counter += samples.len();
                }

                if self.silence_counter > SILENCE_SAMPLES
                    && self.speech_buffer.len() > MIN_SPEECH_SAMPLES
                {
                    tracing::debug!(
                        samples = self.speech_buffer.len(),
                        "speech segment complete"
                    );
                    self.state = DetectorState::Complete;
                    return true;
                }

                // Too much silence without enough speech: a click or a cough
                if self.silence_counter > SILENCE_SAMPLES * 2 {
                    tracing::trace!("timeout - resetting");
                    self.reset();
                }
            }
            DetectorState::Complete => return true,
        }

        false
    }

    /// Whether any speech has been heard since the last reset
    #[must_use]
    pub fn heard_speech(&self) -> bool {
        self.state != DetectorState::Idle
    }

    /// Take the speech buffer, clearing it
    pub fn take_speech_buffer(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.speech_buffer)
    }

    /// Reset detector to idle state, keeping the calibration
    pub fn reset(&mut self) {
        self.state = DetectorState::Idle;
        self.speech_buffer.clear();
        self.silence_counter = 0;
    }

    /// Get current state
    #[must_use]
    pub const fn state(&self) -> DetectorState {
        self.state
    }

    /// Current speech threshold
    #[must_use]
    pub const fn threshold(&self) -> f32 {
        self.threshold
    }
}

/// Calculate RMS energy of audio samples
#[allow(clippy::cast_precision_loss)]
fn calculate_energy(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_calculation() {
        let silence = vec![0.0f32; 100];
        assert!(calculate_energy(&silence) < 0.001);

        let loud = vec![0.5f32; 100];
        assert!(calculate_energy(&loud) > 0.4);
    }

    #[test]
    fn test_calibration_raises_threshold() {
        let mut detector = UtteranceDetector::new();
        detector.calibrate(&[0.0; 1600]);
        assert!((detector.threshold() - ENERGY_THRESHOLD).abs() < f32::EPSILON);

        detector.calibrate(&[0.1; 1600]);
        assert!(detector.threshold() > 0.14);
    }

    #[test]
    fn test_phrase_then_silence_completes() {
        let mut detector = UtteranceDetector::new();
        assert!(!detector.process(&[0.0; 1600]));
        assert_eq!(detector.state(), DetectorState::Idle);

        for _ in 0..4 {
            assert!(!detector.process(&[0.5; 1600]));
        }
        assert!(detector.heard_speech());

        let mut done = false;
        for _ in 0..6 {
            done = detector.process(&[0.0; 1600]);
        }
        assert!(done);
        assert_eq!(detector.state(), DetectorState::Complete);
        assert!(detector.take_speech_buffer().len() > MIN_SPEECH_SAMPLES);
    }
}
