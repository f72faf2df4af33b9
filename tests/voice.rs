//! Voice pipeline integration tests
//!
//! Tests voice components without requiring audio hardware

use elsa::voice::{
    DetectorState, PLAYBACK_SAMPLE_RATE, SAMPLE_RATE, UtteranceDetector, samples_to_wav, sine_tone,
};
use std::io::Cursor;

mod common;

/// Generate sine wave audio samples
fn generate_sine_samples(frequency: f32, duration_secs: f32, amplitude: f32) -> Vec<f32> {
    let num_samples = (SAMPLE_RATE as f32 * duration_secs) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}

/// Generate silence
fn generate_silence(duration_secs: f32) -> Vec<f32> {
    let num_samples = (SAMPLE_RATE as f32 * duration_secs) as usize;
    vec![0.0; num_samples]
}

#[test]
fn test_detector_starts_idle() {
    let detector = UtteranceDetector::new();

    assert_eq!(detector.state(), DetectorState::Idle);
    assert!(!detector.heard_speech());
}

#[test]
fn test_silence_is_ignored() {
    let mut detector = UtteranceDetector::new();

    assert!(!detector.process(&generate_silence(2.0)));
    assert_eq!(detector.state(), DetectorState::Idle);
    assert!(detector.take_speech_buffer().is_empty());
}

#[test]
fn test_phrase_then_silence_completes() {
    let mut detector = UtteranceDetector::new();

    let speech = generate_sine_samples(440.0, 0.5, 0.3);
    assert!(!detector.process(&speech));
    assert_eq!(detector.state(), DetectorState::Listening);
    assert!(detector.heard_speech());

    let more_speech = generate_sine_samples(440.0, 0.3, 0.3);
    assert!(!detector.process(&more_speech));

    let silence = generate_silence(0.6);
    assert!(detector.process(&silence));
    assert_eq!(detector.state(), DetectorState::Complete);

    let taken = detector.take_speech_buffer();
    assert_eq!(taken.len(), speech.len() + more_speech.len() + silence.len());
}

#[test]
fn test_calibration_raises_threshold() {
    let mut detector = UtteranceDetector::new();
    let floor = detector.threshold();

    detector.calibrate(&generate_sine_samples(120.0, 1.0, 0.2));
    assert!(detector.threshold() > floor);

    // Ambient-level noise no longer counts as speech
    detector.process(&generate_sine_samples(120.0, 0.5, 0.2));
    assert_eq!(detector.state(), DetectorState::Idle);
}

#[test]
fn test_calibration_keeps_floor_in_quiet_rooms() {
    let mut detector = UtteranceDetector::new();
    let floor = detector.threshold();

    detector.calibrate(&generate_silence(1.0));
    assert!((detector.threshold() - floor).abs() < f32::EPSILON);
}

#[test]
fn test_reset_clears_phrase() {
    let mut detector = UtteranceDetector::new();
    detector.process(&generate_sine_samples(440.0, 0.5, 0.3));

    detector.reset();
    assert_eq!(detector.state(), DetectorState::Idle);
    assert!(detector.take_speech_buffer().is_empty());
}

#[test]
fn test_samples_to_wav() {
    let samples = generate_sine_samples(440.0, 0.1, 0.5);
    let wav_data = samples_to_wav(&samples, SAMPLE_RATE).unwrap();

    // Check WAV header magic
    assert_eq!(&wav_data[0..4], b"RIFF");
    assert_eq!(&wav_data[8..12], b"WAVE");

    assert!(wav_data.len() > 44); // WAV header is 44 bytes
}

#[test]
fn test_wav_is_mono_16_bit() {
    let original_samples: Vec<f32> = vec![0.0, 0.5, -0.5, 1.0, -1.0, 0.25];
    let wav_data = samples_to_wav(&original_samples, SAMPLE_RATE).unwrap();

    let cursor = Cursor::new(wav_data);
    let mut reader = hound::WavReader::new(cursor).unwrap();

    let spec = reader.spec();
    assert_eq!(spec.sample_rate, SAMPLE_RATE);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.bits_per_sample, 16);

    let read_samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(read_samples.len(), original_samples.len());
    assert_eq!(read_samples[0], 0);
    assert!(read_samples[3] > 32000);
    assert!(read_samples[4] < -32000);
}

#[test]
fn test_sine_tone_length() {
    let tone = sine_tone(1000, 500, PLAYBACK_SAMPLE_RATE);

    assert_eq!(tone.len(), PLAYBACK_SAMPLE_RATE as usize / 2);
    assert!(tone.iter().all(|s| s.abs() <= 1.0));
    assert!(tone.iter().any(|s| s.abs() > 0.1));
}
