//! Audio playback to speakers

use std::f32::consts::TAU;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, StreamConfig};

use crate::{Error, Result};

/// Sample rate for playback (matches common TTS output)
pub const PLAYBACK_SAMPLE_RATE: u32 = 24000;

/// Plays audio to the default output device
pub struct AudioPlayback {
    device: Device,
    config: StreamConfig,
}

impl AudioPlayback {
    /// Open the default output device
    ///
    /// # Errors
    ///
    /// Returns error if audio device cannot be opened
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| Error::Audio("no output device available".to_string()))?;

        let supports_rate = |c: &cpal::SupportedStreamConfigRange| {
            c.min_sample_rate() <= SampleRate(PLAYBACK_SAMPLE_RATE)
                && c.max_sample_rate() >= SampleRate(PLAYBACK_SAMPLE_RATE)
        };

        // Mono first, then stereo
        let supported_config = [1, 2]
            .into_iter()
            .find_map(|channels| {
                device
                    .supported_output_configs()
                    .ok()?
                    .find(|c| c.channels() == channels && supports_rate(c))
            })
            .ok_or_else(|| Error::Audio("no suitable output config found".to_string()))?;

        let config = supported_config
            .with_sample_rate(SampleRate(PLAYBACK_SAMPLE_RATE))
            .config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = PLAYBACK_SAMPLE_RATE,
            channels = config.channels,
            "audio playback initialized"
        );

        Ok(Self { device, config })
    }

    /// Play mono samples at [`PLAYBACK_SAMPLE_RATE`], returning when done
    ///
    /// # Errors
    ///
    /// Returns error if the output stream fails
    pub fn play(&self, samples: Vec<f32>) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }

        let channels = usize::from(self.config.channels.max(1));
        let total = samples.len();
        let samples = Arc::new(samples);
        let position = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicBool::new(false));

        let stream = {
            let samples = Arc::clone(&samples);
            let position = Arc::clone(&position);
            let finished = Arc::clone(&finished);

            self.device
                .build_output_stream(
                    &self.config,
                    move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                        for frame in data.chunks_mut(channels) {
                            let pos = position.load(Ordering::Relaxed);
                            let sample = samples.get(pos).copied().unwrap_or_else(|| {
                                finished.store(true, Ordering::Relaxed);
                                0.0
                            });
                            frame.fill(sample);
                            if pos < samples.len() {
                                position.store(pos + 1, Ordering::Relaxed);
                            }
                        }
                    },
                    |err| {
                        tracing::error!(error = %err, "audio playback error");
                    },
                    None,
                )
                .map_err(|e| Error::Audio(e.to_string()))?
        };

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;

        let duration_ms = (total as u64 * 1000) / u64::from(PLAYBACK_SAMPLE_RATE);
        let deadline = Instant::now() + Duration::from_millis(duration_ms + 500);

        while !finished.load(Ordering::Relaxed) && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(50));
        }

        // Let the device drain its last buffer
        std::thread::sleep(Duration::from_millis(100));

        drop(stream);
        tracing::debug!(samples = total, "playback complete");

        Ok(())
    }

    /// Decode and play MP3 bytes
    ///
    /// # Errors
    ///
    /// Returns error if decoding or playback fails
    pub fn play_mp3(&self, mp3_data: &[u8]) -> Result<()> {
        let samples = decode_mp3(mp3_data)?;
        self.play(samples)
    }

    /// Play a sine tone
    ///
    /// # Errors
    ///
    /// Returns error if playback fails
    pub fn beep(&self, freq_hz: u32, duration_ms: u64) -> Result<()> {
        self.play(sine_tone(freq_hz, duration_ms, PLAYBACK_SAMPLE_RATE))
    }
}

/// Generate a sine tone at half amplitude
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn sine_tone(freq_hz: u32, duration_ms: u64, sample_rate: u32) -> Vec<f32> {
    let count = (duration_ms * u64::from(sample_rate) / 1000) as usize;
    let step = TAU * freq_hz as f32 / sample_rate as f32;
    (0..count).map(|i| 0.5 * (step * i as f32).sin()).collect()
}

/// Decode MP3 bytes to mono f32 samples
fn decode_mp3(mp3_data: &[u8]) -> Result<Vec<f32>> {
    let mut decoder = minimp3::Decoder::new(Cursor::new(mp3_data));
    let mut samples = Vec::new();

    loop {
        match decoder.next_frame() {
            Ok(frame) => {
                let channels = frame.channels.max(1);
                #[allow(clippy::cast_precision_loss)]
                samples.extend(frame.data.chunks(channels).map(|chunk| {
                    chunk.iter().map(|&s| f32::from(s) / 32768.0).sum::<f32>() / chunk.len() as f32
                }));
            }
            Err(minimp3::Error::Eof) => break,
            Err(e) => return Err(Error::Audio(format!("MP3 decode error: {e}"))),
        }
    }

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sine_tone_length_and_amplitude() {
        let tone = sine_tone(1000, 500, PLAYBACK_SAMPLE_RATE);
        assert_eq!(tone.len(), 12000);
        assert!(tone.iter().all(|s| s.abs() <= 0.5));
        assert!(tone.iter().any(|s| *s > 0.4));
    }

    #[test]
    fn test_decode_garbage_is_empty_or_error() {
        // Not an MP3 stream; the decoder skips junk and reaches EOF
        let result = decode_mp3(&[0u8; 64]);
        assert!(result.map_or(true, |s| s.is_empty()));
    }
}
