//! Audio playback to speakers

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, StreamConfig};

use crate::{Error, Result};

/// Plays audio to the default output device
pub struct AudioPlayback {
    device: Device,
}

impl AudioPlayback {
    /// Create a new audio playback instance
    ///
    /// # Errors
    ///
    /// Returns error if no output device is available
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| Error::Audio("no output device available".to_string()))?;

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            "audio playback initialized"
        );

        Ok(Self { device })
    }

    /// Decode MP3 bytes and play them, blocking until playback completes
    ///
    /// # Errors
    ///
    /// Returns error if decoding or playback fails
    pub fn play_mp3(&self, mp3_data: &[u8]) -> Result<()> {
        let (samples, sample_rate) = decode_mp3(mp3_data)?;
        self.play(samples, sample_rate)
    }

    /// Play mono f32 samples at the given rate, blocking until done
    ///
    /// # Errors
    ///
    /// Returns error if no output config supports `sample_rate` or the
    /// stream fails
    pub fn play(&self, samples: Vec<f32>, sample_rate: u32) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }

        let config = self.output_config(sample_rate)?;
        let channels = config.channels as usize;

        let total = samples.len();
        let samples = Arc::new(samples);
        let position = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicBool::new(false));

        let cb_samples = Arc::clone(&samples);
        let cb_position = Arc::clone(&position);
        let cb_finished = Arc::clone(&finished);

        let stream = self
            .device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut pos = cb_position.load(Ordering::Relaxed);

                    for frame in data.chunks_mut(channels) {
                        let sample = if pos < total {
                            let s = cb_samples[pos];
                            pos += 1;
                            s
                        } else {
                            cb_finished.store(true, Ordering::Relaxed);
                            0.0
                        };

                        // Duplicate the mono sample across output channels
                        for out in frame.iter_mut() {
                            *out = sample;
                        }
                    }

                    cb_position.store(pos, Ordering::Relaxed);
                },
                |err| {
                    tracing::error!(error = %err, "audio playback error");
                },
                None,
            )
            .map_err(|e| Error::Audio(e.to_string()))?;

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;

        // Block until the callback drains the buffer, with a timeout scaled
        // to the clip length in case the device stalls
        let duration_ms = (total as u64 * 1000) / u64::from(sample_rate);
        let timeout = std::time::Duration::from_millis(duration_ms + 500);
        let start = std::time::Instant::now();

        while !finished.load(Ordering::Relaxed) {
            if start.elapsed() > timeout {
                tracing::warn!("playback timed out before draining");
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(50));
        }

        // Let the device ring out the final frames
        std::thread::sleep(std::time::Duration::from_millis(100));

        drop(stream);
        tracing::debug!(samples = total, sample_rate, "playback complete");

        Ok(())
    }

    /// Find an output config supporting `sample_rate`, mono preferred
    fn output_config(&self, sample_rate: u32) -> Result<StreamConfig> {
        let rate = SampleRate(sample_rate);

        let supported = self
            .device
            .supported_output_configs()
            .map_err(|e| Error::Audio(e.to_string()))?
            .find(|c| {
                c.channels() == 1 && c.min_sample_rate() <= rate && c.max_sample_rate() >= rate
            })
            .or_else(|| {
                self.device.supported_output_configs().ok()?.find(|c| {
                    c.channels() == 2 && c.min_sample_rate() <= rate && c.max_sample_rate() >= rate
                })
            })
            .ok_or_else(|| {
                Error::Audio(format!("no output config supports {sample_rate} Hz"))
            })?;

        Ok(supported.with_sample_rate(rate).config())
    }
}

/// Decode MP3 bytes into mono f32 samples plus the stream's sample rate
fn decode_mp3(mp3_data: &[u8]) -> Result<(Vec<f32>, u32)> {
    let mut decoder = minimp3::Decoder::new(Cursor::new(mp3_data));
    let mut samples = Vec::new();
    let mut sample_rate = None;

    loop {
        match decoder.next_frame() {
            Ok(frame) => {
                #[allow(clippy::cast_sign_loss)]
                sample_rate.get_or_insert(frame.sample_rate as u32);

                if frame.channels == 2 {
                    // Average stereo down to mono
                    samples.extend(frame.data.chunks(2).map(|chunk| {
                        let left = f32::from(chunk[0]) / 32768.0;
                        let right = f32::from(chunk.get(1).copied().unwrap_or(chunk[0])) / 32768.0;
                        f32::midpoint(left, right)
                    }));
                } else {
                    samples.extend(frame.data.iter().map(|&s| f32::from(s) / 32768.0));
                }
            }
            Err(minimp3::Error::Eof) => break,
            Err(e) => return Err(Error::Audio(format!("MP3 decode error: {e}"))),
        }
    }

    let sample_rate =
        sample_rate.ok_or_else(|| Error::Audio("MP3 contained no audio frames".to_string()))?;

    Ok((samples, sample_rate))
}
