//! Daemon - the watch loop
//!
//! Runs the five-step pipeline forever: capture a frame, record the
//! microphone, transcribe, generate a reply, speak it. Each iteration is
//! independent; a failed step is logged and the loop carries on.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::Result;
use crate::camera;
use crate::config::Config;
use crate::reply::ReplyGenerator;
use crate::voice::{
    AudioCapture, AudioPlayback, SAMPLE_RATE, TextToSpeech, Transcriber, samples_to_wav,
};

/// Pause after a failed iteration before trying again
const FAILURE_BACKOFF: Duration = Duration::from_secs(1);

/// The Vigía daemon - runs the capture/record/reply/speak loop
pub struct Daemon {
    config: Config,
}

impl Daemon {
    /// Create a new daemon instance
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the watch loop until interrupted
    ///
    /// # Errors
    ///
    /// Returns error if a service client cannot be constructed; steady-state
    /// iteration failures are contained and never propagate
    #[allow(clippy::future_not_send)]
    pub async fn run(self) -> Result<()> {
        let transcriber = Transcriber::new(
            &self.config.api_base,
            self.config.gemini_api_key.clone(),
            self.config.stt_model.clone(),
        )?;
        let generator = ReplyGenerator::new(
            &self.config.api_base,
            self.config.gemini_api_key.clone(),
            self.config.vision_model.clone(),
        )?;
        let tts = TextToSpeech::new(
            self.config.elevenlabs_api_key.clone(),
            self.config.voice_id.clone(),
            self.config.tts_model.clone(),
        )?;

        // Forward Ctrl+C into a channel polled between iterations; an
        // in-flight step is never cancelled mid-call
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = shutdown_tx.send(()).await;
            }
        });

        tracing::info!(
            voice = %self.config.voice_id,
            delay_secs = self.config.loop_delay.as_secs_f64(),
            "vigía watching - press Ctrl+C to exit"
        );

        loop {
            let pause = match self.run_iteration(&transcriber, &generator, &tts).await {
                Ok(()) => self.config.loop_delay,
                Err(e) => {
                    tracing::warn!(error = %e, "iteration failed, continuing");
                    FAILURE_BACKOFF
                }
            };

            if wait_or_shutdown(&mut shutdown_rx, pause).await {
                break;
            }
        }

        tracing::info!("interrupted - hasta luego");
        Ok(())
    }

    /// Run one pass through the pipeline
    #[allow(clippy::future_not_send)]
    async fn run_iteration(
        &self,
        transcriber: &Transcriber,
        generator: &ReplyGenerator,
        tts: &TextToSpeech,
    ) -> Result<()> {
        let frame = camera::capture_frame(self.config.camera_index)?;

        tracing::info!(seconds = self.config.record_seconds, "recording microphone");
        let mut mic = AudioCapture::new()?;
        let samples = mic.record_clip(self.config.record_seconds)?;
        let wav = samples_to_wav(&samples, SAMPLE_RATE)?;

        let transcript = transcriber.transcribe(&wav).await?;
        tracing::info!(transcript = %describe_transcript(&transcript), "heard");

        let reply = generator.generate(&frame, &transcript).await?;
        tracing::info!(reply = %reply, "replying");

        let audio = tts.synthesize(&reply).await?;
        let playback = AudioPlayback::new()?;
        playback.play_mp3(&audio)?;

        Ok(())
    }
}

/// Wait out the inter-iteration pause; returns true when shutdown was requested
async fn wait_or_shutdown(shutdown_rx: &mut mpsc::Receiver<()>, delay: Duration) -> bool {
    tokio::select! {
        _ = shutdown_rx.recv() => true,
        () = tokio::time::sleep(delay) => false,
    }
}

/// Console form of a transcript; empty clips are marked explicitly
fn describe_transcript(transcript: &str) -> &str {
    if transcript.is_empty() {
        "[vacío]"
    } else {
        transcript
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_transcript() {
        assert_eq!(describe_transcript("hola"), "hola");
        assert_eq!(describe_transcript(""), "[vacío]");
    }

    #[test]
    fn test_failure_backoff_is_one_second() {
        assert_eq!(FAILURE_BACKOFF, Duration::from_secs(1));
    }
}
