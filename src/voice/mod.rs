//! Audio I/O and speech services
//!
//! Microphone capture and speaker playback use local devices; transcription
//! and synthesis call out to cloud APIs.

mod capture;
mod playback;
mod stt;
mod tts;

pub use capture::{AudioCapture, SAMPLE_RATE, samples_to_wav};
pub use playback::AudioPlayback;
pub use stt::Transcriber;
pub use tts::TextToSpeech;
