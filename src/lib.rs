//! Vigía - comedic AI security camera
//!
//! This library provides the core functionality for Vigía:
//! - Frame capture from the default camera
//! - Microphone recording and speaker playback
//! - Transcription, multimodal reply generation, and speech synthesis
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                     Devices                          │
//! │      Camera    │    Microphone    │    Speaker      │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                  Vigía Daemon                        │
//! │   capture → record → transcribe → reply → speak     │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                 Cloud services                       │
//! │   Transcription  │  Chat completion  │  TTS         │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod camera;
pub mod config;
pub mod daemon;
pub mod error;
pub mod persona;
pub mod reply;
pub mod voice;

pub use config::Config;
pub use daemon::Daemon;
pub use error::{Error, Result};
pub use reply::ReplyGenerator;
pub use voice::{AudioCapture, AudioPlayback, TextToSpeech, Transcriber};
