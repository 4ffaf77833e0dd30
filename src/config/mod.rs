//! Configuration management for Vigía
//!
//! Values resolve with priority env > config file > built-in default and
//! are read once at startup; nothing is mutated afterwards.

pub mod file;

use std::time::Duration;

use file::VigiaConfigFile;

use crate::{Error, Result};

/// Built-in ElevenLabs voice used when none is configured ("George")
pub const DEFAULT_VOICE_ID: &str = "JBFqnCBsd6RMkjVDRZzb";

/// ElevenLabs synthesis model
pub const DEFAULT_TTS_MODEL: &str = "eleven_multilingual_v2";

/// Gemini model for transcription and multimodal replies
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Gemini OpenAI-compatibility API surface
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Seconds between successful iterations
const DEFAULT_LOOP_DELAY_SECS: f64 = 1.0;

/// Microphone clip length in seconds
const DEFAULT_RECORD_SECONDS: f32 = 4.0;

/// Vigía configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key (transcription + reply generation)
    pub gemini_api_key: String,

    /// ElevenLabs API key (speech synthesis)
    pub elevenlabs_api_key: String,

    /// ElevenLabs voice identifier
    pub voice_id: String,

    /// ElevenLabs synthesis model
    pub tts_model: String,

    /// Transcription model
    pub stt_model: String,

    /// Multimodal chat completion model
    pub vision_model: String,

    /// OpenAI-compatible API base URL for Gemini calls
    pub api_base: String,

    /// Pause between successful iterations
    pub loop_delay: Duration,

    /// Microphone clip length per iteration
    pub record_seconds: f32,

    /// Camera device index
    pub camera_index: u32,
}

impl Config {
    /// Load configuration from the environment and the optional config file
    ///
    /// # Errors
    ///
    /// Returns error if a required API key is absent
    pub fn load() -> Result<Self> {
        Self::from_sources(file::load_config_file(), |key| std::env::var(key).ok())
    }

    /// Resolve configuration from explicit sources (env wins over file)
    fn from_sources(fc: VigiaConfigFile, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let gemini_api_key = env("GEMINI_API_KEY")
            .filter(|k| !k.is_empty())
            .or(fc.api_keys.gemini)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                Error::Config(
                    "GEMINI_API_KEY is required for transcription and reply generation"
                        .to_string(),
                )
            })?;

        let elevenlabs_api_key = env("ELEVENLABS_API_KEY")
            .filter(|k| !k.is_empty())
            .or(fc.api_keys.elevenlabs)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                Error::Config("ELEVENLABS_API_KEY is required for speech synthesis".to_string())
            })?;

        let voice_id = env("ELEVENLABS_VOICE_ID")
            .or(fc.voice.tts_voice)
            .unwrap_or_else(|| DEFAULT_VOICE_ID.to_string());

        let tts_model = env("VIGIA_TTS_MODEL")
            .or(fc.voice.tts_model)
            .unwrap_or_else(|| DEFAULT_TTS_MODEL.to_string());

        let stt_model = env("VIGIA_STT_MODEL")
            .or(fc.models.stt)
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        let vision_model = env("VIGIA_VISION_MODEL")
            .or(fc.models.vision)
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        let api_base = env("VIGIA_API_BASE")
            .or(fc.models.api_base)
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let loop_delay_secs = env("LOOP_DELAY_SECONDS")
            .and_then(|raw| match raw.parse::<f64>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!(
                        value = %raw,
                        error = %e,
                        "invalid LOOP_DELAY_SECONDS, using default"
                    );
                    None
                }
            })
            .or(fc.loop_delay_seconds)
            .filter(|v| v.is_finite() && *v >= 0.0)
            .unwrap_or(DEFAULT_LOOP_DELAY_SECS);

        let record_seconds = env("VIGIA_RECORD_SECONDS")
            .and_then(|raw| match raw.parse::<f32>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!(
                        value = %raw,
                        error = %e,
                        "invalid VIGIA_RECORD_SECONDS, using default"
                    );
                    None
                }
            })
            .or(fc.capture.record_seconds)
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(DEFAULT_RECORD_SECONDS);

        let camera_index = env("VIGIA_CAMERA_INDEX")
            .and_then(|raw| raw.parse::<u32>().ok())
            .or(fc.capture.camera_index)
            .unwrap_or(0);

        Ok(Self {
            gemini_api_key,
            elevenlabs_api_key,
            voice_id,
            tts_model,
            stt_model,
            vision_model,
            api_base,
            loop_delay: Duration::from_secs_f64(loop_delay_secs),
            record_seconds,
            camera_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn required_env() -> Vec<(&'static str, &'static str)> {
        vec![("GEMINI_API_KEY", "gk"), ("ELEVENLABS_API_KEY", "ek")]
    }

    #[test]
    fn test_missing_gemini_key_is_fatal() {
        let env = env_of(&[("ELEVENLABS_API_KEY", "ek")]);
        let err = Config::from_sources(VigiaConfigFile::default(), env).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_missing_elevenlabs_key_is_fatal() {
        let env = env_of(&[("GEMINI_API_KEY", "gk")]);
        let err = Config::from_sources(VigiaConfigFile::default(), env).unwrap_err();
        assert!(err.to_string().contains("ELEVENLABS_API_KEY"));
    }

    #[test]
    fn test_empty_key_counts_as_missing() {
        let env = env_of(&[("GEMINI_API_KEY", ""), ("ELEVENLABS_API_KEY", "ek")]);
        assert!(Config::from_sources(VigiaConfigFile::default(), env).is_err());
    }

    #[test]
    fn test_defaults_applied() {
        let required = required_env();
        let env = env_of(&required);
        let config = Config::from_sources(VigiaConfigFile::default(), env).unwrap();

        assert_eq!(config.voice_id, DEFAULT_VOICE_ID);
        assert_eq!(config.tts_model, DEFAULT_TTS_MODEL);
        assert_eq!(config.stt_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.vision_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.loop_delay, Duration::from_secs_f64(1.0));
        assert!((config.record_seconds - 4.0).abs() < f32::EPSILON);
        assert_eq!(config.camera_index, 0);
    }

    #[test]
    fn test_env_overrides() {
        let mut pairs = required_env();
        pairs.push(("ELEVENLABS_VOICE_ID", "voz"));
        pairs.push(("LOOP_DELAY_SECONDS", "2.5"));
        pairs.push(("VIGIA_CAMERA_INDEX", "1"));
        let env = env_of(&pairs);

        let config = Config::from_sources(VigiaConfigFile::default(), env).unwrap();
        assert_eq!(config.voice_id, "voz");
        assert_eq!(config.loop_delay, Duration::from_secs_f64(2.5));
        assert_eq!(config.camera_index, 1);
    }

    #[test]
    fn test_env_wins_over_file() {
        let fc: VigiaConfigFile = toml::from_str(
            r#"
            loop_delay_seconds = 9.0

            [voice]
            tts_voice = "file-voice"
            "#,
        )
        .unwrap();

        let mut pairs = required_env();
        pairs.push(("ELEVENLABS_VOICE_ID", "env-voice"));
        let env = env_of(&pairs);

        let config = Config::from_sources(fc, env).unwrap();
        assert_eq!(config.voice_id, "env-voice");
        // no env delay set, so the file value applies
        assert_eq!(config.loop_delay, Duration::from_secs_f64(9.0));
    }

    #[test]
    fn test_invalid_delay_falls_back_to_default() {
        let mut pairs = required_env();
        pairs.push(("LOOP_DELAY_SECONDS", "not-a-number"));
        let env = env_of(&pairs);

        let config = Config::from_sources(VigiaConfigFile::default(), env).unwrap();
        assert_eq!(config.loop_delay, Duration::from_secs_f64(1.0));
    }

    #[test]
    fn test_keys_from_file_accepted() {
        let fc: VigiaConfigFile = toml::from_str(
            r#"
            [api_keys]
            gemini = "gk-file"
            elevenlabs = "ek-file"
            "#,
        )
        .unwrap();

        let config = Config::from_sources(fc, |_| None).unwrap();
        assert_eq!(config.gemini_api_key, "gk-file");
        assert_eq!(config.elevenlabs_api_key, "ek-file");
    }
}
