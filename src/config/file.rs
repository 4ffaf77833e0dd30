//! TOML configuration file loading
//!
//! Supports `~/.config/vigia/config.toml` as a persistent config source.
//! All fields are optional — the file is a partial overlay underneath the
//! environment variables.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct VigiaConfigFile {
    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,

    /// Voice output configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// Model identifiers
    #[serde(default)]
    pub models: ModelsFileConfig,

    /// Local device capture configuration
    #[serde(default)]
    pub capture: CaptureFileConfig,

    /// Seconds to wait between successful iterations
    pub loop_delay_seconds: Option<f64>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    pub gemini: Option<String>,
    pub elevenlabs: Option<String>,
}

/// Voice output configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// ElevenLabs voice identifier
    pub tts_voice: Option<String>,

    /// ElevenLabs synthesis model (e.g. "eleven_multilingual_v2")
    pub tts_model: Option<String>,
}

/// Model identifier configuration
#[derive(Debug, Default, Deserialize)]
pub struct ModelsFileConfig {
    /// Transcription model (e.g. "gemini-2.0-flash")
    pub stt: Option<String>,

    /// Multimodal chat completion model
    pub vision: Option<String>,

    /// OpenAI-compatible API base URL
    pub api_base: Option<String>,
}

/// Local device capture configuration
#[derive(Debug, Default, Deserialize)]
pub struct CaptureFileConfig {
    /// Camera device index
    pub camera_index: Option<u32>,

    /// Microphone clip length in seconds
    pub record_seconds: Option<f32>,
}

/// Load the TOML config file from the standard path
///
/// Returns `VigiaConfigFile::default()` if the file doesn't exist or can't
/// be parsed.
pub fn load_config_file() -> VigiaConfigFile {
    let Some(path) = config_file_path() else {
        return VigiaConfigFile::default();
    };

    if !path.exists() {
        return VigiaConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                VigiaConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            VigiaConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/vigia/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("vigia").join("config.toml"))
}
