//! Text-to-speech via ElevenLabs

use serde::Serialize;

use crate::{Error, Result};

/// ElevenLabs synthesis request body
#[derive(Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

/// Synthesizes speech from reply text
pub struct TextToSpeech {
    client: reqwest::Client,
    api_key: String,
    voice_id: String,
    model: String,
}

impl TextToSpeech {
    /// Create a new TTS instance
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing
    pub fn new(api_key: String, voice_id: String, model: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "ElevenLabs API key required for TTS".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            voice_id,
            model,
        })
    }

    /// Synthesize text to speech
    ///
    /// Returns the response body collected into one buffer (MP3 format).
    ///
    /// # Errors
    ///
    /// Returns error if synthesis fails
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let url = format!(
            "https://api.elevenlabs.io/v1/text-to-speech/{}",
            self.voice_id
        );

        let request = SynthesisRequest {
            text,
            model_id: &self.model,
        };

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("ElevenLabs TTS error {status}: {body}")));
        }

        let audio = response.bytes().await?;
        tracing::debug!(audio_bytes = audio.len(), voice = %self.voice_id, "synthesis complete");
        Ok(audio.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let request = SynthesisRequest {
            text: "hola",
            model_id: "eleven_multilingual_v2",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["text"], "hola");
        assert_eq!(json["model_id"], "eleven_multilingual_v2");
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(TextToSpeech::new(String::new(), "voice".into(), "model".into()).is_err());
    }
}
