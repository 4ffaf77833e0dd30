//! Speech-to-text via an OpenAI-compatible transcription endpoint

use crate::{Error, Result};

/// Response from the transcription API
#[derive(serde::Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Transcribes microphone clips to text
pub struct Transcriber {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl Transcriber {
    /// Create a new transcriber
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing
    pub fn new(api_base: &str, api_key: String, model: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "Gemini API key required for transcription".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            endpoint: format!(
                "{}/audio/transcriptions",
                api_base.trim_end_matches('/')
            ),
        })
    }

    /// Transcribe a WAV clip to text
    ///
    /// Returns the transcript trimmed of surrounding whitespace; an empty
    /// string means the service heard nothing usable.
    ///
    /// # Errors
    ///
    /// Returns error if the request or response parsing fails
    pub async fn transcribe(&self, audio: &[u8]) -> Result<String> {
        tracing::debug!(audio_bytes = audio.len(), "starting transcription");

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(audio.to_vec())
                    .file_name("mic.wav")
                    .mime_str("audio/wav")
                    .map_err(|e| Error::Stt(e.to_string()))?,
            )
            .text("model", self.model.clone());

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "transcription request failed");
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "transcription API error");
            return Err(Error::Stt(format!(
                "transcription API error {status}: {body}"
            )));
        }

        let result: TranscriptionResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse transcription response");
            e
        })?;

        let text = result.text.trim().to_string();
        tracing::debug!(transcript = %text, "transcription complete");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_built_from_base() {
        let t = Transcriber::new("https://api.example.com/v1/", "key".into(), "m".into()).unwrap();
        assert_eq!(t.endpoint, "https://api.example.com/v1/audio/transcriptions");
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(Transcriber::new("https://api.example.com", String::new(), "m".into()).is_err());
    }
}
