//! Multimodal reply generation
//!
//! Sends the captured frame and the microphone transcript to an
//! OpenAI-compatible chat completion endpoint and returns the persona's
//! one-liner about the scene.

use serde::{Deserialize, Serialize};

use crate::persona;
use crate::{Error, Result};

/// Sampling temperature for replies
const TEMPERATURE: f32 = 0.9;

/// Output token cap keeping replies short
const MAX_REPLY_TOKENS: u32 = 100;

/// Chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    max_tokens: u32,
}

/// A message in the request
#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: MessageContent,
}

/// Message content: plain text (system) or multimodal parts (user)
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// Content part (text or inline image)
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

/// Inline image reference
#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

/// Chat completion response
#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Generates persona replies from a frame and a transcript
pub struct ReplyGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl ReplyGenerator {
    /// Create a new reply generator
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing
    pub fn new(api_base: &str, api_key: String, model: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "Gemini API key required for reply generation".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            endpoint: format!("{}/chat/completions", api_base.trim_end_matches('/')),
        })
    }

    /// Generate a reply for a base64 JPEG frame and a transcript
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response carries no text
    pub async fn generate(&self, frame_b64: &str, transcript: &str) -> Result<String> {
        let request = self.build_request(frame_b64, transcript);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "chat completion request failed");
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "chat completion API error");
            return Err(Error::Reply(format!(
                "chat completion API error {status}: {body}"
            )));
        }

        let result: ChatCompletionResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse chat completion response");
            e
        })?;

        let reply = result
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        if reply.is_empty() {
            return Err(Error::Reply("empty chat completion response".to_string()));
        }

        tracing::debug!(reply = %reply, "reply generated");
        Ok(reply)
    }

    fn build_request(&self, frame_b64: &str, transcript: &str) -> ChatCompletionRequest<'_> {
        ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: MessageContent::Text(persona::SYSTEM_PROMPT.to_string()),
                },
                Message {
                    role: "user",
                    content: MessageContent::Parts(vec![
                        ContentPart::Text {
                            text: persona::user_prompt(transcript),
                        },
                        ContentPart::ImageUrl {
                            image_url: ImageUrl {
                                url: format!("data:image/jpeg;base64,{frame_b64}"),
                            },
                        },
                    ]),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_REPLY_TOKENS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> ReplyGenerator {
        ReplyGenerator::new("https://api.example.com/v1", "key".into(), "model-x".into()).unwrap()
    }

    #[test]
    fn test_request_shape() {
        let g = generator();
        let request = g.build_request("QUJD", "hola");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "model-x");
        assert_eq!(json["temperature"], 0.9);
        assert_eq!(json["max_tokens"], 100);

        let messages = json["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert!(messages[0]["content"].as_str().unwrap().contains("español"));

        let parts = messages[1]["content"].as_array().unwrap();
        assert_eq!(parts[0]["type"], "text");
        assert!(parts[0]["text"].as_str().unwrap().contains("'hola'"));
        assert_eq!(parts[1]["type"], "image_url");
        assert_eq!(
            parts[1]["image_url"]["url"],
            "data:image/jpeg;base64,QUJD"
        );
    }

    #[test]
    fn test_empty_transcript_uses_placeholder() {
        let g = generator();
        let request = g.build_request("QUJD", "");
        let json = serde_json::to_value(&request).unwrap();

        let text = json["messages"][1]["content"][0]["text"].as_str().unwrap();
        assert!(text.contains(crate::persona::NO_CLEAR_AUDIO));
        assert!(!text.contains("''"));
    }

    #[test]
    fn test_endpoint_built_from_base() {
        assert_eq!(
            generator().endpoint,
            "https://api.example.com/v1/chat/completions"
        );
    }
}
