//! OpenAI-compatible chat completion client for entry feedback.

use std::time::Duration;

use inkwell_core::feedback::{user_prompt, FeedbackProvider, SYSTEM_PROMPT};
use inkwell_core::{InkwellError, Result};
use serde::{Deserialize, Serialize};

use crate::config::FeedbackSection;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Blocking client for a `/chat/completions` endpoint.
pub struct OpenAiFeedback {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl OpenAiFeedback {
    pub fn new(base_url: &str, model: &str, api_key: String) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| InkwellError::Feedback(format!("HTTP client setup failed: {}", e)))?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: model.to_string(),
            api_key,
        })
    }
}

impl FeedbackProvider for OpenAiFeedback {
    fn feedback(&self, content: &str) -> Result<String> {
        let prompt = user_prompt(content);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
        };

        tracing::debug!(endpoint = %self.endpoint, model = %self.model, "requesting feedback");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| InkwellError::Feedback(e.to_string()))?;

        let body: ChatResponse = response
            .json()
            .map_err(|e| InkwellError::Feedback(format!("Invalid response: {}", e)))?;
        first_reply(body)
    }
}

fn first_reply(body: ChatResponse) -> Result<String> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| InkwellError::Feedback("Empty response".to_string()))
}

/// Provider standing in when feedback cannot be configured.
///
/// Every request fails with the stored reason, which the best-effort
/// wrappers in the core turn into inline text.
pub struct UnavailableFeedback {
    reason: String,
}

impl FeedbackProvider for UnavailableFeedback {
    fn feedback(&self, _content: &str) -> Result<String> {
        Err(InkwellError::Feedback(self.reason.clone()))
    }
}

/// Build the provider described by the `[feedback]` settings.
pub fn provider_from_settings(settings: &FeedbackSection) -> Box<dyn FeedbackProvider> {
    let api_key = std::env::var(&settings.api_key_env)
        .ok()
        .filter(|v| !v.trim().is_empty());
    let Some(api_key) = api_key else {
        return Box::new(UnavailableFeedback {
            reason: format!("{} is not set", settings.api_key_env),
        });
    };
    match OpenAiFeedback::new(&settings.base_url, &settings.model, api_key) {
        Ok(provider) => Box::new(provider),
        Err(err) => Box::new(UnavailableFeedback {
            reason: err.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            model: "gpt-3.5-turbo",
            messages: vec![ChatMessage {
                role: "system",
                content: SYSTEM_PROMPT,
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["messages"][0]["role"], "system");
    }

    #[test]
    fn test_first_reply_trims() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"  Be gentle with yourself.\n"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_reply(body).unwrap(), "Be gentle with yourself.");
    }

    #[test]
    fn test_first_reply_empty_is_error() {
        let body: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(first_reply(body).is_err());
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let provider =
            OpenAiFeedback::new("https://example.test/v1/", "m", "key".to_string()).unwrap();
        assert_eq!(provider.endpoint, "https://example.test/v1/chat/completions");
    }

    #[test]
    fn test_missing_key_gives_unavailable_provider() {
        let settings = FeedbackSection {
            api_key_env: "INKWELL_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..FeedbackSection::default()
        };
        let provider = provider_from_settings(&settings);
        let err = provider.feedback("text").unwrap_err();
        assert!(err
            .to_string()
            .contains("INKWELL_TEST_KEY_THAT_IS_NEVER_SET is not set"));
    }
}
