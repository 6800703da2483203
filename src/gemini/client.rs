use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::Arc;

use super::types::{ApiErrorBody, GenerateContentRequest, GenerateContentResponse};
use crate::error::ChatError;

/// Public Gemini REST endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Something that can answer a `generateContent` request.
///
/// The session only talks to this trait, so it can run against the real
/// HTTP client or a scripted stand-in.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ChatError>;
}

#[async_trait]
impl<T: CompletionBackend + ?Sized> CompletionBackend for Arc<T> {
    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ChatError> {
        (**self).generate(model, request).await
    }
}

/// HTTP client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(endpoint: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            api_key,
        }
    }

    /// URL for the given model, without the key query parameter.
    pub fn model_url(&self, model: &str) -> String {
        format!(
            "{}/models/{model}:generateContent",
            self.endpoint.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl CompletionBackend for GeminiClient {
    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ChatError> {
        let url = self.model_url(model);
        log::debug!(
            "POST {url} ({} contents, system instruction: {})",
            request.contents.len(),
            request.system_instruction.is_some()
        );

        // The API authenticates with a query-string key
        let request_url = match &self.api_key {
            Some(api_key) => format!("{url}?key={api_key}"),
            None => url.clone(),
        };

        let response = self
            .client
            .post(&request_url)
            .json(request)
            .send()
            .await
            .map_err(|e| ChatError::Transport(format!("{url}: {}", e.without_url())))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| {
                ChatError::Transport(format!(
                    "Failed to read response body: {}",
                    e.without_url()
                ))
            })?;

        log::debug!("{url} -> {status} ({} bytes)", body.len());

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| ChatError::Transport(format!("Unexpected response from AI service: {e}")))
    }
}

/// Maps a non-2xx response to an error, preferring the provider's own message.
pub fn api_error(status: StatusCode, body: &str) -> ChatError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|b| b.error.message)
        .filter(|m| !m.is_empty())
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });

    ChatError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_url() {
        let client = GeminiClient::new(format!("{DEFAULT_ENDPOINT}/"), None);
        assert_eq!(
            client.model_url("gemini-2.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_api_error_uses_provider_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        let err = api_error(StatusCode::BAD_REQUEST, body);
        assert_eq!(
            err,
            ChatError::Api {
                status: 400,
                message: "API key not valid.".to_string()
            }
        );
    }

    #[test]
    fn test_api_error_falls_back_to_raw_body() {
        let err = api_error(StatusCode::BAD_GATEWAY, "upstream timed out");
        assert_eq!(
            err,
            ChatError::Api {
                status: 502,
                message: "upstream timed out".to_string()
            }
        );
    }

    #[test]
    fn test_api_error_empty_body_uses_status_text() {
        let err = api_error(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(
            err,
            ChatError::Api {
                status: 503,
                message: "Service Unavailable".to_string()
            }
        );
    }
}
