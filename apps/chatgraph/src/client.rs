//! # Completion Client
//!
//! OpenAI-compatible `POST {base_url}/chat/completions` behind the core's
//! [`Completer`] trait.

use chatgraph_core::{Completer, CompletionRequest, CompletionResponse};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors from the HTTP client layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Cannot reach the completion service.
    #[error("Cannot connect to completion service at {0}")]
    ConnectionFailed(String),
    /// 401 Unauthorized - invalid or missing API key.
    #[error("Unauthorized: invalid or missing API key")]
    Unauthorized,
    /// 429 Too Many Requests.
    #[error("Rate limited: too many requests")]
    RateLimited,
    /// Service returned a 5xx error.
    #[error("Server error ({0}): {1}")]
    ServerError(u16, String),
    /// Any other non-success status.
    #[error("Request rejected ({0}): {1}")]
    Rejected(u16, String),
    /// Failed to parse response body.
    #[error("Parse error: {0}")]
    ParseError(String),
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct WireChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl<'a> From<&'a CompletionRequest> for ChatCompletionRequest<'a> {
    fn from(request: &'a CompletionRequest) -> Self {
        Self {
            model: &request.model,
            messages: request
                .entries
                .iter()
                .map(|e| WireMessage {
                    role: e.role.as_str(),
                    content: &e.content,
                })
                .collect(),
        }
    }
}

impl From<ChatCompletionResponse> for CompletionResponse {
    fn from(response: ChatCompletionResponse) -> Self {
        Self {
            choices: response
                .choices
                .into_iter()
                .map(|c| c.message.content.unwrap_or_default())
                .collect(),
        }
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// HTTP client for an OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiClient {
    /// Create a new client for `base_url` (e.g. `https://api.openai.com/v1`).
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request with optional Bearer auth.
    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method, &url);
        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }
        req
    }

    /// Send a request and handle connection errors.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
        req.send()
            .await
            .map_err(|e| ClientError::ConnectionFailed(format!("{}: {e}", self.base_url)))
    }

    /// Check status codes and parse the completion body.
    async fn handle_response(
        &self,
        resp: reqwest::Response,
    ) -> Result<ChatCompletionResponse, ClientError> {
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ClientError::RateLimited);
        }
        if status.is_server_error() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::ServerError(status.as_u16(), body));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Rejected(status.as_u16(), body));
        }
        resp.json::<ChatCompletionResponse>()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))
    }
}

impl Completer for OpenAiClient {
    type Error = ClientError;

    #[instrument(skip_all, fields(model = %request.model))]
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ClientError> {
        let body = ChatCompletionRequest::from(request);
        let req = self
            .request(reqwest::Method::POST, "/chat/completions")
            .json(&body);

        debug!("Sending completion request");
        let resp = self.send(req).await?;
        let parsed = self.handle_response(resp).await?;
        debug!(choices = parsed.choices.len(), "Received completion");

        Ok(parsed.into())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chatgraph_core::{CompletionEntry, Role};

    #[test]
    fn trailing_slash_trimmed() {
        let client = OpenAiClient::new("http://localhost:8000/v1/", None);
        assert_eq!(client.base_url(), "http://localhost:8000/v1");
    }

    #[test]
    fn request_body_layout() {
        let request = CompletionRequest {
            model: "gpt-4o-mini".to_string(),
            entries: vec![
                CompletionEntry::new(Role::System, "be brief"),
                CompletionEntry::new(Role::User, "user: hi\n"),
            ],
        };
        let json = serde_json::to_string(&ChatCompletionRequest::from(&request)).expect("json");
        assert_eq!(
            json,
            r#"{"model":"gpt-4o-mini","messages":[{"role":"system","content":"be brief"},{"role":"user","content":"user: hi\n"}]}"#
        );
    }

    #[test]
    fn response_choices_in_order() {
        let body = r#"{"id":"x","choices":[
            {"index":0,"message":{"role":"assistant","content":"first"}},
            {"index":1,"message":{"role":"assistant","content":null}}
        ]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).expect("parse");
        let response = CompletionResponse::from(parsed);
        assert_eq!(response.choices, vec!["first".to_string(), String::new()]);
    }
}
