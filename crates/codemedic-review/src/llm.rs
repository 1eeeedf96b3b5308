use codemedic_core::{CodemedicConfig, CodemedicError};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// A message in a chat conversation with the LLM.
///
/// # Examples
///
/// ```
/// use codemedic_review::llm::{ChatMessage, Role};
///
/// let msg = ChatMessage {
///     role: Role::User,
///     content: "Review this code".into(),
/// };
/// assert!(matches!(msg.role, Role::User));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    /// Role of the message sender.
    pub role: Role,
    /// Text content of the message.
    pub content: String,
}

/// Role in the chat conversation. Requests only ever carry user input.
///
/// # Examples
///
/// ```
/// use codemedic_review::llm::Role;
///
/// assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User input.
    User,
}

/// Body of a chat-completion request.
///
/// Each request carries exactly one user message; no history is kept
/// between calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    /// Model identifier.
    pub model: String,
    /// Conversation sent to the model.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature.
    pub temperature: f64,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Why a completion call produced no text.
///
/// The `Display` output is the text shown in the report.
///
/// # Examples
///
/// ```
/// use codemedic_review::llm::CompletionError;
///
/// let err = CompletionError::Status {
///     status: 500,
///     body: "server error".into(),
/// };
/// assert_eq!(err.to_string(), "API Error: 500 - server error");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    /// Connection, DNS, TLS or timeout failure.
    #[error("Request Error: {0}")]
    Transport(String),

    /// The endpoint answered with something other than 200 OK.
    #[error("API Error: {status} - {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// A 200 response whose body is not a usable completion.
    #[error("JSON Decode Error: {0}")]
    Decode(String),

    /// Anything not covered above.
    #[error("Unexpected Error: {0}")]
    Unexpected(String),
}

/// Chat-completion client for a single OpenAI-compatible endpoint.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use codemedic_core::CodemedicConfig;
/// use codemedic_review::llm::CompletionClient;
///
/// let mut props = BTreeMap::new();
/// props.insert("DEEPSEEK_API_KEY".to_string(), "sk-test".to_string());
/// let config = CodemedicConfig::from_properties(&props, None).unwrap();
///
/// let client = CompletionClient::new(&config).unwrap();
/// assert_eq!(client.model(), "deepseek/deepseek-chat");
/// ```
pub struct CompletionClient {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    model: String,
    temperature: f64,
}

impl CompletionClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CodemedicError::Llm`] if the API key is blank or the HTTP
    /// client cannot be built.
    pub fn new(config: &CodemedicConfig) -> Result<Self, CodemedicError> {
        let api_key = config.api_key.trim();
        if api_key.is_empty() {
            return Err(CodemedicError::Llm(
                "DEEPSEEK_API_KEY not found in .env file".into(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CodemedicError::Llm(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            api_url: config.api_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    /// Return the model name sent with each request.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Return the endpoint URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Build the request body for `prompt`.
    pub fn request_for(&self, prompt: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: Role::User,
                content: prompt.to_string(),
            }],
            temperature: self.temperature,
        }
    }

    /// Send `prompt` as a single user message and return the reply text.
    ///
    /// # Errors
    ///
    /// Every failure is classified into a [`CompletionError`] variant; this
    /// method never panics on a bad response.
    pub async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        tracing::debug!(url = %self.api_url, model = %self.model, "sending completion request");

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&self.request_for(prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    CompletionError::Unexpected(format!("failed to build request: {e}"))
                } else {
                    CompletionError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        let body_text = response
            .text()
            .await
            .map_err(|e| CompletionError::Transport(format!("failed to read response: {e}")))?;

        if status != StatusCode::OK {
            tracing::debug!(
                status = status.as_u16(),
                body = %body_text,
                "completion endpoint error"
            );
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body: body_text,
            });
        }

        extract_content(&body_text)
    }

    /// Like [`complete`](Self::complete), rendering errors as report text.
    pub async fn complete_text(&self, prompt: &str) -> String {
        match self.complete(prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "completion request failed");
                e.to_string()
            }
        }
    }
}

fn extract_content(body: &str) -> Result<String, CompletionError> {
    let parsed: CompletionResponse =
        serde_json::from_str(body).map_err(|e| CompletionError::Decode(e.to_string()))?;
    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| CompletionError::Decode("response contained no choices".into()))?;
    choice
        .message
        .content
        .ok_or_else(|| CompletionError::Decode("first choice has no message content".into()))
}
