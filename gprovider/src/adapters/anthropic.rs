//! Anthropic-style messages adapter.
//!
//! The system prompt is a top-level request field rather than a message
//! entry, and the wire protocol only accepts `user`/`assistant` roles, so
//! any other history role is coerced to `user`.

use std::sync::Arc;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    ChatProvider, ChatRequest, ConversationTurn, CredentialSlot, ProviderError,
    ProviderErrorKind, ProviderFuture, ProviderId, TurnRole, classify_http_failure,
};

pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-haiku-20240307";

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 1024;
const PROBE_MAX_TOKENS: u32 = 10;
const PROBE_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
const PROBE_USER_MESSAGE: &str = "Hello";

pub struct AnthropicGuardProvider {
    credential: CredentialSlot,
    transport: Arc<dyn AnthropicTransport>,
    model: String,
}

impl AnthropicGuardProvider {
    pub fn new(transport: Arc<dyn AnthropicTransport>) -> Self {
        Self {
            credential: CredentialSlot::new(),
            transport,
            model: DEFAULT_ANTHROPIC_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn default_http_transport(client: Client) -> AnthropicHttpTransport {
        AnthropicHttpTransport::new(client)
    }

    fn resolve_api_key(&self) -> Result<String, ProviderError> {
        self.credential
            .with_secret(|value| value.to_string())
            .ok_or_else(|| ProviderError::invalid_credential("no Anthropic API key configured"))
    }

    fn build_request(&self, request: ChatRequest) -> AnthropicRequest {
        let mut messages = request
            .history
            .into_iter()
            .map(AnthropicMessage::from)
            .collect::<Vec<_>>();
        messages.push(AnthropicMessage {
            role: AnthropicRole::User,
            content: request.user_message,
        });

        AnthropicRequest {
            model: self.model.clone(),
            max_tokens: DEFAULT_MAX_TOKENS,
            system: request.system_prompt,
            messages,
        }
    }

    fn probe_request(&self) -> AnthropicRequest {
        AnthropicRequest {
            model: self.model.clone(),
            max_tokens: PROBE_MAX_TOKENS,
            system: PROBE_SYSTEM_PROMPT.to_string(),
            messages: vec![AnthropicMessage {
                role: AnthropicRole::User,
                content: PROBE_USER_MESSAGE.to_string(),
            }],
        }
    }
}

impl ChatProvider for AnthropicGuardProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Anthropic
    }

    fn configure(&self, api_key: &str) -> Result<(), ProviderError> {
        self.credential.set(api_key)
    }

    fn send_message<'a>(
        &'a self,
        request: ChatRequest,
    ) -> ProviderFuture<'a, Result<String, ProviderError>> {
        Box::pin(async move {
            let api_key = self.resolve_api_key()?;
            let wire_request = self.build_request(request);
            let reply = self.transport.complete(wire_request, api_key).await?;
            Ok(reply.text)
        })
    }

    fn validate_credential<'a>(&'a self) -> ProviderFuture<'a, Result<bool, ProviderError>> {
        Box::pin(async move {
            let api_key = self.resolve_api_key()?;
            match self.transport.complete(self.probe_request(), api_key).await {
                Ok(_) => Ok(true),
                Err(error) if error.kind == ProviderErrorKind::InvalidCredential => Err(error),
                Err(_) => Ok(false),
            }
        })
    }
}

pub trait AnthropicTransport: Send + Sync + std::fmt::Debug {
    fn complete<'a>(
        &'a self,
        request: AnthropicRequest,
        api_key: String,
    ) -> ProviderFuture<'a, Result<AnthropicReply, ProviderError>>;
}

#[derive(Debug, Clone)]
pub struct AnthropicHttpTransport {
    client: Client,
    base_url: String,
}

impl AnthropicHttpTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: ANTHROPIC_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl AnthropicTransport for AnthropicHttpTransport {
    fn complete<'a>(
        &'a self,
        request: AnthropicRequest,
        api_key: String,
    ) -> ProviderFuture<'a, Result<AnthropicReply, ProviderError>> {
        Box::pin(async move {
            let api_request = AnthropicApiRequest::from(request);
            let url = self.endpoint("messages");
            let response = self
                .client
                .post(url)
                .header("x-api-key", &api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&api_request)
                .send()
                .await
                .map_err(|err| ProviderError::invalid_response(err.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(classify_http_failure(
                    status.as_u16(),
                    extract_error_message(&body),
                ));
            }

            let body = response
                .text()
                .await
                .map_err(|err| ProviderError::invalid_response(err.to_string()))?;
            let parsed = serde_json::from_str::<AnthropicApiResponse>(&body)
                .map_err(|err| ProviderError::parsing(format!("failed to decode response: {err}")))?;

            AnthropicReply::try_from(parsed)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnthropicRequest {
    pub model: String,
    pub max_tokens: u32,
    pub system: String,
    pub messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnthropicMessage {
    pub role: AnthropicRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnthropicRole {
    User,
    Assistant,
}

impl AnthropicRole {
    fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl From<ConversationTurn> for AnthropicMessage {
    fn from(value: ConversationTurn) -> Self {
        // The wire protocol only accepts user/assistant.
        let role = match value.role {
            TurnRole::Assistant => AnthropicRole::Assistant,
            _ => AnthropicRole::User,
        };

        Self {
            role,
            content: value.content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnthropicReply {
    pub text: String,
}

fn extract_error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<AnthropicApiErrorEnvelope>(body).ok()?;
    Some(parsed.error.message)
}

#[derive(Debug, Deserialize)]
struct AnthropicApiErrorEnvelope {
    error: AnthropicApiError,
}

#[derive(Debug, Deserialize)]
struct AnthropicApiError {
    message: String,
}

#[derive(Debug, Serialize)]
struct AnthropicApiRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<AnthropicApiMessage>,
}

#[derive(Debug, Serialize)]
struct AnthropicApiMessage {
    role: String,
    content: String,
}

impl From<AnthropicRequest> for AnthropicApiRequest {
    fn from(value: AnthropicRequest) -> Self {
        Self {
            model: value.model,
            max_tokens: value.max_tokens,
            system: value.system,
            messages: value
                .messages
                .into_iter()
                .map(|message| AnthropicApiMessage {
                    role: message.role.as_str().to_string(),
                    content: message.content,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicApiResponse {
    content: Vec<AnthropicApiContentBlock>,
}

#[derive(Debug, Deserialize)]
struct AnthropicApiContentBlock {
    #[serde(rename = "type")]
    #[allow(dead_code)]
    kind: String,
    text: Option<String>,
}

impl TryFrom<AnthropicApiResponse> for AnthropicReply {
    type Error = ProviderError;

    fn try_from(value: AnthropicApiResponse) -> Result<Self, Self::Error> {
        // The first block carrying text is the reply.
        value
            .content
            .into_iter()
            .find_map(|block| block.text)
            .map(|text| Self { text })
            .ok_or_else(|| {
                ProviderError::invalid_response("response did not include a text block")
            })
    }
}
