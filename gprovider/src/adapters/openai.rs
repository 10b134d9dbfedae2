//! OpenAI-style chat-completions adapter.
//!
//! The system prompt travels as a leading `system`-role entry in the
//! message array; history roles pass through unchanged.

use std::sync::Arc;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    ChatProvider, ChatRequest, ConversationTurn, CredentialSlot, ProviderError,
    ProviderErrorKind, ProviderFuture, ProviderId, TurnRole, classify_http_failure,
};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

const DEFAULT_TEMPERATURE: f32 = 0.7;
const PROBE_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
const PROBE_USER_MESSAGE: &str = "Hello";

pub struct OpenAiGuardProvider {
    credential: CredentialSlot,
    transport: Arc<dyn OpenAiTransport>,
    model: String,
}

impl OpenAiGuardProvider {
    pub fn new(transport: Arc<dyn OpenAiTransport>) -> Self {
        Self {
            credential: CredentialSlot::new(),
            transport,
            model: DEFAULT_OPENAI_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn default_http_transport(client: Client) -> OpenAiHttpTransport {
        OpenAiHttpTransport::new(client)
    }

    fn resolve_api_key(&self) -> Result<String, ProviderError> {
        self.credential
            .with_secret(|value| value.to_string())
            .ok_or_else(|| ProviderError::invalid_credential("no OpenAI API key configured"))
    }

    fn build_request(&self, request: ChatRequest) -> OpenAiRequest {
        let mut messages = Vec::with_capacity(request.history.len() + 2);
        messages.push(OpenAiMessage {
            role: OpenAiRole::System,
            content: request.system_prompt,
        });
        messages.extend(request.history.into_iter().map(OpenAiMessage::from));
        messages.push(OpenAiMessage {
            role: OpenAiRole::User,
            content: request.user_message,
        });

        OpenAiRequest {
            model: self.model.clone(),
            messages,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    fn probe_request(&self) -> OpenAiRequest {
        OpenAiRequest {
            model: self.model.clone(),
            messages: vec![
                OpenAiMessage {
                    role: OpenAiRole::System,
                    content: PROBE_SYSTEM_PROMPT.to_string(),
                },
                OpenAiMessage {
                    role: OpenAiRole::User,
                    content: PROBE_USER_MESSAGE.to_string(),
                },
            ],
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl ChatProvider for OpenAiGuardProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAi
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
            Ok(reply.content)
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

pub trait OpenAiTransport: Send + Sync + std::fmt::Debug {
    fn complete<'a>(
        &'a self,
        request: OpenAiRequest,
        api_key: String,
    ) -> ProviderFuture<'a, Result<OpenAiReply, ProviderError>>;
}

#[derive(Debug, Clone)]
pub struct OpenAiHttpTransport {
    client: Client,
    base_url: String,
}

impl OpenAiHttpTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: OPENAI_BASE_URL.to_string(),
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

impl OpenAiTransport for OpenAiHttpTransport {
    fn complete<'a>(
        &'a self,
        request: OpenAiRequest,
        api_key: String,
    ) -> ProviderFuture<'a, Result<OpenAiReply, ProviderError>> {
        Box::pin(async move {
            let api_request = OpenAiApiRequest::from(request);
            let url = self.endpoint("chat/completions");
            let response = self
                .client
                .post(url)
                .bearer_auth(&api_key)
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
            let parsed = serde_json::from_str::<OpenAiApiResponse>(&body)
                .map_err(|err| ProviderError::parsing(format!("failed to decode response: {err}")))?;

            OpenAiReply::try_from(parsed)
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenAiRequest {
    pub model: String,
    pub messages: Vec<OpenAiMessage>,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiMessage {
    pub role: OpenAiRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAiRole {
    System,
    User,
    Assistant,
}

impl OpenAiRole {
    fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl From<ConversationTurn> for OpenAiMessage {
    fn from(value: ConversationTurn) -> Self {
        let role = match value.role {
            TurnRole::User => OpenAiRole::User,
            TurnRole::Assistant => OpenAiRole::Assistant,
        };

        Self {
            role,
            content: value.content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiReply {
    pub content: String,
}

fn extract_error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<OpenAiApiErrorEnvelope>(body).ok()?;
    Some(parsed.error.message)
}

#[derive(Debug, Deserialize)]
struct OpenAiApiErrorEnvelope {
    error: OpenAiApiError,
}

#[derive(Debug, Deserialize)]
struct OpenAiApiError {
    message: String,
}

#[derive(Debug, Serialize)]
struct OpenAiApiRequest {
    model: String,
    messages: Vec<OpenAiApiMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct OpenAiApiMessage {
    role: String,
    content: String,
}

impl From<OpenAiRequest> for OpenAiApiRequest {
    fn from(value: OpenAiRequest) -> Self {
        Self {
            model: value.model,
            messages: value
                .messages
                .into_iter()
                .map(|message| OpenAiApiMessage {
                    role: message.role.as_str().to_string(),
                    content: message.content,
                })
                .collect(),
            temperature: value.temperature,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiApiResponse {
    choices: Vec<OpenAiApiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiApiChoice {
    message: OpenAiApiAssistantMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiApiAssistantMessage {
    content: String,
}

impl TryFrom<OpenAiApiResponse> for OpenAiReply {
    type Error = ProviderError;

    fn try_from(value: OpenAiApiResponse) -> Result<Self, Self::Error> {
        let choice = value.choices.into_iter().next().ok_or_else(|| {
            ProviderError::invalid_response("response did not include choices")
        })?;

        Ok(Self {
            content: choice.message.content,
        })
    }
}
