// src/services/relay.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::error::AppError;
use crate::message::{ChatReply, ChatRequest};
use crate::persona::Persona;
use crate::services::providers::{ChatMessage, ChatProvider, CompletionParams};

const LOG_PREFIX_CHARS: usize = 50;

/// Forwards one user message, prefixed with the persona, to the provider.
#[derive(Clone)]
pub struct ChatRelay {
    provider: Arc<dyn ChatProvider>,
    persona: Persona,
    params: CompletionParams,
}

impl ChatRelay {
    pub fn new(provider: Arc<dyn ChatProvider>, persona: Persona, params: CompletionParams) -> Self {
        Self { provider, persona, params }
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_configured()
    }

    pub fn ensure_available(&self) -> Result<(), AppError> {
        if self.is_available() {
            Ok(())
        } else {
            Err(AppError::ServiceUnavailable)
        }
    }

    /// The exact conversation sent upstream: persona first, user message last.
    pub fn conversation(&self, message: &str) -> [ChatMessage; 2] {
        [ChatMessage::system(self.persona.text()), ChatMessage::user(message)]
    }

    pub async fn handle_chat(&self, request: ChatRequest) -> Result<ChatReply, AppError> {
        self.ensure_available()?;
        let message = request.validated_message()?;

        let request_id = Uuid::new_v4();
        let prefix: String = message.chars().take(LOG_PREFIX_CHARS).collect();
        tracing::info!(%request_id, prefix = %prefix, "relaying chat message");

        let completion = self
            .provider
            .complete(&self.conversation(message), &self.params)
            .await
            .map_err(|e| {
                tracing::warn!(%request_id, error = %e, "provider call failed");
                AppError::from(e)
            })?;

        tracing::info!(
            %request_id,
            reply_len = completion.text.len(),
            total_tokens = completion.usage.map(|u| u.total_tokens),
            "chat completed"
        );

        Ok(ChatReply {
            reply: completion.text,
            usage: completion.usage,
        })
    }
}
