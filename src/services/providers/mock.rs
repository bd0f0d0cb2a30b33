//! Recording provider for tests.

use super::{ChatMessage, ChatProvider, Completion, CompletionParams, ProviderError, Usage};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// What the mock answers with on every call.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    Reply { text: String, usage: Option<Usage> },
    QuotaExceeded,
    InvalidCredential,
    Failure(String),
}

pub struct MockProvider {
    configured: bool,
    outcome: MockOutcome,
    calls: AtomicUsize,
    seen: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockProvider {
    pub fn new(outcome: MockOutcome) -> Self {
        Self {
            configured: true,
            outcome,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(MockOutcome::Reply { text: text.into(), usage: None })
    }

    /// A provider whose credential is absent.
    pub fn unconfigured() -> Self {
        Self { configured: false, ..Self::replying("unreachable") }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Message lists received, one entry per call.
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        _params: &CompletionParams,
    ) -> Result<Completion, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(messages.to_vec());
        }

        if !self.configured {
            return Err(ProviderError::NotConfigured);
        }

        match &self.outcome {
            MockOutcome::Reply { text, usage } => Ok(Completion { text: text.clone(), usage: *usage }),
            MockOutcome::QuotaExceeded => Err(ProviderError::QuotaExceeded(
                "You exceeded your current quota".to_string(),
            )),
            MockOutcome::InvalidCredential => Err(ProviderError::InvalidCredential(
                "Incorrect API key provided".to_string(),
            )),
            MockOutcome::Failure(msg) => Err(ProviderError::Api { status: 500, message: msg.clone() }),
        }
    }
}
