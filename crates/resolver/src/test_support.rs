//! Shared fakes for the resolver unit tests.

use answersmith_core::error::ProviderError;
use answersmith_core::message::Message;
use answersmith_core::provider::{Provider, ProviderRequest, ProviderResponse};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

pub const GOOD_REPLY: &str =
    r#"{"answer":"I value the mission.","confidence":0.8,"reasoning":"matches stated goals"}"#;

/// Replies with scripted outcomes in order, then repeats `fallback`.
/// Records every request it receives.
pub struct ScriptedProvider {
    replies: Mutex<Vec<Result<String, ProviderError>>>,
    fallback: String,
    delay: Option<Duration>,
    pub requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Result<&str, ProviderError>>) -> Self {
        Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .rev()
                    .map(|r| r.map(String::from))
                    .collect(),
            ),
            fallback: "no more scripted replies".into(),
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always reply with `reply`.
    pub fn repeating(reply: &str) -> Self {
        let mut provider = Self::new(Vec::new());
        provider.fallback = reply.to_string();
        provider
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.requests.lock().unwrap().push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.replies.lock().unwrap().pop();
        let reply = next.unwrap_or_else(|| Ok(self.fallback.clone()))?;
        Ok(ProviderResponse {
            message: Message::assistant(reply),
            usage: None,
            model: "scripted-model".into(),
        })
    }
}
