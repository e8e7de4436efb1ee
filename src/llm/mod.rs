//! Hosted model access.
//!
//! Real implementation: [`GeminiClient`]. [`OfflineClient`] always fails and
//! drives every stage down its fallback path.

use async_trait::async_trait;

use crate::errors::LlmError;

mod gemini;

pub use gemini::GeminiClient;

/// Generation settings sent with every completion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            max_output_tokens: 8192,
        }
    }
}

/// Text-in, text-out access to a generative model.
#[async_trait]
pub trait PromptClient: Send + Sync {
    async fn complete(&self, prompt: &str, options: &CompletionOptions)
    -> Result<String, LlmError>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}

/// A client with no model behind it.
#[derive(Debug, Clone, Default)]
pub struct OfflineClient;

#[async_trait]
impl PromptClient for OfflineClient {
    async fn complete(
        &self,
        _prompt: &str,
        _options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        Err(LlmError::Misconfiguration("offline".to_string()))
    }

    fn name(&self) -> &str {
        "offline"
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted prompt client for unit tests.

    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays queued responses in order; once the queue is empty every call
    /// fails with `EmptyResponse`. Records each prompt it receives.
    #[derive(Default)]
    pub struct ScriptedClient {
        responses: Mutex<VecDeque<Result<String, LlmError>>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_responses<I, S>(responses: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            let client = Self::new();
            for response in responses {
                client.push_ok(response);
            }
            client
        }

        pub fn push_ok(&self, response: impl Into<String>) {
            self.responses
                .lock()
                .unwrap()
                .push_back(Ok(response.into()));
        }

        pub fn push_err(&self, err: LlmError) {
            self.responses.lock().unwrap().push_back(Err(err));
        }

        pub fn call_count(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl PromptClient for ScriptedClient {
        async fn complete(
            &self,
            prompt: &str,
            _options: &CompletionOptions,
        ) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LlmError::EmptyResponse))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedClient;
    use super::*;

    #[test]
    fn test_default_options_match_generation_config() {
        let options = CompletionOptions::default();
        assert_eq!(options.temperature, 0.8);
        assert_eq!(options.max_output_tokens, 8192);
    }

    #[tokio::test]
    async fn test_offline_client_always_fails() {
        let client = OfflineClient;
        let err = client
            .complete("anything", &CompletionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Misconfiguration(ref m) if m == "offline"));
    }

    #[tokio::test]
    async fn test_scripted_client_replays_in_order() {
        let client = ScriptedClient::with_responses(["first", "second"]);
        let options = CompletionOptions::default();
        assert_eq!(client.complete("a", &options).await.unwrap(), "first");
        assert_eq!(client.complete("b", &options).await.unwrap(), "second");
        assert!(client.complete("c", &options).await.is_err());
        assert_eq!(client.call_count(), 3);
    }
}
