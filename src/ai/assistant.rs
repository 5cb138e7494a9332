//! Natural-language to query assistant
//!
//! Wraps a completion provider with prompt construction, a fixed timeout and
//! a single in-flight request.

use super::config::AiConfig;
use super::prompt::{clean_output, user_prompt, SYSTEM_PROMPT};
use super::provider::{AiError, CompletionProvider, CompletionRequest};
use crate::config::AiSettings;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Generates compiled query text from a description
pub struct AiAssistant {
    provider: Arc<dyn CompletionProvider>,
    timeout: Duration,
    max_tokens: u32,
    temperature: f32,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag however the request ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl AiAssistant {
    pub fn new(provider: Arc<dyn CompletionProvider>, settings: &AiSettings) -> Self {
        Self {
            provider,
            timeout: Duration::from_secs(settings.timeout_secs),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Override the completion timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether a request is outstanding
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Turn a description into query text using the given configuration.
    ///
    /// Fails fast on a blank description or an incomplete configuration,
    /// rejects a second concurrent call with [`AiError::Busy`] and gives up
    /// after the configured timeout with [`AiError::Timeout`].
    pub async fn generate(&self, description: &str, config: &AiConfig) -> Result<String, AiError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(AiError::EmptyPrompt);
        }
        config.ensure_ready()?;

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(AiError::Busy);
        }
        let _guard = InFlight(&self.in_flight);

        let request = CompletionRequest {
            provider: config.provider,
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.clone(),
            system: SYSTEM_PROMPT.to_string(),
            prompt: user_prompt(description),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        info!("Generating query with {} ({})", config.provider, config.model);
        let completion = match tokio::time::timeout(self.timeout, self.provider.complete(&request)).await
        {
            Ok(result) => result?,
            Err(_) => {
                warn!("AI request timed out after {:?}", self.timeout);
                return Err(AiError::Timeout);
            }
        };

        let query = clean_output(&completion.content);
        if query.is_empty() {
            return Err(AiError::EmptyResponse);
        }
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::{Completion, ProviderKind};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockProvider {
        answer: Result<String, AiError>,
        delay: Duration,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl MockProvider {
        fn answering(answer: &str) -> Self {
            Self {
                answer: Ok(answer.to_string()),
                delay: Duration::ZERO,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn delayed(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl CompletionProvider for MockProvider {
        async fn complete(&self, request: &CompletionRequest) -> Result<Completion, AiError> {
            self.seen.lock().unwrap().push(request.clone());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.answer.clone().map(|content| Completion { content })
        }
    }

    fn ready_config() -> AiConfig {
        AiConfig::new(ProviderKind::OpenAi, "gpt-4o-mini", "sk-test", None).unwrap()
    }

    fn assistant(provider: MockProvider) -> (Arc<MockProvider>, AiAssistant) {
        let provider = Arc::new(provider);
        let assistant = AiAssistant::new(provider.clone(), &AiSettings::default());
        (provider, assistant)
    }

    #[tokio::test]
    async fn test_generate_cleans_output() {
        let (provider, assistant) = assistant(MockProvider::answering("```\nsite:gov budget\n```"));
        let query = assistant.generate("  government budgets ", &ready_config()).await.unwrap();
        assert_eq!(query, "site:gov budget");

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].prompt, "Description: government budgets");
        assert_eq!(seen[0].api_key, "sk-test");
    }

    #[tokio::test]
    async fn test_blank_prompt_rejected_without_call() {
        let (provider, assistant) = assistant(MockProvider::answering("x"));
        let err = assistant.generate("   ", &ready_config()).await.unwrap_err();
        assert_eq!(err, AiError::EmptyPrompt);
        assert!(provider.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_rejected_without_call() {
        let (provider, assistant) = assistant(MockProvider::answering("x"));
        let err = assistant.generate("pdfs", &AiConfig::default()).await.unwrap_err();
        assert!(matches!(err, AiError::NotConfigured(_)));
        assert!(provider.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_timeout_is_distinct_error() {
        let (_, assistant) =
            assistant(MockProvider::answering("late").delayed(Duration::from_millis(500)));
        let assistant = assistant.with_timeout(Duration::from_millis(20));

        let err = assistant.generate("pdfs", &ready_config()).await.unwrap_err();
        assert_eq!(err, AiError::Timeout);
        assert!(!assistant.is_busy());
    }

    #[tokio::test]
    async fn test_second_concurrent_request_is_busy() {
        let (_, assistant) =
            assistant(MockProvider::answering("site:edu").delayed(Duration::from_millis(50)));
        let config = ready_config();

        let (first, second) = tokio::join!(
            assistant.generate("papers", &config),
            assistant.generate("papers", &config)
        );
        assert_eq!(first.unwrap(), "site:edu");
        assert_eq!(second.unwrap_err(), AiError::Busy);

        // Released once the first request finished
        assert!(!assistant.is_busy());
        assert!(assistant.generate("papers", &config).await.is_ok());
    }

    #[tokio::test]
    async fn test_provider_errors_propagate() {
        let provider = MockProvider {
            answer: Err(AiError::RateLimited),
            delay: Duration::ZERO,
            seen: Mutex::new(Vec::new()),
        };
        let (_, assistant) = assistant(provider);
        let err = assistant.generate("pdfs", &ready_config()).await.unwrap_err();
        assert_eq!(err, AiError::RateLimited);
        assert!(!assistant.is_busy());
    }

    #[tokio::test]
    async fn test_blank_answer_is_empty_response() {
        let (_, assistant) = assistant(MockProvider::answering("  ``` ```  "));
        let err = assistant.generate("pdfs", &ready_config()).await.unwrap_err();
        assert_eq!(err, AiError::EmptyResponse);
    }
}
