use async_trait::async_trait;

/// Transport-level failure reported by a [`Generator`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// External text generator, typically a language model client.
///
/// Implementations own their transport, credentials and timeouts. Each call
/// is independent; the retry loop never shares state between calls.
#[async_trait]
pub trait Generator: Send + Sync {
	async fn generate(&self, system_prompt: &str, prompt: &str) -> Result<String, BoxError>;
}
