use async_trait::async_trait;

use super::error::LlmError;

/// A multi-turn conversation that can take one more user message.
#[async_trait]
pub trait ChatSession: Send {
    /// Send a user message and return the model's reply text.
    async fn send_message(&mut self, text: &str) -> Result<String, LlmError>;
}
