use async_trait::async_trait;

use super::GeminiClient;
use crate::core::{ChatSession, Content, LlmError, Part};

/// A conversation with the model. The history is sent in full with every turn.
pub struct GeminiChat<'a> {
    client: &'a GeminiClient,
    history: Vec<Content>,
}

impl<'a> GeminiChat<'a> {
    pub(crate) fn new(client: &'a GeminiClient, history: Vec<Content>) -> Self {
        Self { client, history }
    }

    pub fn history(&self) -> &[Content] {
        &self.history
    }

    /// Send one user message. The message and the reply join the history only
    /// when the request succeeds.
    #[tracing::instrument(
        name = "chat_send_message",
        skip(self, text),
        fields(history_len = self.history.len()),
        err
    )]
    pub async fn send_message(&mut self, text: &str) -> Result<String, LlmError> {
        let user = Content::user(vec![Part::text(text)]);

        let mut contents = self.history.clone();
        contents.push(user.clone());

        let reply = self.client.send_generate(contents).await?.text()?;

        self.history.push(user);
        self.history.push(Content::model(vec![Part::text(reply.clone())]));

        Ok(reply)
    }
}

#[async_trait]
impl ChatSession for GeminiChat<'_> {
    async fn send_message(&mut self, text: &str) -> Result<String, LlmError> {
        GeminiChat::send_message(self, text).await
    }
}
