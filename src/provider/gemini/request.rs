use serde::Serialize;

use crate::core::{Attachment, Content, GenerationConfig, LlmError, Part};

/// Body of `models/{model}:generateContent`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// One text part for the prompt followed by one inline data part per attachment,
/// in the order given.
pub async fn build_parts(prompt: &str, attachments: &[Attachment]) -> Result<Vec<Part>, LlmError> {
    let mut parts = Vec::with_capacity(attachments.len() + 1);
    parts.push(Part::text(prompt));

    for attachment in attachments {
        parts.push(attachment.to_part().await?);
    }

    Ok(parts)
}
