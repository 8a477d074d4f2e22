//! Response side of `generateContent`.
//!
//! Only the fields needed to extract reply text are typed; everything else the
//! API sends is ignored.

use serde::Deserialize;

use crate::core::{LlmError, UsageMetadata};

/// Finish reasons that mean the candidate's text must not be used.
const BLOCKING_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "RECITATION",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
    "LANGUAGE",
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage_metadata: Option<UsageMetadata>,
    pub model_version: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
    pub finish_message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
    pub block_reason_message: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    ///
    /// A blocked prompt, or a first candidate that stopped for a safety-type
    /// reason, is an error. No candidates and no feedback yields an empty string.
    pub fn text(&self) -> Result<String, LlmError> {
        let Some(candidate) = self.candidates.first() else {
            return match &self.prompt_feedback {
                Some(feedback) => Err(LlmError::Blocked(feedback.describe())),
                None => Ok(String::new()),
            };
        };

        if self.candidates.len() > 1 {
            tracing::warn!(
                count = self.candidates.len(),
                "Response has multiple candidates, using the first"
            );
        }

        if let Some(reason) = candidate
            .finish_reason
            .as_deref()
            .filter(|r| BLOCKING_FINISH_REASONS.contains(r))
        {
            let message = match &candidate.finish_message {
                Some(detail) => format!("candidate finished with {reason}: {detail}"),
                None => format!("candidate finished with {reason}"),
            };
            return Err(LlmError::Blocked(message));
        }

        Ok(candidate
            .content
            .iter()
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| part.text.as_deref())
            .collect())
    }
}

impl PromptFeedback {
    fn describe(&self) -> String {
        let reason = self.block_reason.as_deref().unwrap_or("unspecified reason");
        match &self.block_reason_message {
            Some(detail) => format!("prompt blocked ({reason}): {detail}"),
            None => format!("prompt blocked ({reason})"),
        }
    }
}
