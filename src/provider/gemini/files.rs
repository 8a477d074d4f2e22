use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::attachment::DEFAULT_MIME_TYPE;

pub const DEFAULT_DISPLAY_NAME: &str = "Uploaded File";

/// Caller overrides for an upload. Unset fields take the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadFileOptions {
    pub mime_type: Option<String>,
    pub display_name: Option<String>,
    /// Resource name to request (`files/...`). The service picks one when unset.
    pub name: Option<String>,
}

impl UploadFileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Lay these options over the defaults. A value the caller set is never replaced.
    pub fn merged_with_defaults(self) -> FileMetadataRequest {
        FileMetadataRequest {
            mime_type: self
                .mime_type
                .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
            display_name: self
                .display_name
                .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string()),
            name: self.name,
        }
    }
}

/// Metadata part of an upload, after defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadataRequest {
    pub mime_type: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl FileMetadataRequest {
    /// The JSON document sent as the `metadata` part.
    pub fn to_metadata(&self) -> Value {
        serde_json::json!({ "file": self })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadFileResponse {
    pub file: FileMetadata,
}

/// A file stored by the file service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// int64 encoded as a string on the wire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Any other fields the service returns (timestamps, hashes, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
