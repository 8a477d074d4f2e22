use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::error::LlmError;
use super::types::{Blob, Part};

pub const DEFAULT_MIME_TYPE: &str = "application/pdf";

/// A local file to be sent inline with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub path: PathBuf,
    pub mime_type: String,
}

impl Attachment {
    pub fn new(path: impl Into<PathBuf>, mime_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Attach a file as `application/pdf`.
    pub fn pdf(path: impl Into<PathBuf>) -> Self {
        Self::new(path, DEFAULT_MIME_TYPE)
    }

    /// Attach a file with a MIME type guessed from its extension.
    /// Unknown extensions fall back to `application/pdf`.
    pub fn guess(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mime_type = mime_guess::from_path(&path)
            .first_raw()
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();
        Self { path, mime_type }
    }

    /// Read the file and encode it as an inline data part.
    pub async fn to_part(&self) -> Result<Part, LlmError> {
        let bytes = read_file(&self.path).await?;
        Ok(Part::InlineData(Blob {
            mime_type: self.mime_type.clone(),
            data: STANDARD.encode(bytes),
        }))
    }
}

pub(crate) async fn read_file(path: &Path) -> Result<Vec<u8>, LlmError> {
    tokio::fs::read(path)
        .await
        .map_err(|e| LlmError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_mime_type_from_extension() {
        assert_eq!(Attachment::guess("notes.txt").mime_type, "text/plain");
        assert_eq!(Attachment::guess("plots.csv").mime_type, "text/csv");
        assert_eq!(Attachment::guess("farm-data.pdf").mime_type, "application/pdf");
        assert_eq!(Attachment::guess("no_extension").mime_type, DEFAULT_MIME_TYPE);
    }

    #[tokio::test]
    async fn encodes_file_as_base64_inline_data() {
        let path = std::env::temp_dir().join(format!("gemini-farm-attach-{}.txt", std::process::id()));
        tokio::fs::write(&path, b"plot 7: maize").await.unwrap();

        let part = Attachment::new(&path, "text/plain").to_part().await.unwrap();
        tokio::fs::remove_file(&path).await.ok();

        match part {
            Part::InlineData(blob) => {
                assert_eq!(blob.mime_type, "text/plain");
                assert_eq!(blob.data, STANDARD.encode(b"plot 7: maize"));
            }
            other => panic!("expected inline data, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let err = Attachment::pdf("/definitely/not/here.pdf")
            .to_part()
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Io { .. }));
    }
}
