pub mod attachment;
pub mod config;
pub mod error;
pub mod http;
pub mod traits;
pub mod types;

pub use attachment::Attachment;
pub use config::ApiKey;
pub use error::LlmError;
pub use http::{HttpClient, HttpClientConfig, MultipartUpload};
pub use traits::ChatSession;
pub use types::{Blob, Content, GenerationConfig, Part, Role, UsageMetadata};
