//! # gemini-farm
//!
//! A small client for Google Gemini that turns farm documents (plot and crop
//! listings, usually PDFs) into JSON, either in one shot or through a chat.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gemini_farm::{GeminiClient, UploadFileOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GeminiClient::from_env()?;
//!
//!     let json = client
//!         .generate_content("Analyze this farm data", ["./farm-data.pdf"])
//!         .await?;
//!     println!("{json}");
//!
//!     let upload = client
//!         .upload_file(
//!             "./farm-data.pdf",
//!             UploadFileOptions::new().with_display_name("Farm Data 2024"),
//!         )
//!         .await?;
//!     println!("{}", upload.file.name);
//!
//!     client.start_chat_repl("./farm-data.pdf").await?;
//!     Ok(())
//! }
//! ```
//!
//! The API key is read from `GEMINI_API_KEY`; see [`ApiKey`] for other sources.

pub mod core;
pub mod prompt;
pub mod provider;
pub mod repl;

pub use crate::core::{ApiKey, Attachment, ChatSession, GenerationConfig, HttpClientConfig, LlmError};
pub use prompt::{CropPlot, FarmReport};
pub use provider::gemini::{UploadFileOptions, UploadFileResponse};
pub use provider::{GeminiChat, GeminiClient, GeminiConfig};
