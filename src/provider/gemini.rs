//! Google Gemini client.
//!
//! Talks to the `generativelanguage.googleapis.com` REST API directly:
//! `models/{model}:generateContent` for one-shot generation and chat turns,
//! and the media upload endpoint for the file service.

mod chat;
mod files;
mod request;
mod response;

pub use chat::GeminiChat;
pub use files::{
    DEFAULT_DISPLAY_NAME, FileMetadata, FileMetadataRequest, UploadFileOptions,
    UploadFileResponse,
};
pub use request::{GenerateContentRequest, build_parts};
pub use response::{Candidate, GenerateContentResponse, PromptFeedback};

use std::path::Path;

use tokio::io::{AsyncWriteExt, BufReader};

use crate::core::attachment::read_file;
use crate::core::{
    ApiKey, Attachment, Content, GenerationConfig, HttpClient, HttpClientConfig, LlmError,
    MultipartUpload, Part,
};
use crate::prompt::{CHAT_SEED_MESSAGE, FARM_DATA_INSTRUCTIONS, FarmReport};
use crate::provider::constants::gemini;
use crate::repl;

/// Gemini-specific client configuration
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Host for media uploads. Same as `base_url` unless overridden.
    pub upload_base_url: Option<String>,
    pub system_instruction: Option<String>,
    pub generation_config: Option<GenerationConfig>,
    pub http_config: HttpClientConfig,
}

impl GeminiConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: gemini::DEFAULT_MODEL.to_string(),
            base_url: gemini::API_BASE.to_string(),
            upload_base_url: None,
            system_instruction: Some(FARM_DATA_INSTRUCTIONS.to_string()),
            generation_config: None,
            http_config: HttpClientConfig::default(),
        }
    }

    /// Resolve the key (for `ApiKey::Default`, from `GEMINI_API_KEY`) and build a config.
    pub fn from_api_key(api_key: &ApiKey) -> Result<Self, LlmError> {
        Ok(Self::new(api_key.resolve(gemini::API_KEY_ENV_VAR)?))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_upload_base_url(mut self, upload_base_url: impl Into<String>) -> Self {
        self.upload_base_url = Some(upload_base_url.into());
        self
    }

    /// Replace the farm-data instructions. `None` sends no system instruction.
    pub fn with_system_instruction(mut self, instruction: Option<String>) -> Self {
        self.system_instruction = instruction;
        self
    }

    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }

    /// Ask the API to constrain replies to the [`FarmReport`] JSON schema.
    pub fn with_structured_output(self) -> Self {
        self.with_generation_config(GenerationConfig::json_schema::<FarmReport>())
    }

    pub fn with_http_config(mut self, config: HttpClientConfig) -> Self {
        self.http_config = config;
        self
    }

    fn api_root(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), gemini::API_VERSION)
    }

    fn generate_url(&self) -> String {
        let model = self.model.strip_prefix("models/").unwrap_or(&self.model);
        format!("{}/models/{}:generateContent", self.api_root(), model)
    }

    fn upload_url(&self) -> String {
        let base = self.upload_base_url.as_deref().unwrap_or(&self.base_url);
        format!(
            "{}/upload/{}/files",
            base.trim_end_matches('/'),
            gemini::API_VERSION
        )
    }

    fn auth_header(&self) -> (String, String) {
        (gemini::API_KEY_HEADER.to_string(), self.api_key.clone())
    }
}

pub struct GeminiClient {
    pub config: GeminiConfig,
    http: HttpClient,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, LlmError> {
        let http = HttpClient::new(config.http_config.clone(), None)?;
        Ok(Self { config, http })
    }

    /// Client with default settings and the key from `GEMINI_API_KEY`.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::new(GeminiConfig::from_api_key(&ApiKey::Default)?)
    }

    /// One-shot generation from a prompt and zero or more PDF files.
    pub async fn generate_content<I>(
        &self,
        prompt: &str,
        file_paths: I,
    ) -> Result<String, LlmError>
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
    {
        let attachments: Vec<Attachment> = file_paths
            .into_iter()
            .map(|path| Attachment::pdf(path.as_ref()))
            .collect();

        self.generate_with_attachments(prompt, &attachments).await
    }

    /// One-shot generation with attachments of any MIME type.
    #[tracing::instrument(
        name = "generate_content",
        skip(self, prompt, attachments),
        fields(model = %self.config.model, attachments = attachments.len()),
        err
    )]
    pub async fn generate_with_attachments(
        &self,
        prompt: &str,
        attachments: &[Attachment],
    ) -> Result<String, LlmError> {
        let parts = build_parts(prompt, attachments).await?;
        self.send_generate(vec![Content::user(parts)]).await?.text()
    }

    /// Upload a file to the file service, with `options` laid over the defaults.
    #[tracing::instrument(
        name = "upload_file",
        skip(self, file_path, options),
        fields(path = %file_path.as_ref().display()),
        err
    )]
    pub async fn upload_file(
        &self,
        file_path: impl AsRef<Path>,
        options: UploadFileOptions,
    ) -> Result<UploadFileResponse, LlmError> {
        let path = file_path.as_ref();
        let metadata = options.merged_with_defaults();
        let bytes = read_file(path).await?;

        let upload = MultipartUpload {
            metadata: metadata.to_metadata(),
            file_name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "file".to_string()),
            mime_type: metadata.mime_type.clone(),
            bytes,
        };

        let headers = vec![
            self.config.auth_header(),
            (
                gemini::UPLOAD_PROTOCOL_HEADER.to_string(),
                "multipart".to_string(),
            ),
        ];

        let response: UploadFileResponse = self
            .http
            .post_multipart(&self.config.upload_url(), &headers, &upload)
            .await?;

        tracing::info!(name = %response.file.name, "Uploaded file");
        Ok(response)
    }

    /// Open a chat seeded with the instructions and the attached PDF.
    /// Nothing is sent until the first message.
    pub async fn initialize_chat(
        &self,
        file_path: impl AsRef<Path>,
    ) -> Result<GeminiChat<'_>, LlmError> {
        let file_part = Attachment::pdf(file_path.as_ref()).to_part().await?;

        let history = vec![
            Content::user(vec![Part::text(FARM_DATA_INSTRUCTIONS)]),
            Content::user(vec![Part::text(CHAT_SEED_MESSAGE), file_part]),
        ];

        Ok(GeminiChat::new(self, history))
    }

    /// Interactive chat about a PDF on stdin/stdout until the user types `exit`.
    pub async fn start_chat_repl(&self, file_path: impl AsRef<Path>) -> Result<(), LlmError> {
        let mut chat = self.initialize_chat(file_path).await?;

        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(b"\nChat initialized with PDF. Ready for questions.\n\n")
            .await
            .map_err(LlmError::Console)?;

        let summary = repl::run(
            &mut chat,
            BufReader::new(tokio::io::stdin()),
            &mut stdout,
            &mut tokio::io::stderr(),
        )
        .await?;

        tracing::debug!(turns = summary.turns, errors = summary.errors, "Chat ended");
        Ok(())
    }

    pub(crate) async fn send_generate(
        &self,
        contents: Vec<Content>,
    ) -> Result<GenerateContentResponse, LlmError> {
        let request = GenerateContentRequest {
            contents,
            system_instruction: self
                .config
                .system_instruction
                .as_deref()
                .map(Content::instruction),
            generation_config: self.config.generation_config.clone(),
        };

        let headers = vec![self.config.auth_header()];
        self.http
            .post_json(&self.config.generate_url(), &headers, &request)
            .await
    }
}
