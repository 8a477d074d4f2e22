pub mod gemini {
    pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
    pub const API_BASE: &str = "https://generativelanguage.googleapis.com";
    pub const API_VERSION: &str = "v1beta";
    pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";
    pub const API_KEY_HEADER: &str = "x-goog-api-key";
    pub const UPLOAD_PROTOCOL_HEADER: &str = "X-Goog-Upload-Protocol";
}
