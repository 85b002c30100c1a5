// commit message
pub const MAX_LINE_LENGTH: usize = 72;
pub const FALLBACK_MESSAGE: &str = "chore: update changes";
pub const DEFAULT_LANGUAGE: &str = "Deutsch";

// diff
pub const DIFF_SIZE_WARNING_BYTES: usize = 50 * 1024;
pub const DIFF_SIZE_MAXIMUM_BYTES: usize = 100 * 1024;

// providers
pub const REQUEST_TIMEOUT_SECS: u64 = 60;
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const ZAI_BASE_URL: &str = "https://api.z.ai/api/coding/paas/v4";
pub const ZAI_MODEL: &str = "glm-4.6";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const OPENAI_MODEL: &str = "gpt-4o-mini";

// editor
pub const DEFAULT_EDITOR: &str = "vim";
pub const COMMENT_CHAR: char = '#';

// push
pub const PUSH_REMOTE: &str = "origin";
