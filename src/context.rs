use crate::config::{CommitStyle, ProviderConfig};

/// per-run settings the pipeline reads while building the commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppContext {
    /// language the commit message is written in
    pub language: String,

    /// tone requested from the provider
    pub style: CommitStyle,

    /// whether to show the debug prompt (from --debug-prompt flag)
    pub show_prompt: bool,
}

impl AppContext {
    pub fn new(config: &ProviderConfig, show_prompt: bool) -> Self {
        Self {
            language: config.language.clone(),
            style: config.style,
            show_prompt,
        }
    }
}
