use crate::config::{CommitStyle, ProviderKind};
use clap::Parser;

/// auto-commit: stage local changes and commit them with an AI-generated message
#[derive(Parser, Debug, Default)]
#[command(name = "auto-commit", about, long_about = None, disable_version_flag = true)]
pub struct Cli {
    /// language of the commit message (default: $COMMIT_LANGUAGE)
    #[arg(long)]
    pub lang: Option<String>,

    /// AI provider (default: $AI_PROVIDER)
    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    /// model name for the selected provider
    #[arg(long)]
    pub model: Option<String>,

    /// base URL of the Gemini API
    #[arg(long)]
    pub gemini_base_url: Option<String>,

    /// base URL of the Z.AI API
    #[arg(long)]
    pub zai_base_url: Option<String>,

    /// base URL of an OpenAI compatible API
    #[arg(long)]
    pub openai_base_url: Option<String>,

    /// tone of the commit message (default: $COMMIT_STYLE)
    #[arg(long, value_enum)]
    pub style: Option<CommitStyle>,

    /// print the prompt sent to the provider
    #[arg(long)]
    pub debug_prompt: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
