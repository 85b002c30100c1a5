use crate::cli::Cli;
use crate::constants::{
    DEFAULT_LANGUAGE, GEMINI_BASE_URL, GEMINI_MODEL, OPENAI_BASE_URL, OPENAI_MODEL, ZAI_BASE_URL,
    ZAI_MODEL,
};
use crate::error::ConfigError;
use clap::ValueEnum;
use std::fmt;
use std::path::{Path, PathBuf};

/// the AI back-ends a commit message can be requested from
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    Gemini,
    Zai,
    Openai,
}

impl ProviderKind {
    pub fn api_key_var(self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::Zai => "ZAI_API_KEY",
            Self::Openai => "OPENAI_API_KEY",
        }
    }

    pub fn model_var(self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_MODEL",
            Self::Zai => "ZAI_MODEL",
            Self::Openai => "OPENAI_MODEL",
        }
    }

    pub fn base_url_var(self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_BASE_URL",
            Self::Zai => "ZAI_BASE_URL",
            Self::Openai => "OPENAI_BASE_URL",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Self::Gemini => GEMINI_MODEL,
            Self::Zai => ZAI_MODEL,
            Self::Openai => OPENAI_MODEL,
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::Gemini => GEMINI_BASE_URL,
            Self::Zai => ZAI_BASE_URL,
            Self::Openai => OPENAI_BASE_URL,
        }
    }

    fn base_url_flag(self, cli: &Cli) -> Option<&str> {
        match self {
            Self::Gemini => cli.gemini_base_url.as_deref(),
            Self::Zai => cli.zai_base_url.as_deref(),
            Self::Openai => cli.openai_base_url.as_deref(),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gemini => "Gemini",
            Self::Zai => "Z.AI",
            Self::Openai => "OpenAI",
        })
    }
}

/// tone of the generated commit message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum CommitStyle {
    #[default]
    Standard,
    Sarcastic,
    Humorous,
}

/// fully resolved settings for one run, immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub language: String,
    pub style: CommitStyle,
}

impl ProviderConfig {
    /// resolve from the command line and the process environment
    pub fn from_env(cli: &Cli) -> Result<Self, ConfigError> {
        Self::resolve(cli, |name| std::env::var(name).ok())
    }

    /// resolve with precedence: command line, then `env`, then built-in defaults
    ///
    /// empty values count as unset. fails before any network access when the
    /// selected provider has no API key.
    pub fn resolve(
        cli: &Cli,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let lookup = |name: &str| non_empty(env(name).as_deref());

        let kind = match cli.provider {
            Some(kind) => kind,
            None => match lookup("AI_PROVIDER") {
                Some(value) => <ProviderKind as ValueEnum>::from_str(&value, true)
                    .map_err(|_| ConfigError::UnknownProvider(value))?,
                None => ProviderKind::Gemini,
            },
        };

        let api_key = lookup(kind.api_key_var()).ok_or(ConfigError::MissingApiKey {
            provider: kind,
            variable: kind.api_key_var(),
        })?;

        let model = non_empty(cli.model.as_deref())
            .or_else(|| lookup(kind.model_var()))
            .unwrap_or_else(|| kind.default_model().to_string());

        let base_url = non_empty(kind.base_url_flag(cli))
            .or_else(|| lookup(kind.base_url_var()))
            .unwrap_or_else(|| kind.default_base_url().to_string())
            .trim_end_matches('/')
            .to_string();

        let language = non_empty(cli.lang.as_deref())
            .or_else(|| lookup("COMMIT_LANGUAGE"))
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        let style = match cli.style {
            Some(style) => style,
            None => match lookup("COMMIT_STYLE") {
                Some(value) => <CommitStyle as ValueEnum>::from_str(&value, true)
                    .map_err(|_| ConfigError::UnknownStyle(value))?,
                None => CommitStyle::Standard,
            },
        };

        Ok(Self {
            kind,
            api_key,
            model,
            base_url,
            language,
            style,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// load `.env` files without overriding variables that are already set
///
/// sources in priority order: current directory, repository root, user config dir.
/// returns the files that were loaded.
pub fn load_env_files(repo_root: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let mut candidates = vec![PathBuf::from(".env"), repo_root.join(".env")];
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("auto-commit").join(".env"));
    }

    let mut loaded: Vec<PathBuf> = Vec::new();
    for path in candidates {
        if !path.is_file() {
            continue;
        }
        let canonical = path.canonicalize().unwrap_or_else(|_| path.clone());
        if loaded.contains(&canonical) {
            continue;
        }
        dotenvy::from_path(&path).map_err(|source| ConfigError::EnvFile {
            path: path.clone(),
            source,
        })?;
        loaded.push(canonical);
    }

    Ok(loaded)
}
