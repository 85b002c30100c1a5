use crate::config::ProviderKind;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// errors from repository discovery, scanning, staging and the git binary
#[derive(Error, Debug)]
pub enum GitError {
    #[error("not in a git repository: {}", .0.display())]
    NotARepository(PathBuf),

    #[error("repository is in the middle of an operation (merge, rebase, etc)")]
    RepositoryBusy,

    #[error("repository is in detached HEAD state")]
    DetachedHead,

    #[error("{action}: {source}")]
    Git {
        action: &'static str,
        #[source]
        source: git2::Error,
    },

    #[error("failed to stage files: {}", .0.join("; "))]
    Stage(Vec<String>),

    #[error("failed to run git {command}: {source}")]
    Spawn {
        command: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("git {command} failed with {status}")]
    CommandFailed {
        command: &'static str,
        status: ExitStatus,
    },
}

impl GitError {
    /// adapter for `map_err` on libgit2 results
    pub fn git(action: &'static str) -> impl FnOnce(git2::Error) -> Self {
        move |source| Self::Git { action, source }
    }
}

/// errors raised while resolving the provider configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{variable} is not set, add it to the environment or a .env file to use {provider}")]
    MissingApiKey {
        provider: ProviderKind,
        variable: &'static str,
    },

    #[error("unknown AI_PROVIDER '{0}' (expected gemini, zai or openai)")]
    UnknownProvider(String),

    #[error("unknown COMMIT_STYLE '{0}' (expected standard, sarcastic or humorous)")]
    UnknownStyle(String),

    #[error("failed to load {}: {source}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

/// failures reported by an AI provider back-end
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{provider} rate limit or quota exhausted: {detail}")]
    RateLimited {
        provider: &'static str,
        detail: String,
    },

    #[error("{provider} returned HTTP {status}: {detail}")]
    Http {
        provider: &'static str,
        status: u16,
        detail: String,
    },

    #[error("request to {provider} failed: {detail}")]
    Transport {
        provider: &'static str,
        detail: String,
    },

    #[error("unexpected response from {provider}: {detail}")]
    MalformedResponse {
        provider: &'static str,
        detail: String,
    },

    #[error("{provider} returned an empty completion")]
    EmptyCompletion { provider: &'static str },
}

/// the provider refused the request because of rate limiting or quota exhaustion
#[derive(Error, Debug)]
#[error("{provider} is rate limited or out of quota, try again later ({detail})")]
pub struct CommitGenerationError {
    pub provider: &'static str,
    pub detail: String,
}

/// errors from the commit template editor session
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("failed to write commit template: {0}")]
    Template(#[source] std::io::Error),

    #[error("failed to run editor '{editor}': {source}")]
    Spawn {
        editor: String,
        #[source]
        source: std::io::Error,
    },

    #[error("editor '{editor}' exited with {status}")]
    Failed { editor: String, status: ExitStatus },

    #[error("failed to read edited commit message: {0}")]
    Read(#[source] std::io::Error),

    #[error("editor session interrupted")]
    Interrupted,
}

/// the user pressed esc or ctrl-c at a prompt
#[derive(Error, Debug)]
#[error("interrupted")]
pub struct Interrupted;
