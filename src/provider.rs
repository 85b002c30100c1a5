mod chat;
mod gemini;

use crate::config::{ProviderConfig, ProviderKind};
use crate::constants::REQUEST_TIMEOUT_SECS;
use crate::error::ProviderError;
use std::time::Duration;
use ureq::Agent;

pub use chat::ChatProvider;
pub use gemini::GeminiProvider;

/// a completion back-end: submit prompt text, receive completion text
#[cfg_attr(test, mockall::automock)]
pub trait Provider {
    /// display name used in messages
    fn name(&self) -> &'static str;

    fn submit_prompt(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// build the back-end selected by the configuration
pub fn from_config(config: &ProviderConfig) -> Box<dyn Provider> {
    let agent = http_agent();
    match config.kind {
        ProviderKind::Gemini => Box::new(GeminiProvider::new(agent, config)),
        ProviderKind::Zai => Box::new(ChatProvider::zai(agent, config)),
        ProviderKind::Openai => Box::new(ChatProvider::openai(agent, config)),
    }
}

/// blocking agent that hands non-2xx responses back so their bodies can be inspected
fn http_agent() -> Agent {
    Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .http_status_as_error(false)
        .build()
        .into()
}

/// status code and body of a finished request
fn read_response(
    provider: &'static str,
    result: Result<ureq::http::Response<ureq::Body>, ureq::Error>,
) -> Result<(u16, String), ProviderError> {
    let transport = |e: ureq::Error| ProviderError::Transport {
        provider,
        detail: e.to_string(),
    };
    let mut response = result.map_err(transport)?;
    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().map_err(transport)?;
    Ok((status, body))
}

/// shorten a response body for error messages
fn excerpt(body: &str) -> String {
    const MAX_CHARS: usize = 200;
    let body = body.trim();
    match body.char_indices().nth(MAX_CHARS) {
        Some((end, _)) => format!("{}...", &body[..end]),
        None => body.to_string(),
    }
}
