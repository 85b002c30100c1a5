use super::{Provider, excerpt, read_response};
use crate::config::ProviderConfig;
use crate::error::ProviderError;
use serde::{Deserialize, Serialize};
use ureq::Agent;

const NAME: &str = "Gemini";

/// Google Gemini `generateContent` endpoint
pub struct GeminiProvider {
    agent: Agent,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(agent: Agent, config: &ProviderConfig) -> Self {
        Self {
            agent,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: Option<String>,
    status: Option<String>,
}

impl Provider for GeminiProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    fn submit_prompt(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let result = self
            .agent
            .post(&url)
            .header("x-goog-api-key", self.api_key.as_str())
            .send_json(&request);
        let (status, body) = read_response(NAME, result)?;

        interpret(status, &body)
    }
}

fn interpret(status: u16, body: &str) -> Result<String, ProviderError> {
    if !(200..300).contains(&status) {
        let error = serde_json::from_str::<ErrorEnvelope>(body).ok().map(|e| e.error);
        let detail = error
            .as_ref()
            .and_then(|e| e.message.clone())
            .unwrap_or_else(|| excerpt(body));
        let exhausted = error
            .as_ref()
            .and_then(|e| e.status.as_deref())
            .is_some_and(|s| s == "RESOURCE_EXHAUSTED");

        return Err(if status == 429 || exhausted {
            ProviderError::RateLimited {
                provider: NAME,
                detail,
            }
        } else {
            ProviderError::Http {
                provider: NAME,
                status,
                detail,
            }
        });
    }

    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::MalformedResponse {
            provider: NAME,
            detail: e.to_string(),
        })?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        Err(ProviderError::EmptyCompletion { provider: NAME })
    } else {
        Ok(text)
    }
}
