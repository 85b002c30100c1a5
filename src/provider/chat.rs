use super::{Provider, excerpt, read_response};
use crate::config::ProviderConfig;
use crate::error::ProviderError;
use serde::{Deserialize, Serialize};
use ureq::Agent;

/// error codes that mean "out of quota" or "slow down" rather than a broken request.
/// the numeric ones are Z.AI business codes (balance, concurrency and rate limits).
const QUOTA_CODES: &[&str] = &[
    "insufficient_quota",
    "rate_limit_exceeded",
    "1113",
    "1302",
    "1303",
    "1304",
    "1308",
];

/// OpenAI compatible `chat/completions` endpoint, used for Z.AI and OpenAI
pub struct ChatProvider {
    name: &'static str,
    agent: Agent,
    api_key: String,
    model: String,
    base_url: String,
}

impl ChatProvider {
    pub fn zai(agent: Agent, config: &ProviderConfig) -> Self {
        Self::new("Z.AI", agent, config)
    }

    pub fn openai(agent: Agent, config: &ProviderConfig) -> Self {
        Self::new("OpenAI", agent, config)
    }

    fn new(name: &'static str, agent: Agent, config: &ProviderConfig) -> Self {
        Self {
            name,
            agent,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
        }
    }

    fn interpret(&self, status: u16, body: &str) -> Result<String, ProviderError> {
        let provider = self.name;

        if !(200..300).contains(&status) {
            let error = serde_json::from_str::<ErrorEnvelope>(body).ok().map(|e| e.error);
            let detail = error
                .as_ref()
                .and_then(|e| e.message.clone())
                .unwrap_or_else(|| excerpt(body));
            let code = error.as_ref().and_then(|e| e.code_string());
            let quota = code.as_deref().is_some_and(|c| QUOTA_CODES.contains(&c));

            return Err(if status == 429 || quota {
                ProviderError::RateLimited { provider, detail }
            } else {
                ProviderError::Http {
                    provider,
                    status,
                    detail,
                }
            });
        }

        let response: ChatResponse =
            serde_json::from_str(body).map_err(|e| ProviderError::MalformedResponse {
                provider,
                detail: e.to_string(),
            })?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if text.trim().is_empty() {
            Err(ProviderError::EmptyCompletion { provider })
        } else {
            Ok(text)
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: Option<String>,
    // string for OpenAI, sometimes a number for Z.AI
    code: Option<serde_json::Value>,
}

impl ApiError {
    fn code_string(&self) -> Option<String> {
        match self.code.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl Provider for ChatProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn submit_prompt(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };

        let result = self
            .agent
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send_json(&request);
        let (status, body) = read_response(self.name, result)?;

        self.interpret(status, &body)
    }
}
