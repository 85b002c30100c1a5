use crate::changeset::FileDiffMap;
use crate::config::CommitStyle;
use crate::constants::{FALLBACK_MESSAGE, MAX_LINE_LENGTH};
use crate::error::{CommitGenerationError, ProviderError};
use crate::provider::Provider;

const SARCASTIC_STYLE: &str = "\
STYLE: write the message with dry, subtle sarcasm.
- stay technically accurate: the message must still describe the actual change
- follow git commit conventions (imperative summary line, optional body after a blank line)
- keep the sarcasm understated and professional: no silliness, no memes";

const HUMOROUS_STYLE: &str = "\
STYLE: write the message with light, subtle humor.
- stay technically accurate: the message must still describe the actual change
- follow git commit conventions (imperative summary line, optional body after a blank line)
- keep the humor understated and professional: no silliness, no memes";

/// how a generation attempt ended
#[derive(Debug)]
pub enum Generation {
    /// the provider produced a usable message
    Generated(String),
    /// the provider failed; the fixed fallback message is used instead
    Degraded {
        message: String,
        reason: ProviderError,
    },
    /// the provider is rate limited, retrying later is the only sensible option
    RateLimited(CommitGenerationError),
}

fn style_instructions(style: CommitStyle) -> Option<&'static str> {
    match style {
        CommitStyle::Standard => None,
        CommitStyle::Sarcastic => Some(SARCASTIC_STYLE),
        CommitStyle::Humorous => Some(HUMOROUS_STYLE),
    }
}

/// build the full prompt sent to the provider
pub fn build_prompt(language: &str, style: CommitStyle, diffs: &FileDiffMap) -> String {
    compose(language, style_instructions(style), diffs)
}

fn compose(language: &str, style_block: Option<&str>, diffs: &FileDiffMap) -> String {
    let mut prompt = format!(
        r#"
Write a git commit message in {language} for the changes below.
Output only the commit message, no explanations or preamble.

RULES:
- the summary line must not exceed {MAX_LINE_LENGTH} characters
- if a body is useful, separate it from the summary line with one blank line
- do not use markdown formatting: no code fences, no heading markers
- emojis are allowed
"#
    )
    .trim()
    .to_string();
    prompt.push('\n');

    if let Some(block) = style_block {
        prompt.push('\n');
        prompt.push_str(block);
        prompt.push('\n');
    }

    prompt.push_str("\nCHANGED FILES:\n");
    for (path, diff) in diffs {
        let note = if diff.deleted { " (deleted)" } else { "" };
        prompt.push_str(&format!("- {path}{note}\n"));
    }

    for (path, diff) in diffs {
        prompt.push_str(&format!("\nFile: {path}\nChanges:\n{}\n", diff.text));
    }

    prompt
}

/// normalise provider output into a commit message
///
/// unwraps a surrounding code fence, squeezes repeated spaces inside lines,
/// collapses three or more newlines into two and trims the result. idempotent.
pub fn postprocess(text: &str) -> String {
    let normalised = text.replace("\r\n", "\n");
    let lines: Vec<String> = normalised
        .split('\n')
        .map(|line| squeeze_spaces(line.trim_end()))
        .collect();

    let mut message = lines.join("\n").trim().to_string();
    while let Some(inner) = strip_code_fence(&message) {
        message = inner;
    }

    collapse_newlines(&message).trim().to_string()
}

/// keep leading indentation, collapse runs of spaces after it
fn squeeze_spaces(line: &str) -> String {
    let content = line.trim_start();
    let indent = &line[..line.len() - content.len()];

    let mut out = String::with_capacity(line.len());
    out.push_str(indent);
    let mut previous_space = false;
    for ch in content.chars() {
        if ch == ' ' && previous_space {
            continue;
        }
        previous_space = ch == ' ';
        out.push(ch);
    }
    out
}

/// remove an outer ``` fence, returning the trimmed inner text
fn strip_code_fence(text: &str) -> Option<String> {
    let lines: Vec<&str> = text.split('\n').collect();
    let (first, rest) = lines.split_first()?;
    let (last, inner) = rest.split_last()?;
    if first.starts_with("```") && *last == "```" {
        Some(inner.join("\n").trim().to_string())
    } else {
        None
    }
}

fn collapse_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0;
    for ch in text.chars() {
        if ch == '\n' {
            run += 1;
            if run > 2 {
                continue;
            }
        } else {
            run = 0;
        }
        out.push(ch);
    }
    out
}

/// ask the provider for a message, degrading to the fallback on any failure but rate limiting
pub fn generate(provider: &dyn Provider, prompt: &str) -> Generation {
    match provider.submit_prompt(prompt) {
        Ok(text) => {
            let message = postprocess(&text);
            if message.is_empty() {
                Generation::Degraded {
                    message: FALLBACK_MESSAGE.to_string(),
                    reason: ProviderError::EmptyCompletion {
                        provider: provider.name(),
                    },
                }
            } else {
                Generation::Generated(message)
            }
        }
        Err(ProviderError::RateLimited { provider, detail }) => {
            Generation::RateLimited(CommitGenerationError { provider, detail })
        }
        Err(reason) => Generation::Degraded {
            message: FALLBACK_MESSAGE.to_string(),
            reason,
        },
    }
}
