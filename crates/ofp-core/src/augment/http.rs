use super::{AugmentError, RemoteExtractor, SecondaryRecord};
use serde_json::Value;
use std::time::Duration;

/// Longest document slice sent to the remote service.
const MAX_PROMPT_CHARS: usize = 30_000;

const SYSTEM_PROMPT: &str = "You extract structured flight plan data from \
operational flight plan text. Respond with a single JSON object under the \
key \"flightplan\" containing flight_number, route, departure, destination, \
destination_alternate, weights, fuel, weather and notams. Use null for \
anything you cannot find. If the text is not a flight plan, respond with \
{\"llm_error\": \"<reason>\"}.";

/// Chat-completions backed implementation of [`RemoteExtractor`].
/// Credentials come from the environment; the endpoint is never given a
/// default so augmentation stays off unless explicitly configured.
pub struct HttpRemoteExtractor {
    endpoint: String,
    api_key: String,
    model: String,
    agent: ureq::Agent,
}

impl HttpRemoteExtractor {
    pub fn new(endpoint: String, api_key: String, model: String, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(10))
            .timeout(timeout)
            .build();
        HttpRemoteExtractor {
            endpoint,
            api_key,
            model,
            agent,
        }
    }

    /// Build from `OFP_REMOTE_URL`, `OFP_REMOTE_API_KEY` and
    /// `OFP_REMOTE_MODEL`. Returns `None` when the URL or key is unset.
    pub fn from_env() -> Option<Self> {
        let endpoint = std::env::var("OFP_REMOTE_URL").ok()?;
        let api_key = std::env::var("OFP_REMOTE_API_KEY").ok()?;
        let model =
            std::env::var("OFP_REMOTE_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        Some(Self::new(endpoint, api_key, model, Duration::from_secs(60)))
    }
}

impl RemoteExtractor for HttpRemoteExtractor {
    fn extract_remote(&self, text: &str) -> Result<SecondaryRecord, AugmentError> {
        let excerpt: String = text.chars().take(MAX_PROMPT_CHARS).collect();
        let payload = serde_json::json!({
            "model": self.model,
            "temperature": 0,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": excerpt },
            ],
        });

        let response = self
            .agent
            .post(&self.endpoint)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(payload)
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => AugmentError::Status(code),
                ureq::Error::Transport(t) => AugmentError::Transport(t.to_string()),
            })?;

        let body: Value = response
            .into_json()
            .map_err(|e| AugmentError::Malformed(e.to_string()))?;
        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| AugmentError::Malformed("no message content".to_string()))?;

        parse_remote_content(content)
    }

    fn provider_name(&self) -> &str {
        "chat-completions"
    }
}

/// Parse the model's reply: strip code fences, reject declared service
/// errors, and accept the record either under a `flightplan` key or as the
/// top-level object.
fn parse_remote_content(content: &str) -> Result<SecondaryRecord, AugmentError> {
    let stripped = strip_fences(content);
    let value: Value = serde_json::from_str(stripped)
        .map_err(|e| AugmentError::Malformed(format!("content is not JSON: {e}")))?;

    if let Some(reason) = value.get("llm_error").and_then(Value::as_str) {
        return Err(AugmentError::Service(reason.to_string()));
    }

    let record = match value.get("flightplan") {
        Some(inner) => inner.clone(),
        None => value,
    };
    serde_json::from_value(record).map_err(|e| AugmentError::Malformed(e.to_string()))
}

fn strip_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}
