//! Ollama-backed implementation of [`TextReasoner`].
//!
//! Uses `ureq` for synchronous HTTP against an Ollama-compatible API. Image
//! OCR goes through the same generate endpoint with the image attached as a
//! base64 payload, which requires a multimodal model (e.g. llava).

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use super::{ReasonError, ReasonResult, TextReasoner};

/// Configuration for the Ollama reasoner.
#[derive(Debug, Clone)]
pub struct ReasonerConfig {
    /// Base URL for the Ollama API.
    pub base_url: String,
    /// Model name to use.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            model: "llama3.2".into(),
            timeout_secs: 120,
        }
    }
}

/// Client for an Ollama-compatible reasoning service.
pub struct OllamaReasoner {
    config: ReasonerConfig,
}

impl OllamaReasoner {
    /// Create a new reasoner with the given configuration.
    pub fn new(config: ReasonerConfig) -> Self {
        Self { config }
    }

    /// The model name being used.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Probe the service with a lightweight request.
    ///
    /// Used at startup to fail fast with a clear diagnostic instead of
    /// timing out on the first document.
    pub fn probe(&self) -> bool {
        let url = format!("{}/api/tags", self.config.base_url);
        let agent = ureq::AgentBuilder::new()
            .timeout(std::time::Duration::from_secs(5))
            .build();
        matches!(agent.get(&url).call(), Ok(resp) if resp.status() == 200)
    }

    /// POST a generate request and return the `response` field.
    fn generate(&self, body: serde_json::Value) -> ReasonResult<String> {
        let url = format!("{}/api/generate", self.config.base_url);
        let agent = ureq::AgentBuilder::new()
            .timeout(std::time::Duration::from_secs(self.config.timeout_secs))
            .build();

        let body_str = serde_json::to_string(&body).map_err(|e| ReasonError::RequestFailed {
            message: format!("JSON serialize error: {e}"),
        })?;

        let resp = agent
            .post(&url)
            .set("Content-Type", "application/json")
            .send_string(&body_str)
            .map_err(|e: ureq::Error| match e {
                ureq::Error::Transport(t) => ReasonError::Unavailable {
                    url: format!("{} ({t})", self.config.base_url),
                },
                other => ReasonError::RequestFailed {
                    message: other.to_string(),
                },
            })?;

        let resp_str = resp.into_string().map_err(|e| ReasonError::MalformedResponse {
            message: e.to_string(),
        })?;

        let json: serde_json::Value =
            serde_json::from_str(&resp_str).map_err(|e| ReasonError::MalformedResponse {
                message: e.to_string(),
            })?;

        json["response"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| ReasonError::MalformedResponse {
                message: "missing 'response' field".into(),
            })
    }
}

impl TextReasoner for OllamaReasoner {
    fn complete(&self, system: Option<&str>, prompt: &str) -> ReasonResult<String> {
        let mut body = serde_json::json!({
            "model": self.config.model,
            "prompt": prompt,
            "stream": false,
        });
        if let Some(sys) = system {
            body["system"] = serde_json::Value::String(sys.to_string());
        }
        self.generate(body)
    }

    fn describe_image(&self, image: &[u8], instruction: &str) -> ReasonResult<String> {
        let body = serde_json::json!({
            "model": self.config.model,
            "prompt": instruction,
            "images": [BASE64.encode(image)],
            "stream": false,
        });
        self.generate(body)
    }
}

impl std::fmt::Debug for OllamaReasoner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaReasoner")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = ReasonerConfig::default();
        assert_eq!(config.base_url, "http://localhost:11434");
        assert_eq!(config.model, "llama3.2");
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn probe_unreachable_returns_false() {
        let reasoner = OllamaReasoner::new(ReasonerConfig {
            base_url: "http://127.0.0.1:1".into(), // unreachable port
            ..Default::default()
        });
        assert!(!reasoner.probe());
    }

    #[test]
    fn complete_unreachable_is_unavailable() {
        let reasoner = OllamaReasoner::new(ReasonerConfig {
            base_url: "http://127.0.0.1:1".into(),
            timeout_secs: 1,
            ..Default::default()
        });
        assert!(matches!(
            reasoner.complete(None, "hello"),
            Err(ReasonError::Unavailable { .. })
        ));
    }
}
