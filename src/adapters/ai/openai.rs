//! OpenAI-compatible language model adapter.
//!
//! Implements both [`DraftReformatter`] and [`ChatModel`] against any
//! `/chat/completions` endpoint. The reformatter instructs the model to
//! return strict JSON with the draft's exact shape; anything that fails to
//! parse falls back to the draft verbatim, so the capability never errors.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::engine::DecisionOutput;
use crate::ports::{
    ChatModel, ChatModelError, ChatRole, ChatTurn, DraftReformatter, Reformatted,
};

const REFORMAT_SYSTEM_PROMPT: &str = "You are a merchandising decision assistant. \
    You will receive a decision draft as JSON. Rewrite its narrative fields into crisp, \
    confident prose and return STRICTLY the same JSON structure with the same fields. \
    Output JSON only, no surrounding text. Never use hedging words such as 'maybe', \
    'you could consider', or 'probably'.";

const QA_SYSTEM_PROMPT: &str = "You are a concise, professional assistant for e-commerce \
    product selection and shop operations. Answer directly and make every answer actionable.";

/// Configuration for the OpenAI-compatible client.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl OpenAiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Client for an OpenAI-compatible chat completions API.
pub struct OpenAiClient {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn chat(&self, messages: Vec<WireMessage>) -> Result<String, ChatModelError> {
        let body = CompletionRequest {
            model: self.config.model.clone(),
            messages,
            temperature: 0.2,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.config.api_key())
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatModelError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ChatModelError::BadResponse(format!(
                "status {status}: {detail}"
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatModelError::BadResponse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ChatModelError::BadResponse("empty choices".to_string()))
    }

    async fn rewrite_draft(&self, draft: &DecisionOutput) -> Result<DecisionOutput, ChatModelError> {
        let draft_json = serde_json::to_string(draft)
            .map_err(|e| ChatModelError::BadResponse(e.to_string()))?;

        let messages = vec![
            WireMessage::system(REFORMAT_SYSTEM_PROMPT),
            WireMessage::user(draft_json),
        ];

        let content = self.chat(messages).await?;
        serde_json::from_str(content.trim()).map_err(|e| ChatModelError::BadResponse(e.to_string()))
    }
}

#[async_trait]
impl DraftReformatter for OpenAiClient {
    async fn reformat(&self, draft: &DecisionOutput) -> Reformatted {
        match self.rewrite_draft(draft).await {
            Ok(output) => Reformatted { output, ok: true },
            Err(err) => {
                tracing::warn!(error = %err, "draft rewrite failed, returning rule output verbatim");
                Reformatted::fallback(draft)
            }
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn answer(
        &self,
        question: &str,
        history: &[ChatTurn],
    ) -> Result<String, ChatModelError> {
        let mut messages = vec![WireMessage::system(QA_SYSTEM_PROMPT)];
        for turn in history {
            let role = match turn.role {
                ChatRole::User => "user",
                ChatRole::Ai => "assistant",
            };
            messages.push(WireMessage {
                role: role.to_string(),
                content: turn.content.clone(),
            });
        }
        messages.push(WireMessage::user(question));

        self.chat(messages).await
    }
}

// Wire types for the chat completions API.

#[derive(Debug, Clone, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

impl WireMessage {
    fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: WireMessage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::engine::{
        ConfidencePosture, DecisionMeta, DecisionOutput, FailureExpectation, OutputMode, RiskKind,
    };
    use crate::domain::foundation::DecisionId;
    use crate::ports::DraftReformatter;
    use std::time::Duration;

    fn test_draft() -> DecisionOutput {
        DecisionOutput {
            decision_id: DecisionId::new(),
            headline: "Today's best pick".to_string(),
            action: "List it".to_string(),
            reason_one_line: "Window is clear".to_string(),
            primary_risk: "Stage fit is low".to_string(),
            why_it: vec!["category match: top".to_string()],
            dont_do: vec![],
            failure_expectation: FailureExpectation {
                likely: RiskKind::Stage,
                next_action: "Test basics".to_string(),
            },
            meta: DecisionMeta {
                mode: OutputMode::Best,
                confidence_style: ConfidencePosture::Conservative,
                rules_fired: vec![],
                state_snapshot_version: 0,
            },
        }
    }

    #[test]
    fn completion_response_parses_expected_wire_format() {
        let raw = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "hello"}}
            ]
        }"#;
        let parsed: CompletionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content, "hello");
    }

    #[test]
    fn completions_url_tolerates_trailing_slash() {
        let client = OpenAiClient::new(
            OpenAiConfig::new("sk-test").with_base_url("http://localhost:9999/v1/"),
        );
        assert_eq!(
            client.completions_url(),
            "http://localhost:9999/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn reformat_falls_back_to_the_draft_on_transport_failure() {
        // Nothing listens here; the request fails fast and the draft must
        // come back unchanged.
        let client = OpenAiClient::new(
            OpenAiConfig::new("sk-test")
                .with_base_url("http://127.0.0.1:9")
                .with_timeout(Duration::from_millis(250)),
        );

        let draft = test_draft();
        let result = client.reformat(&draft).await;

        assert!(!result.ok);
        assert_eq!(result.output, draft);
    }
}
