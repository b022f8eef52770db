use crate::config::{StrategySettings, is_blank};
use crate::error::UpstreamError;
use crate::models::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{debug, info};

pub fn join_url(api_base: &str, path: &str) -> String {
    if api_base.ends_with('/') {
        format!("{}{}", api_base, path)
    } else {
        format!("{}/{}", api_base, path)
    }
}

pub fn strategy_prompt(country: &str) -> String {
    format!(
        "Give a geopolitical strategy summary for {} as if it were a piece in a global chess game. \
         Include its role, goals, recent moves, and predicted strategy.",
        country
    )
}

/// Chat-completion client for the strategy narrative.
#[derive(Debug)]
pub struct LlmClient {
    http_client: Arc<reqwest::Client>,
    settings: StrategySettings,
    api_key: SecretString,
}

impl LlmClient {
    pub fn new(
        http_client: Arc<reqwest::Client>,
        settings: StrategySettings,
        api_key: SecretString,
    ) -> Self {
        Self {
            http_client,
            settings,
            api_key,
        }
    }

    fn build_request(&self, prompt: String) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        }
    }

    /// Send one prompt and return the text of the first completion.
    pub async fn complete(&self, prompt: String) -> Result<String, UpstreamError> {
        if is_blank(&self.api_key) {
            return Err(UpstreamError::MissingCredential("OpenAI API key"));
        }

        let target_url = join_url(&self.settings.api_base, "chat/completions");
        let body = self.build_request(prompt);

        info!("Forwarding completion request to: {}", target_url);
        debug!("model: {}, max_tokens: {}", body.model, body.max_tokens);

        let response = self
            .http_client
            .post(&target_url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let completion: ChatCompletionResponse = serde_json::from_slice(&bytes)
            .map_err(|e| UpstreamError::Parse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .ok_or(UpstreamError::Malformed("no choices in completion"))?
            .message
            .content
            .ok_or(UpstreamError::Malformed("completion has no content"))
    }
}
