use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::news_client::NewsClient;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AppState {
    pub llm_client: Arc<LlmClient>,
    pub news_client: Arc<NewsClient>,
}

impl AppState {
    pub fn new(config: &Config, http_client: Arc<reqwest::Client>) -> Self {
        let llm_client = LlmClient::new(
            http_client.clone(),
            config.settings.strategy.clone(),
            config.credentials.openai_api_key.clone(),
        );
        let news_client = NewsClient::new(
            http_client,
            config.settings.news.clone(),
            Some(config.credentials.news_api_key.clone()),
        );
        Self {
            llm_client: Arc::new(llm_client),
            news_client: Arc::new(news_client),
        }
    }
}
