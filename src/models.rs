use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Inbound body shared by both endpoints. `country` stays optional here so that
/// absent and null values reach validation instead of failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountryRequest {
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyResult {
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsResult {
    pub articles: Vec<NewsArticle>,
}

// Chat completion wire types

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub index: u32,
    pub message: ChatResponseMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponseMessage {
    pub role: String,
    pub content: Option<String>,
}

// News search wire types

/// An article exactly as the news service sent it. Nothing is dropped or
/// reshaped on the way back out, nulls included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NewsArticle(pub Value);

impl NewsArticle {
    pub fn title(&self) -> Option<&str> {
        self.0.get("title").and_then(Value::as_str)
    }
}

/// The error payload shapes the news service has been seen to use.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UpstreamErrorShape {
    Message(String),
    Messages(Vec<String>),
    Detail { message: String },
    Other(Value),
}

impl UpstreamErrorShape {
    /// Collapse any shape to a single display message.
    pub fn message(&self) -> Option<String> {
        let msg = match self {
            UpstreamErrorShape::Message(m) => m.trim().to_string(),
            UpstreamErrorShape::Messages(list) => list
                .iter()
                .map(|m| m.trim())
                .filter(|m| !m.is_empty())
                .collect::<Vec<_>>()
                .join("; "),
            UpstreamErrorShape::Detail { message } => message.trim().to_string(),
            UpstreamErrorShape::Other(_) => String::new(),
        };
        if msg.is_empty() { None } else { Some(msg) }
    }

    /// `null` and `false` error fields do not signal a failure.
    pub fn is_signaled(&self) -> bool {
        !matches!(self, UpstreamErrorShape::Other(Value::Null | Value::Bool(false)))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsSearchResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<UpstreamErrorShape>,
    #[serde(default)]
    pub errors: Option<UpstreamErrorShape>,
    #[serde(default, rename = "totalArticles")]
    pub total_articles: Option<u64>,
    /// `None` when the key is absent, `Some(Value::Null)` for an explicit null.
    #[serde(default, deserialize_with = "deserialize_present")]
    pub articles: Option<Value>,
}

fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
