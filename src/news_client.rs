use crate::config::{NewsSettings, is_blank};
use crate::error::UpstreamError;
use crate::llm_client::join_url;
use crate::models::{NewsArticle, NewsSearchResponse};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Search client for the news service. The key is optional so that a missing
/// key fails each request up front instead of reaching the network.
#[derive(Debug)]
pub struct NewsClient {
    http_client: Arc<reqwest::Client>,
    settings: NewsSettings,
    api_key: Option<SecretString>,
}

impl NewsClient {
    pub fn new(
        http_client: Arc<reqwest::Client>,
        settings: NewsSettings,
        api_key: Option<SecretString>,
    ) -> Self {
        Self {
            http_client,
            settings,
            api_key,
        }
    }

    pub async fn search(&self, country: &str) -> Result<Vec<NewsArticle>, UpstreamError> {
        let api_key = self
            .api_key
            .as_ref()
            .filter(|k| !is_blank(k))
            .ok_or(UpstreamError::MissingCredential("News API key"))?;

        let target_url = join_url(&self.settings.api_base, "search");
        let max = self.settings.max_articles.to_string();

        // Only the bare URL is logged; the full one carries the key.
        info!("Searching news at: {} (q={:?})", target_url, country);

        let response = self
            .http_client
            .get(&target_url)
            .query(&[
                ("q", country),
                ("lang", self.settings.language.as_str()),
                ("max", max.as_str()),
                ("apikey", api_key.expose_secret().as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        debug!("news response status {}, {} bytes", status, bytes.len());

        let body: NewsSearchResponse = serde_json::from_slice(&bytes)
            .map_err(|e| UpstreamError::Parse(e.to_string()))?;
        interpret_search_response(status, body, || String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Classify a decoded search response. An explicit error wins over the HTTP
/// status; a body without any article list is ill-formed.
pub fn interpret_search_response(
    status: StatusCode,
    body: NewsSearchResponse,
    raw_body: impl FnOnce() -> String,
) -> Result<Vec<NewsArticle>, UpstreamError> {
    for shape in [&body.error, &body.errors].into_iter().flatten() {
        if shape.is_signaled() {
            return Err(UpstreamError::Reported(shape.message()));
        }
    }

    if body.status.as_deref() == Some("error") {
        let message = body
            .message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        return Err(UpstreamError::Reported(message));
    }

    if !status.is_success() {
        return Err(UpstreamError::Status {
            status: status.as_u16(),
            body: raw_body(),
        });
    }

    match body.articles {
        None => Err(UpstreamError::Malformed("response has no articles list")),
        Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(articles)) => Ok(articles.into_iter().map(NewsArticle).collect()),
        Some(_) => Err(UpstreamError::Malformed("articles is not a list")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn decode(value: Value) -> NewsSearchResponse {
        serde_json::from_value(value).unwrap()
    }

    fn no_body() -> String {
        String::new()
    }

    fn client_for(api_base: String, key: Option<&str>) -> NewsClient {
        let settings = NewsSettings {
            api_base,
            ..NewsSettings::default()
        };
        NewsClient::new(
            Arc::new(reqwest::Client::new()),
            settings,
            key.map(|k| SecretString::new(k.to_string())),
        )
    }

    #[test]
    fn error_list_is_reported() {
        let err = interpret_search_response(
            StatusCode::FORBIDDEN,
            decode(json!({ "errors": ["You did not provide an API key."] })),
            no_body,
        )
        .unwrap_err();
        assert!(
            matches!(err, UpstreamError::Reported(Some(ref m)) if m == "You did not provide an API key.")
        );
    }

    #[test]
    fn single_error_wins_over_articles() {
        let err = interpret_search_response(
            StatusCode::OK,
            decode(json!({ "error": "Rate limit reached", "articles": [] })),
            no_body,
        )
        .unwrap_err();
        assert!(matches!(err, UpstreamError::Reported(Some(ref m)) if m == "Rate limit reached"));
    }

    #[test]
    fn status_error_uses_message() {
        let err = interpret_search_response(
            StatusCode::UNAUTHORIZED,
            decode(json!({ "status": "error", "code": "apiKeyInvalid", "message": "Your API key is invalid." })),
            no_body,
        )
        .unwrap_err();
        assert!(matches!(err, UpstreamError::Reported(Some(ref m)) if m == "Your API key is invalid."));
    }

    #[test]
    fn error_without_message_has_no_display_text() {
        let err = interpret_search_response(
            StatusCode::OK,
            decode(json!({ "error": { "code": 500 } })),
            no_body,
        )
        .unwrap_err();
        assert!(matches!(err, UpstreamError::Reported(None)));
    }

    #[test]
    fn missing_articles_is_malformed() {
        let err = interpret_search_response(StatusCode::OK, decode(json!({ "totalArticles": 0 })), no_body)
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Malformed(_)));
    }

    #[test]
    fn null_articles_is_empty() {
        let articles =
            interpret_search_response(StatusCode::OK, decode(json!({ "articles": null })), no_body).unwrap();
        assert!(articles.is_empty());
    }

    #[test]
    fn failed_status_without_error_payload() {
        let err = interpret_search_response(
            StatusCode::BAD_GATEWAY,
            decode(json!({})),
            || "upstream down".to_string(),
        )
        .unwrap_err();
        assert!(matches!(err, UpstreamError::Status { status: 502, ref body } if body == "upstream down"));
    }

    #[tokio::test]
    async fn search_sends_encoded_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "United Kingdom".into()),
                Matcher::UrlEncoded("lang".into(), "en".into()),
                Matcher::UrlEncoded("max".into(), "3".into()),
                Matcher::UrlEncoded("apikey".into(), "news-key".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "totalArticles": 1,
                    "articles": [{
                        "title": "London talks",
                        "description": "Trade",
                        "url": "https://example.com/uk",
                        "publishedAt": "2025-03-01T10:00:00Z",
                        "source": { "name": "Example" }
                    }]
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let articles = client_for(server.url(), Some("news-key"))
            .search("United Kingdom")
            .await
            .unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title(), Some("London talks"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_key_skips_the_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("GET", Matcher::Any).expect(0).create_async().await;

        for key in [None, Some("  ")] {
            let err = client_for(server.url(), key).search("Japan").await.unwrap_err();
            assert!(matches!(err, UpstreamError::MissingCredential(_)));
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_json_body_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = client_for(server.url(), Some("news-key")).search("Chile").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Parse(_)));
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let api_base = crate::test_utils::silent_upstream().await;
        let client = NewsClient::new(
            crate::test_utils::client_with_timeout(std::time::Duration::from_millis(200)),
            NewsSettings {
                api_base,
                ..NewsSettings::default()
            },
            Some(SecretString::new("news-key".to_string())),
        );

        let err = client.search("Japan").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Timeout), "got {:?}", err);
    }
}
