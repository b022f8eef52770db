use crate::error::{ApiError, UpstreamError};
use crate::llm_client::strategy_prompt;
use crate::models::{CountryRequest, NewsResult, StrategyResult};
use crate::request_id::inject_request_id;
use crate::state::AppState;
use crate::validation::require_country;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

pub const LIVENESS_MESSAGE: &str = "Geo-Chess AI backend is running.";
pub const AI_REQUEST_FAILED: &str = "AI request failed.";
pub const NEWS_FETCH_FAILED: &str = "Failed to fetch news.";
pub const NEWS_KEY_MISSING: &str = "News API key is not configured.";

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { LIVENESS_MESSAGE }))
        .route("/health", get(|| async { "OK" }))
        .route("/api/strategy", post(strategy))
        .route("/api/news", post(news))
        .layer(axum::middleware::from_fn(inject_request_id))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

#[axum_macros::debug_handler]
pub async fn strategy(
    State(app_state): State<AppState>,
    payload: Result<Json<CountryRequest>, JsonRejection>,
) -> Result<Json<StrategyResult>, ApiError> {
    let country = require_country(payload)?;
    info!("Strategy requested for {}", country);

    match app_state.llm_client.complete(strategy_prompt(&country)).await {
        Ok(summary) => Ok(Json(StrategyResult { summary })),
        Err(e) => {
            error!("Strategy generation failed for {}: {}", country, e);
            Err(ApiError::Internal(AI_REQUEST_FAILED.to_string()))
        }
    }
}

#[axum_macros::debug_handler]
pub async fn news(
    State(app_state): State<AppState>,
    payload: Result<Json<CountryRequest>, JsonRejection>,
) -> Result<Json<NewsResult>, ApiError> {
    let country = require_country(payload)?;
    info!("News requested for {}", country);

    match app_state.news_client.search(&country).await {
        Ok(articles) => {
            info!("Returning {} articles for {}", articles.len(), country);
            Ok(Json(NewsResult { articles }))
        }
        Err(e) => Err(news_error(&country, e)),
    }
}

/// Only configuration problems and messages the news service chose to report
/// reach the client; everything else collapses to the generic message.
fn news_error(country: &str, e: UpstreamError) -> ApiError {
    match e {
        UpstreamError::MissingCredential(what) => {
            error!("News request for {} refused: {} is missing", country, what);
            ApiError::Internal(NEWS_KEY_MISSING.to_string())
        }
        UpstreamError::Reported(message) => {
            warn!(
                "News service reported an error for {}: {}",
                country,
                message.as_deref().unwrap_or("<no message>")
            );
            ApiError::Internal(message.unwrap_or_else(|| NEWS_FETCH_FAILED.to_string()))
        }
        other => {
            error!("News fetch failed for {}: {}", country, other);
            ApiError::Internal(NEWS_FETCH_FAILED.to_string())
        }
    }
}
