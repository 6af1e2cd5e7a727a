// ABOUTME: HTTP API exposing page info, readable rendering and segment extraction on GET /.
// ABOUTME: Failures are reported as 422 JSON bodies; requests without a known parameter get 400.

use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use cetd_core::Extractor;
use serde::Deserialize;
use serde_json::json;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::error::WebError;
use crate::fetch::Fetcher;
use crate::info::page_info;
use crate::render::{render_readable, wrap_document, RenderOptions};

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub fetcher: Fetcher,
    pub extractor: Extractor,
    pub render: RenderOptions,
    /// Upper bound for a whole request, fetch included.
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(fetcher: Fetcher) -> Self {
        let request_timeout = fetcher.options().timeout * 2;
        Self {
            fetcher,
            extractor: Extractor::default(),
            render: RenderOptions::default(),
            request_timeout,
        }
    }
}

/// Query parameters; the first non-empty one in this order is served.
#[derive(Debug, Default, Deserialize)]
pub struct ApiQuery {
    pub info: Option<String>,
    pub content: Option<String>,
    pub text: Option<String>,
}

enum Action {
    Info(String),
    Content(String),
    Text(String),
}

impl ApiQuery {
    fn action(self) -> Option<Action> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        if let Some(url) = non_empty(self.info) {
            return Some(Action::Info(url));
        }
        if let Some(url) = non_empty(self.content) {
            return Some(Action::Content(url));
        }
        non_empty(self.text).map(Action::Text)
    }
}

/// JSON error response.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<WebError> for ApiError {
    fn from(err: WebError) -> Self {
        tracing::warn!(error = %err, "request failed");
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "status": "error", "message": self.message });
        (self.status, Json(body)).into_response()
    }
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    let timeout = state.request_timeout;
    Router::new()
        .route("/", get(root_handler))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .with_state(state)
}

async fn root_handler(
    State(state): State<AppState>,
    Query(query): Query<ApiQuery>,
) -> Result<Response, ApiError> {
    match query.action() {
        Some(Action::Info(url)) => info_handler(&state, &url).await,
        Some(Action::Content(url)) => content_handler(&state, &url).await,
        Some(Action::Text(url)) => text_handler(&state, &url).await,
        None => Err(ApiError {
            status: StatusCode::BAD_REQUEST,
            message: "expected one of the query parameters: info, content, text".to_string(),
        }),
    }
}

async fn info_handler(state: &AppState, url: &str) -> Result<Response, ApiError> {
    tracing::info!(url, "info request");
    let fetched = state.fetcher.get_with_retry(url).await?;
    let info = run_blocking(url, "page_info", move || {
        Ok(page_info(&fetched.text_utf8(), &fetched.final_url))
    })
    .await?;
    let headers = [
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        (header::ACCESS_CONTROL_ALLOW_METHODS, "GET"),
    ];
    Ok((headers, Json(json!({ "url": url, "info": info }))).into_response())
}

async fn content_handler(state: &AppState, url: &str) -> Result<Response, ApiError> {
    tracing::info!(url, "content request");
    let fetched = state.fetcher.get_with_retry(url).await?;
    let render = state.render.clone();
    let page = run_blocking(url, "render_readable", move || {
        let content = render_readable(&fetched.text_utf8(), &fetched.final_url, &render)?;
        Ok(wrap_document(&content, &fetched.final_url))
    })
    .await?;
    Ok(Html(page).into_response())
}

async fn text_handler(state: &AppState, url: &str) -> Result<Response, ApiError> {
    tracing::info!(url, "text request");
    let fetched = state.fetcher.get_with_retry(url).await?;
    let extractor = state.extractor.clone();
    let page_url = url.to_string();
    let extraction = run_blocking(url, "extract", move || {
        extractor
            .extract(&fetched.text_utf8())
            .map_err(|e| WebError::extract(page_url, "extract", Some(e.into())))
    })
    .await?;
    Ok(Json(json!({ "url": url, "segments": extraction.segments })).into_response())
}

/// Run DOM parsing and scoring off the async workers. A panicked task
/// surfaces as an Extract error.
async fn run_blocking<T, F>(url: &str, op: &str, f: F) -> Result<T, WebError>
where
    F: FnOnce() -> Result<T, WebError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| WebError::extract(url, op, Some(e.into())))?
}
