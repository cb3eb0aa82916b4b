//! Request handlers

use super::docs::DOCS_HTML;
use super::params::RequestParams;
use super::AppState;
use crate::model::CrawlResult;
use crate::output::render_json;
use crate::url::{validate_album_link, validate_link, LISTING_USAGE};
use crate::LinkError;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use std::collections::HashMap;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

fn json_response(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], body).into_response()
}

impl IntoResponse for LinkError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        json_response(StatusCode::BAD_REQUEST, format!("{:#}\n", body))
    }
}

fn crawl_response(result: &CrawlResult) -> Response {
    match render_json(result) {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode crawl result");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to encode result").into_response()
        }
    }
}

/// `GET /album` (and `/zonerama-album`)
pub async fn album(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, LinkError> {
    let params = RequestParams::from(query);
    let link = validate_album_link(params.link(), &state.config.site.allowed_hosts)?;
    let options = params.album_options(&state.config);

    tracing::info!(%link, photo_limit = options.photo_limit, rendered = options.rendered, "Album request");
    let result = state.coordinator.crawl_album(&link, &options).await;
    Ok(crawl_response(&result))
}

/// `GET /listing` (and `/zonerama`)
pub async fn listing(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, LinkError> {
    let params = RequestParams::from(query);
    let link = validate_link(
        params.link(),
        &state.config.site.allowed_hosts,
        LISTING_USAGE,
    )?;
    let options = params.listing_options(&state.config);

    tracing::info!(
        %link,
        entity_limit = options.entity_limit,
        photo_limit = options.photo_limit,
        concurrency = options.concurrency,
        rendered = options.rendered,
        "Listing request"
    );
    let result = state.coordinator.crawl_listing(&link, &options).await;
    Ok(crawl_response(&result))
}

/// `GET /`
pub async fn docs() -> Html<&'static str> {
    Html(DOCS_HTML)
}

/// `GET /health`
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_link_error_is_json_400() {
        let response = LinkError::Invalid.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json; charset=utf-8"
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "invalid link URL");
    }

    #[tokio::test]
    async fn test_crawl_response_is_pretty_json() {
        let response = crawl_response(&CrawlResult::new("https://eu.zonerama.com/A"));
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("\n  \"entities\": []"));
    }
}
