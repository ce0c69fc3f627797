//! HTTP/JSON API served by `papervista serve`.
//!
//! | Method | Path                  | Body                      |
//! |--------|-----------------------|---------------------------|
//! | GET    | `/health`             |                           |
//! | POST   | `/search`             | `{query, max_results?}`   |
//! | POST   | `/cite`               | `{id, style?}`            |
//! | GET    | `/papers/{id}`        |                           |
//! | POST   | `/generate/citation`  | CSL-JSON item or record, `?style=` |
//!
//! Failures are returned as `{"error": <kind>, "detail": <message>}`,
//! including bodies or query strings that fail to decode.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::error::CitationError;
use crate::models::{
    CitationInput, CitationResponse, CiteRequest, HealthStatus, MetadataRecord, SearchQuery,
    SearchResponse,
};
use crate::service::CitationService;
use crate::utils::CitationStyle;

/// Error body shared by every route
#[derive(Debug)]
pub struct ApiError(CitationError);

impl From<CitationError> for ApiError {
    fn from(err: CitationError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(CitationError::InvalidRequest(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(CitationError::InvalidRequest(rejection.body_text()))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            CitationError::SearchUnavailable(_) => StatusCode::BAD_GATEWAY,
            CitationError::NotFound(_) => StatusCode::NOT_FOUND,
            CitationError::UnsupportedStyle { .. } | CitationError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.0.kind(),
            "detail": self.0.to_string(),
        });
        (self.status(), Json(body)).into_response()
    }
}

/// Build the router over a shared service
pub fn router(service: CitationService) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/search", post(search_handler))
        .route("/cite", post(cite_handler))
        .route("/papers/{id}", get(paper_handler))
        .route("/generate/citation", post(generate_citation_handler))
        .with_state(service)
}

async fn health_handler(State(service): State<CitationService>) -> Json<HealthStatus> {
    Json(service.health())
}

async fn search_handler(
    State(service): State<CitationService>,
    body: Result<Json<SearchQuery>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(query) = body?;
    tracing::debug!(query = %query.query, max_results = query.max_results, "Search request");
    Ok(Json(service.search(&query).await?))
}

async fn cite_handler(
    State(service): State<CitationService>,
    body: Result<Json<CiteRequest>, JsonRejection>,
) -> Result<Json<CitationResponse>, ApiError> {
    let Json(req) = body?;
    let style = req
        .style
        .as_deref()
        .unwrap_or(CitationStyle::default().name());
    Ok(Json(service.cite(&req.id, style)?))
}

async fn paper_handler(
    State(service): State<CitationService>,
    Path(id): Path<String>,
) -> Result<Json<MetadataRecord>, ApiError> {
    let record = service.paper(&id)?;
    Ok(Json(MetadataRecord::clone(&record)))
}

#[derive(Debug, Deserialize)]
struct StyleParam {
    style: Option<String>,
}

async fn generate_citation_handler(
    params: Result<Query<StyleParam>, QueryRejection>,
    body: Result<Json<CitationInput>, JsonRejection>,
) -> Result<Json<CitationResponse>, ApiError> {
    let Query(params) = params?;
    let record = MetadataRecord::from(body?.0);
    let style = params
        .style
        .as_deref()
        .unwrap_or(CitationStyle::default().name());
    Ok(Json(CitationService::format_record(&record, style)?))
}

/// Bind the listener; the service is reachable once this returns.
pub async fn bind(addr: &str) -> std::io::Result<TcpListener> {
    TcpListener::bind(addr).await
}

/// Serve the API on `listener` until Ctrl-C.
pub async fn serve(listener: TcpListener, service: CitationService) -> std::io::Result<()> {
    let local: Option<SocketAddr> = listener.local_addr().ok();
    tracing::info!(
        addr = ?local,
        source = service.source_name(),
        strategy = ?service.store().strategy(),
        "papervista service ready"
    );

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (
                CitationError::SearchUnavailable("down".into()),
                StatusCode::BAD_GATEWAY,
            ),
            (CitationError::NotFound("p9".into()), StatusCode::NOT_FOUND),
            (
                CitationError::UnsupportedStyle {
                    style: "chicago".into(),
                    supported: "apa".into(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                CitationError::InvalidRequest("empty".into()),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }
}
