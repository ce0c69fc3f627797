//! HTTP client used by the CLI to talk to a running service.

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::{Duration, Instant};
use url::Url;

use crate::models::{
    CitationResponse, CiteRequest, HealthStatus, MetadataRecord, SearchQuery, SearchResponse,
};
use crate::utils::HttpClient;

/// Interval between readiness checks
const READY_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Failures seen by the CLI client
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Cannot reach the papervista service at {url}. Start it with `papervista serve`.")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with an error body
    #[error("{detail}")]
    Service {
        status: u16,
        kind: String,
        detail: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Service at {url} not ready after {waited:?}")]
    NotReady { url: String, waited: Duration },
}

impl ClientError {
    /// Machine-readable kind reported by the service, if any
    pub fn kind(&self) -> Option<&str> {
        match self {
            ClientError::Service { kind, .. } => Some(kind),
            _ => None,
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            ClientError::Connection { .. } | ClientError::NotReady { .. }
        )
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    detail: String,
}

/// Typed client for the service's JSON API
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: HttpClient,
    base: Url,
}

impl ServiceClient {
    /// Create a client for the service at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            http: HttpClient::with_timeout(timeout)?,
            base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base.join(path)?)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await.map_err(|e| {
            if e.is_connect() {
                ClientError::Connection {
                    url: self.base.to_string(),
                    source: e,
                }
            } else {
                ClientError::Http(e)
            }
        })?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let text = response.text().await.unwrap_or_default();
        let (kind, detail) = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => (body.error, body.detail),
            Err(_) => ("http".to_string(), format!("HTTP {}: {}", status, text)),
        };
        Err(ClientError::Service {
            status: status.as_u16(),
            kind,
            detail,
        })
    }

    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let url = self.endpoint("health")?;
        self.send(self.http.get(url.as_str())).await
    }

    /// Poll `/health` until the service answers or `timeout` elapses
    pub async fn wait_ready(&self, timeout: Duration) -> Result<HealthStatus, ClientError> {
        let started = Instant::now();
        loop {
            match self.health().await {
                Ok(status) => return Ok(status),
                Err(e) if e.is_connection() && started.elapsed() < timeout => {
                    tracing::debug!("Service not ready yet, retrying");
                    tokio::time::sleep(READY_POLL_INTERVAL).await;
                }
                Err(e) if e.is_connection() => {
                    return Err(ClientError::NotReady {
                        url: self.base.to_string(),
                        waited: started.elapsed(),
                    })
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, ClientError> {
        let url = self.endpoint("search")?;
        self.send(self.http.post(url.as_str()).json(query)).await
    }

    pub async fn cite(
        &self,
        id: &str,
        style: Option<&str>,
    ) -> Result<CitationResponse, ClientError> {
        let url = self.endpoint("cite")?;
        let body = CiteRequest {
            id: id.to_string(),
            style: style.map(str::to_string),
        };
        self.send(self.http.post(url.as_str()).json(&body)).await
    }

    pub async fn paper(&self, id: &str) -> Result<MetadataRecord, ClientError> {
        let url = self.endpoint(&format!("papers/{}", urlencoding::encode(id)))?;
        self.send(self.http.get(url.as_str())).await
    }
}
