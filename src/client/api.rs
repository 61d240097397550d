//! API Client
//!
//! Thin reqwest wrapper: resolves paths against the base URL, attaches the
//! bearer token and turns non-2xx answers into `ApiError::Status`.

use std::sync::OnceLock;

use regex::Regex;
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::cache::CachedBlob;
use crate::config::Config;
use crate::error::{ApiError, ApiResult};

// == API Client ==
/// Authenticated HTTP client for the Ledgr REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Creates a client for `base_url`, sending `token` as a bearer token.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            token,
        }
    }

    /// Creates a client from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_url.clone(), config.api_token.clone())
    }

    /// Absolute URLs pass through, `/paths` are joined to the base URL.
    pub fn resolve_url(&self, input: &str) -> String {
        let lower = input.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            input.to_string()
        } else if input.starts_with('/') {
            format!("{}{}", self.base_url, input)
        } else {
            input.to_string()
        }
    }

    // == Get JSON ==
    /// GETs `path` and decodes the body as `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let res = self.get(path).await?;
        let body = res.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    // == Get Blob ==
    /// GETs `path` as raw bytes, named after its `Content-Disposition`
    /// header or `fallback_name`.
    pub async fn get_blob(&self, path: &str, fallback_name: &str) -> ApiResult<CachedBlob> {
        let res = self.get(path).await?;
        let filename = res
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .map(|cd| filename_from_content_disposition(cd, fallback_name))
            .unwrap_or_else(|| fallback_name.to_string());
        let blob = res.bytes().await?;
        Ok(CachedBlob::new(blob, Some(filename)))
    }

    async fn get(&self, path: &str) -> ApiResult<Response> {
        let url = self.resolve_url(path);
        debug!("GET {}", url);

        let mut request = self.http.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let res = request.send().await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }
        Ok(res)
    }
}

// == Content-Disposition ==
fn disposition_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)filename\*=UTF-8''([^;]+)|filename="?([^";]+)"?"#)
            .expect("static regex is valid")
    })
}

/// Extracts the download file name from a `Content-Disposition` value.
///
/// The first `filename*=UTF-8''…` or `filename="…"` parameter wins. An
/// encoded name that is not valid UTF-8 once decoded is returned raw.
pub fn filename_from_content_disposition(header: &str, fallback: &str) -> String {
    let Some(caps) = disposition_regex().captures(header) else {
        return fallback.to_string();
    };
    if let Some(encoded) = caps.get(1) {
        let encoded = encoded.as_str();
        return urlencoding::decode(encoded)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| encoded.to_string());
    }
    caps.get(2)
        .map(|plain| plain.as_str().to_string())
        .unwrap_or_else(|| fallback.to_string())
}
