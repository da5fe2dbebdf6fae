//! HTTP client for the school REST API
//!
//! Wraps `reqwest`, attaches the bearer token, throttles outgoing requests
//! and refreshes the session once when the backend answers 401.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Instant;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use crate::config::ApiConfig;
use crate::models::{RefreshRequest, TokenPair};
use crate::utils::errors::{ApiError, ApiResult};
use crate::utils::helpers::{generate_request_id, truncate_text};
use crate::utils::logging::{log_api_error, log_api_request};
use super::token::TokenStore;

const REFRESH_PATH: &str = "/auth/refresh";

/// Error body shape returned by the backend
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// REST API client shared by all services
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    tokens: TokenStore,
    refresh_lock: Arc<Mutex<()>>,
    limiter: Arc<DefaultDirectRateLimiter>,
}

impl ApiClient {
    /// Create a new ApiClient instance
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        url::Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidRequest(format!("invalid base URL {}: {}", config.base_url, e)))?;

        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        let rps = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens: TokenStore::new(),
            refresh_lock: Arc::new(Mutex::new(())),
            limiter: Arc::new(RateLimiter::direct(Quota::per_second(rps))),
        })
    }

    /// Token storage shared with every clone of this client
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET and decode a JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ApiResult<T> {
        let response = self.execute(Method::GET, path, query, None).await?;
        Self::decode(response).await
    }

    /// GET a raw body
    pub async fn get_bytes(&self, path: &str, query: &[(&str, String)]) -> ApiResult<Vec<u8>> {
        let response = self.execute(Method::GET, path, query, None).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// POST a JSON body and decode the JSON response
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ApiResult<T> {
        let body = Self::encode(body)?;
        let response = self.execute(Method::POST, path, &[], Some(&body)).await?;
        Self::decode(response).await
    }

    /// POST a JSON body and return the raw response bytes
    pub async fn post_for_bytes<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<Vec<u8>> {
        let body = Self::encode(body)?;
        let response = self.execute(Method::POST, path, &[], Some(&body)).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// PUT a JSON body and decode the JSON response
    pub async fn put_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ApiResult<T> {
        let body = Self::encode(body)?;
        let response = self.execute(Method::PUT, path, &[], Some(&body)).await?;
        Self::decode(response).await
    }

    /// PATCH a JSON body and decode the JSON response
    pub async fn patch_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ApiResult<T> {
        let body = Self::encode(body)?;
        let response = self.execute(Method::PATCH, path, &[], Some(&body)).await?;
        Self::decode(response).await
    }

    /// Send a request whose response body is ignored
    pub async fn send_unit(&self, method: Method, path: &str, body: Option<&Value>) -> ApiResult<()> {
        self.execute(method, path, &[], body).await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.send_unit(Method::DELETE, path, None).await
    }

    fn encode<B: Serialize>(body: &B) -> ApiResult<Value> {
        serde_json::to_value(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// Send a request with the current bearer token.
    ///
    /// A 401 triggers at most one refresh and one replay. If the refresh
    /// fails the stored session is cleared.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> ApiResult<Response> {
        self.refresh_if_expired().await?;

        let access = self.tokens.access_token().await;
        let response = self.send_once(method.clone(), path, query, body, access.as_deref()).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::check_status(path, response).await;
        }

        let Some(stale) = access else {
            return Err(ApiError::Unauthorized);
        };

        debug!(path = path, "Got 401, attempting token refresh");
        if !self.refresh_tokens(&stale).await? {
            return Err(ApiError::Unauthorized);
        }

        let access = self.tokens.access_token().await;
        let response = self.send_once(method, path, query, body, access.as_deref()).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            warn!(path = path, "Request still unauthorized after refresh, clearing session");
            self.tokens.clear().await;
            return Err(ApiError::Unauthorized);
        }

        Self::check_status(path, response).await
    }

    async fn send_once(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
        access_token: Option<&str>,
    ) -> ApiResult<Response> {
        self.limiter.until_ready().await;

        let request_id = generate_request_id();
        let mut request = self
            .http
            .request(method.clone(), self.url(path))
            .header("X-Request-Id", &request_id);

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = access_token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let started = Instant::now();
        let response = request.send().await.map_err(|e| {
            let err = Self::map_transport_error(e);
            log_api_error(path, &err.to_string(), Some(&request_id));
            err
        })?;

        log_api_request(
            method.as_str(),
            path,
            response.status().as_u16(),
            started.elapsed().as_millis() as u64,
        );
        Ok(response)
    }

    fn map_transport_error(e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_connect() {
            ApiError::Unavailable(e.to_string())
        } else {
            ApiError::Transport(e)
        }
    }

    async fn check_status(path: &str, response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(ErrorBody { message: Some(message), .. }) => message,
            Ok(ErrorBody { error: Some(error), .. }) => error,
            _ => truncate_text(text.trim(), 200),
        };

        log_api_error(path, &format!("HTTP {}", status.as_u16()), Some(&message));
        Err(ApiError::Status { status: status.as_u16(), message })
    }

    /// Refresh ahead of time when the stored JWT has already expired
    async fn refresh_if_expired(&self) -> ApiResult<()> {
        if !self.tokens.access_token_expired(chrono::Utc::now()).await {
            return Ok(());
        }
        if let Some(stale) = self.tokens.access_token().await {
            debug!("Access token expired, refreshing before request");
            self.refresh_tokens(&stale).await?;
        }
        Ok(())
    }

    /// Exchange the refresh token for a new pair.
    ///
    /// Returns `Ok(true)` when a usable access token is stored afterwards.
    /// Concurrent callers holding the same stale token share one refresh.
    async fn refresh_tokens(&self, stale_access: &str) -> ApiResult<bool> {
        let _guard = self.refresh_lock.lock().await;

        match self.tokens.access_token().await {
            Some(current) if current != stale_access => return Ok(true),
            None => return Ok(false),
            _ => {}
        }

        let Some(refresh_token) = self.tokens.refresh_token().await else {
            return Ok(false);
        };

        let body = Self::encode(&RefreshRequest { refresh_token })?;
        let response = self.send_once(Method::POST, REFRESH_PATH, &[], Some(&body), None).await?;

        if !response.status().is_success() {
            warn!(status = response.status().as_u16(), "Token refresh rejected, clearing session");
            self.tokens.clear().await;
            return Ok(false);
        }

        let tokens: TokenPair = Self::decode(response).await?;
        self.tokens.set(tokens).await;
        info!("Access token refreshed");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn test_url_join_keeps_base_path() {
        let mut config = Settings::default().api;
        config.base_url = "http://localhost:8080/api/".to_string();
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.url("/lessons"), "http://localhost:8080/api/lessons");
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let mut config = Settings::default().api;
        config.base_url = "::nope".to_string();
        assert!(matches!(ApiClient::new(&config), Err(ApiError::InvalidRequest(_))));
    }

    #[test]
    fn test_error_body_parsing() {
        let body: ErrorBody = serde_json::from_str(r#"{"message": "Lesson not found"}"#).unwrap();
        assert_eq!(body.message.as_deref(), Some("Lesson not found"));
    }
}
