//! Mock school backend for testing
//!
//! Wraps a wiremock server mounted under `/api` and provides canned auth
//! responses plus a helper to mint access tokens with a chosen expiry.

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use wiremock::{
    matchers::{body_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

use LinguaDesk::api::AccessClaims;
use LinguaDesk::config::Settings;
use LinguaDesk::models::{Role, TokenPair};
use LinguaDesk::services::ServiceFactory;

pub const TEST_EMAIL: &str = "admin@school.test";
pub const TEST_PASSWORD: &str = "correct-horse";

/// Mock REST API server for testing
pub struct MockApiServer {
    pub server: MockServer,
}

impl MockApiServer {
    /// Start a new mock server
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn base_url(&self) -> String {
        format!("{}/api", self.server.uri())
    }

    /// Default settings pointed at this server
    pub fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        settings.api.base_url = self.base_url();
        settings.api.timeout_seconds = 5;
        settings.api.requests_per_second = 1000;
        settings.auth.email = TEST_EMAIL.to_string();
        settings.auth.password = TEST_PASSWORD.to_string();
        settings
    }

    pub fn services(&self) -> ServiceFactory {
        ServiceFactory::new(&self.settings()).expect("Failed to build services")
    }

    /// Services with a session already stored, skipping the login request
    pub async fn signed_in_services(&self, access_token: &str) -> ServiceFactory {
        let services = self.services();
        services
            .api
            .tokens()
            .set(TokenPair {
                access_token: access_token.to_string(),
                refresh_token: "refresh-1".to_string(),
            })
            .await;
        services
    }

    /// Password login that succeeds without MFA
    pub async fn mock_login_success(&self, role: Role) {
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({ "email": TEST_EMAIL, "password": TEST_PASSWORD })))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_json("access-1", "refresh-1", role)))
            .mount(&self.server)
            .await;
    }

    /// Password login that asks for an MFA code
    pub async fn mock_login_mfa_challenge(&self, mfa_token: &str) {
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "mfaRequired": true,
                "mfaToken": mfa_token,
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_login_rejected(&self) {
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad credentials" })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_verify_mfa(&self, mfa_token: &str, code: &str, role: Role) {
        Mock::given(method("POST"))
            .and(path("/api/auth/verify-mfa"))
            .and(body_json(json!({ "mfaToken": mfa_token, "code": code })))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_json("access-1", "refresh-1", role)))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Refresh endpoint issuing `access_token`, expected exactly `calls` times
    pub async fn mock_refresh(&self, access_token: &str, calls: u64) {
        Mock::given(method("POST"))
            .and(path("/api/auth/refresh"))
            .and(body_json(json!({ "refreshToken": "refresh-1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "accessToken": access_token,
                "refreshToken": "refresh-2",
            })))
            .expect(calls)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_refresh_rejected(&self) {
        Mock::given(method("POST"))
            .and(path("/api/auth/refresh"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_logout(&self) {
        Mock::given(method("POST"))
            .and(path("/api/auth/logout"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Drop all mocks and recorded requests
    pub async fn reset(&self) {
        self.server.reset().await;
    }

    /// Requests received so far matching `method` and `path`
    pub async fn received(&self, http_method: &str, request_path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.as_str() == http_method && r.url.path() == request_path)
            .count()
    }
}

pub fn user_json(id: i64, role: Role) -> Value {
    json!({
        "id": id,
        "email": TEST_EMAIL,
        "firstName": "Anna",
        "lastName": "Smirnova",
        "role": role.as_str(),
        "mfaEnabled": false,
    })
}

pub fn session_json(access_token: &str, refresh_token: &str, role: Role) -> Value {
    json!({
        "accessToken": access_token,
        "refreshToken": refresh_token,
        "user": user_json(1, role),
    })
}

/// HS256 access token expiring `expires_in_seconds` from now
pub fn access_jwt(role: Role, expires_in_seconds: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = AccessClaims {
        sub: TEST_EMAIL.to_string(),
        exp: Some(now + expires_in_seconds),
        iat: Some(now),
        role: Some(role.as_str().to_string()),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"test-secret"))
        .expect("Failed to encode test token")
}
