//! Authentication service implementation
//!
//! This service handles the login flow (password, then an optional MFA
//! one-time code), session refresh and logout, and keeps the API client's
//! token store in sync with the session.

use reqwest::Method;
use tracing::{info, warn, debug};
use crate::api::ApiClient;
use crate::models::{LoginOutcome, LoginRequest, LoginResponse, MfaVerifyRequest, Session, TokenPair, User};
use crate::utils::errors::{ApiError, AuthError, LinguaDeskError, Result};
use crate::utils::helpers::{is_valid_email, is_valid_mfa_code};
use crate::utils::logging::log_auth_event;

/// Authentication service for the REST session
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// First login step: email and password
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        if !is_valid_email(email) {
            return Err(LinguaDeskError::Validation(format!("invalid email: {}", email)));
        }
        if password.is_empty() {
            return Err(LinguaDeskError::Validation("password is required".to_string()));
        }

        // A stale session must not be refreshed on behalf of a new login
        self.api.tokens().clear().await;

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response: LoginResponse = self
            .api
            .post_json("/auth/login", &request)
            .await
            .map_err(Self::map_credentials_error)?;

        if response.mfa_required {
            let mfa_token = response.mfa_token.ok_or_else(|| {
                ApiError::InvalidResponse("MFA required but no MFA token returned".to_string())
            })?;
            log_auth_event(email, "mfa_challenge", None);
            return Ok(LoginOutcome::MfaRequired { mfa_token });
        }

        let session = Self::session_from(response)?;
        self.api.tokens().set(session.tokens()).await;
        log_auth_event(email, "login", Some(session.user.role));
        Ok(LoginOutcome::Authenticated(session))
    }

    /// Second login step: confirm the one-time code
    pub async fn verify_mfa(&self, mfa_token: &str, code: &str) -> Result<Session> {
        let code = code.trim();
        if !is_valid_mfa_code(code) {
            return Err(AuthError::InvalidMfaCode("code must be 6 digits".to_string()).into());
        }

        let request = MfaVerifyRequest {
            mfa_token: mfa_token.to_string(),
            code: code.to_string(),
        };

        let response: LoginResponse = self
            .api
            .post_json("/auth/verify-mfa", &request)
            .await
            .map_err(|e| match e {
                ApiError::Unauthorized | ApiError::Status { status: 400, .. } => {
                    LinguaDeskError::Auth(AuthError::InvalidMfaCode("code was rejected".to_string()))
                }
                other => other.into(),
            })?;

        let session = Self::session_from(response)?;
        self.api.tokens().set(session.tokens()).await;
        log_auth_event(&session.user.email, "mfa_verified", Some(session.user.role));
        Ok(session)
    }

    /// Full login, asking `code_provider` for the MFA code when challenged
    pub async fn login_with_mfa<F>(&self, email: &str, password: &str, code_provider: F) -> Result<Session>
    where
        F: FnOnce() -> Option<String>,
    {
        match self.login(email, password).await? {
            LoginOutcome::Authenticated(session) => Ok(session),
            LoginOutcome::MfaRequired { mfa_token } => {
                let code = code_provider().ok_or(AuthError::MfaRequired)?;
                self.verify_mfa(&mfa_token, &code).await
            }
        }
    }

    /// Currently logged in user
    pub async fn current_user(&self) -> Result<User> {
        if !self.api.tokens().is_authenticated().await {
            return Err(AuthError::NotAuthenticated.into());
        }
        debug!("Fetching current user");
        self.api.get_json("/auth/me", &[]).await.map_err(Self::map_session_error)
    }

    /// Restore a previously saved token pair
    pub async fn restore(&self, tokens: TokenPair) -> Result<User> {
        self.api.tokens().set(tokens).await;
        self.current_user().await
    }

    /// End the session on the backend and locally
    pub async fn logout(&self) -> Result<()> {
        if !self.api.tokens().is_authenticated().await {
            return Ok(());
        }

        if let Err(e) = self.api.send_unit(Method::POST, "/auth/logout", None).await {
            // The local session is dropped regardless
            warn!(error = %e, "Backend logout failed");
        }
        self.api.tokens().clear().await;
        info!("Logged out");
        Ok(())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.api.tokens().is_authenticated().await
    }

    fn session_from(response: LoginResponse) -> Result<Session> {
        match (response.access_token, response.refresh_token, response.user) {
            (Some(access_token), Some(refresh_token), Some(user)) => Ok(Session {
                access_token,
                refresh_token,
                user,
            }),
            _ => Err(ApiError::InvalidResponse("login response is missing tokens or user".to_string()).into()),
        }
    }

    fn map_credentials_error(e: ApiError) -> LinguaDeskError {
        match e {
            ApiError::Unauthorized | ApiError::Status { status: 401, .. } => AuthError::InvalidCredentials.into(),
            other => other.into(),
        }
    }

    fn map_session_error(e: ApiError) -> LinguaDeskError {
        match e {
            ApiError::Unauthorized => AuthError::SessionExpired.into(),
            other => other.into(),
        }
    }
}
