//! Bearer token storage and access-token claim inspection
//!
//! Tokens are shared by every clone of the API client. Claims are read
//! without verifying the signature: the backend is the authority, the
//! client only wants to know when a token is about to expire.

use std::collections::HashSet;
use std::sync::Arc;
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use crate::models::{Role, TokenPair};
use crate::utils::errors::AuthError;

/// Claims we care about in an access token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub exp: Option<i64>,
    pub iat: Option<i64>,
    pub role: Option<String>,
}

impl AccessClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }

    /// Expired, or expiring within `leeway_seconds`
    pub fn is_expired(&self, now: DateTime<Utc>, leeway_seconds: i64) -> bool {
        match self.expires_at() {
            Some(expires_at) => expires_at <= now + chrono::Duration::seconds(leeway_seconds),
            None => false,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(|r| r.parse().ok())
    }
}

/// Decode access-token claims without checking the signature
pub fn decode_claims(token: &str) -> Result<AccessClaims, AuthError> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();

    decode::<AccessClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::MalformedToken(e.to_string()))
}

/// Shared, async-safe holder for the current token pair
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    inner: Arc<RwLock<Option<TokenPair>>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, tokens: TokenPair) {
        *self.inner.write().await = Some(tokens);
    }

    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }

    pub async fn get(&self) -> Option<TokenPair> {
        self.inner.read().await.clone()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.inner.read().await.as_ref().map(|t| t.access_token.clone())
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.inner.read().await.as_ref().map(|t| t.refresh_token.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_some()
    }

    /// Whether the stored access token is a JWT that has (nearly) expired
    pub async fn access_token_expired(&self, now: DateTime<Utc>) -> bool {
        match self.access_token().await {
            Some(token) => decode_claims(&token)
                .map(|claims| claims.is_expired(now, 5))
                .unwrap_or(false),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token(exp: i64, role: &str) -> String {
        let claims = AccessClaims {
            sub: "anna@school.com".to_string(),
            exp: Some(exp),
            iat: None,
            role: Some(role.to_string()),
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(b"server-secret")).unwrap()
    }

    #[test]
    fn test_decode_claims_without_secret() {
        let exp = Utc::now().timestamp() + 3600;
        let claims = decode_claims(&token(exp, "MANAGER")).unwrap();
        assert_eq!(claims.sub, "anna@school.com");
        assert_eq!(claims.role(), Some(Role::Manager));
        assert!(!claims.is_expired(Utc::now(), 5));
    }

    #[test]
    fn test_expired_claims() {
        let exp = Utc::now().timestamp() - 10;
        let claims = decode_claims(&token(exp, "ADMIN")).unwrap();
        assert!(claims.is_expired(Utc::now(), 0));
    }

    #[test]
    fn test_opaque_token_is_malformed() {
        assert!(matches!(decode_claims("opaque-token"), Err(AuthError::MalformedToken(_))));
    }

    #[tokio::test]
    async fn test_store_roundtrip() {
        let store = TokenStore::new();
        assert!(!store.is_authenticated().await);

        store.set(TokenPair { access_token: "a".to_string(), refresh_token: "r".to_string() }).await;
        assert_eq!(store.access_token().await.as_deref(), Some("a"));
        assert_eq!(store.refresh_token().await.as_deref(), Some("r"));
        assert!(!store.access_token_expired(Utc::now()).await);

        store.clear().await;
        assert!(store.get().await.is_none());
    }
}
