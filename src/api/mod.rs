//! HTTP client layer
//!
//! Bearer-authenticated access to the school REST API.

pub mod client;
pub mod token;

pub use client::ApiClient;
pub use token::{AccessClaims, TokenStore, decode_claims};
