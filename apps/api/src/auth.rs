//! Identity boundary: session resolution and the route gate.
//!
//! The application needs exactly two answers from the identity provider:
//! does this request carry an authenticated session, and which user id owns
//! it. Everything else about the provider stays behind [`IdentityProvider`].
//! An unauthenticated request to a protected route gets a temporary redirect
//! to the sign-in page, not an application error.

use std::collections::HashMap;

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use crate::state::AppState;

/// Resolved identity attached to the request after the gate passes. Handlers
/// read it through `Extension<AuthSession>`.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Maps a bearer token to a user id. `None` means the provider does not
    /// recognize the token.
    async fn resolve(&self, token: &str) -> Option<String>;
}

/// Static token table, the development and self-hosted deployment shape.
/// Parsed from `SESSION_TOKENS=token1:alice,token2:bob`; an empty list means
/// no token is ever accepted.
pub struct StaticTokenProvider {
    tokens: HashMap<String, String>,
}

impl StaticTokenProvider {
    pub fn from_token_list(list: &str) -> Self {
        let tokens = list
            .split(',')
            .filter_map(|pair| {
                let (token, user) = pair.trim().split_once(':')?;
                if token.is_empty() || user.is_empty() {
                    return None;
                }
                Some((token.to_string(), user.to_string()))
            })
            .collect();
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl IdentityProvider for StaticTokenProvider {
    async fn resolve(&self, token: &str) -> Option<String> {
        self.tokens.get(token).cloned()
    }
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Route-layer gate for everything behind sign-in. On success the resolved
/// [`AuthSession`] is inserted into request extensions; on failure the
/// response is a 307 to the sign-in page carrying the original URL as
/// `redirect_url` so the client can come back after signing in.
pub async fn require_session(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let token = bearer_token(&req).map(str::to_owned);
    let resolved = match token {
        Some(token) => state.identity.resolve(&token).await,
        None => None,
    };

    match resolved {
        Some(user_id) => {
            req.extensions_mut().insert(AuthSession { user_id });
            next.run(req).await
        }
        None => {
            let original = format!("{}{}", state.config.base_url, req.uri());
            let target = format!(
                "{}?redirect_url={}",
                state.config.sign_in_url,
                urlencoding::encode(&original)
            );
            debug!("unauthenticated request to {}, redirecting to sign-in", req.uri().path());
            Redirect::temporary(&target).into_response()
        }
    }
}
