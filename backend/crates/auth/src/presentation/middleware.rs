//! Auth Middleware
//!
//! Per-request state machine for protected routes:
//!
//! ```text
//! Unauthenticated -> Verifying -> Authorized
//!                             -> Rotating -> Authorized (fresh pair on the response)
//!                             -> Rejected
//! ```
//!
//! A request is assessed once and rotated at most once.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use kernel::id::AccountId;
use std::sync::Arc;

use crate::application::UpdateTokensUseCase;
use crate::application::config::AuthConfig;
use crate::domain::repository::RefreshTokenRepository;
use crate::domain::token::{TokenCodec, TokenError, TokenKind, TokenPair};
use crate::error::AuthError;

/// Identity attached to a request once its credentials check out
///
/// Protected handlers take it as an extractor. If the middleware did not
/// run, extraction fails with `AuthError::MissingIdentity` (500).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedAccount(pub AccountId);

impl AuthenticatedAccount {
    pub fn id(&self) -> AccountId {
        self.0
    }
}

impl<S> FromRequestParts<S> for AuthenticatedAccount
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedAccount>()
            .copied()
            .ok_or(AuthError::MissingIdentity)
    }
}

/// Outcome of checking a request's credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Access token valid
    Authorized(AccountId),
    /// Access token expired; the refresh token is authentic and for the same subject
    Rotate {
        subject: AccountId,
        refresh_token: String,
    },
}

/// Pull `<token>` out of `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MalformedAuthorizationHeader)?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.is_empty() && !token.contains(char::is_whitespace) => Ok(token),
        _ => Err(AuthError::MalformedAuthorizationHeader),
    }
}

/// Decide what to do with a request, without side effects
pub fn assess(
    codec: &TokenCodec,
    headers: &HeaderMap,
    refresh_cookie_name: &str,
    now_ms: i64,
) -> Result<Verdict, AuthError> {
    let access_token = bearer_token(headers)?;

    let subject = match codec.verify_at(TokenKind::Access, access_token, now_ms) {
        Ok(claims) => return Ok(Verdict::Authorized(claims.subject())),
        Err(TokenError::Expired { subject }) => subject,
        Err(e) => return Err(e.into()),
    };

    let refresh_token = platform::cookie::extract_cookie(headers, refresh_cookie_name)
        .ok_or(AuthError::MissingRefreshToken)?;

    let refresh = codec
        .verify_at(TokenKind::Refresh, &refresh_token, now_ms)
        .map_err(|_| AuthError::RefreshRejected)?;

    if refresh.subject() != subject {
        tracing::warn!(
            access_subject = %subject,
            refresh_subject = %refresh.subject(),
            "Refresh token belongs to another account"
        );
        return Err(AuthError::RefreshRejected);
    }

    Ok(Verdict::Rotate {
        subject,
        refresh_token,
    })
}

/// Middleware state
pub struct AuthMiddlewareState<R>
where
    R: RefreshTokenRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> AuthMiddlewareState<R>
where
    R: RefreshTokenRepository + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }
}

impl<R> Clone for AuthMiddlewareState<R>
where
    R: RefreshTokenRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

/// Middleware that requires valid (or rotatable) credentials
///
/// Use with `axum::middleware::from_fn_with_state`.
pub async fn require_auth<R>(
    State(state): State<AuthMiddlewareState<R>>,
    mut req: Request,
    next: Next,
) -> Response
where
    R: RefreshTokenRepository + Send + Sync + 'static,
{
    let codec = state.config.token_codec();
    let now_ms = Utc::now().timestamp_millis();

    let verdict = match assess(
        &codec,
        req.headers(),
        &state.config.refresh_cookie_name,
        now_ms,
    ) {
        Ok(verdict) => verdict,
        Err(e) => return e.into_response(),
    };

    match verdict {
        Verdict::Authorized(subject) => {
            req.extensions_mut().insert(AuthenticatedAccount(subject));
            next.run(req).await
        }
        Verdict::Rotate {
            subject,
            refresh_token,
        } => {
            let use_case = UpdateTokensUseCase::new(state.repo.clone(), state.config.clone());
            let pair = match use_case.execute(subject, &refresh_token).await {
                Ok(pair) => pair,
                Err(e) => return e.into_response(),
            };

            req.extensions_mut().insert(AuthenticatedAccount(subject));
            let mut response = next.run(req).await;
            attach_rotated_credentials(response.headers_mut(), &state.config, &pair);
            response
        }
    }
}

/// New `Authorization` header, plus clear-then-set of the refresh cookie
///
/// A handler that already set the refresh cookie itself (e.g. account
/// deletion clearing it) keeps its cookie.
pub fn attach_rotated_credentials(headers: &mut HeaderMap, config: &AuthConfig, pair: &TokenPair) {
    if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", pair.access_token)) {
        headers.insert(header::AUTHORIZATION, value);
    }

    let cookie_prefix = format!("{}=", config.refresh_cookie_name);
    let handler_set_cookie = headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.starts_with(&cookie_prefix));
    if handler_set_cookie {
        return;
    }

    let cookie = config.refresh_cookie();
    for value in [
        cookie.build_delete_cookie(),
        cookie.build_set_cookie(&pair.refresh_token),
    ] {
        if let Some(value) = platform::cookie::header_value(&value) {
            headers.append(header::SET_COOKIE, value);
        }
    }
}
