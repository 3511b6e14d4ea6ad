//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use kernel::id::AccountId;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    DeleteAccountUseCase, GetAccountUseCase, SignInInput, SignInUseCase, SignOutUseCase,
    SignUpInput, SignUpUseCase,
};
use crate::domain::repository::{AccountRepository, RefreshTokenRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AccountResponse, SignInRequest, SignInResponse, SignUpRequest, SignUpResponse,
};
use crate::presentation::middleware::AuthenticatedAccount;

/// Shared state for auth handlers
pub struct AuthAppState<R>
where
    R: AccountRepository + RefreshTokenRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> Clone for AuthAppState<R>
where
    R: AccountRepository + RefreshTokenRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/auth/sign-up
pub async fn sign_up<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<(StatusCode, Json<SignUpResponse>)>
where
    R: AccountRepository + RefreshTokenRepository + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.repo.clone(), state.config.clone());

    let id = use_case
        .execute(SignUpInput {
            user_name: req.username,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(SignUpResponse { id: id.value() })))
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /api/auth/sign-in
pub async fn sign_in<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<SignInRequest>,
) -> AuthResult<Response>
where
    R: AccountRepository + RefreshTokenRepository + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let pair = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    let cookie = state.config.refresh_cookie().build_set_cookie(&pair.refresh_token);

    Ok((
        StatusCode::OK,
        [
            (header::AUTHORIZATION, format!("Bearer {}", pair.access_token)),
            (header::SET_COOKIE, cookie),
        ],
        Json(SignInResponse {
            account_id: pair.subject.value(),
            access_token: pair.access_token.clone(),
            token_type: "Bearer".to_string(),
            expires_in: state.config.access_token_ttl_secs(),
        }),
    )
        .into_response())
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /api/auth/sign-out
///
/// Idempotent: a missing cookie or an already-removed record still
/// answers 204 and clears the cookie.
pub async fn sign_out<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    R: AccountRepository + RefreshTokenRepository + Send + Sync + 'static,
{
    let cookie = state.config.refresh_cookie();

    if let Some(token) = platform::cookie::extract_cookie(&headers, &cookie.name) {
        let use_case = SignOutUseCase::new(state.repo.clone(), state.config.clone());
        match use_case.execute(&token).await {
            Ok(()) => {}
            Err(AuthError::RefreshTokenNotFound) => {
                tracing::debug!("Sign-out for a refresh token that is already gone");
            }
            Err(e) => return Err(e),
        }
    }

    Ok((
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, cookie.build_delete_cookie())],
    ))
}

// ============================================================================
// Account (requires authentication)
// ============================================================================

fn ensure_owner(caller: AuthenticatedAccount, id: i64) -> AuthResult<AccountId> {
    let id = AccountId::new(id);
    if caller.id() != id {
        tracing::warn!(caller = %caller.id(), requested = %id, "Cross-account access refused");
        return Err(AuthError::Forbidden);
    }
    Ok(id)
}

/// GET /api/auth/accounts/{id}
pub async fn get_account<R>(
    State(state): State<AuthAppState<R>>,
    caller: AuthenticatedAccount,
    Path(id): Path<i64>,
) -> AuthResult<Json<AccountResponse>>
where
    R: AccountRepository + RefreshTokenRepository + Send + Sync + 'static,
{
    let id = ensure_owner(caller, id)?;
    let use_case = GetAccountUseCase::new(state.repo.clone(), state.config.clone());
    let account = use_case.execute(id).await?;

    Ok(Json(account.into()))
}

/// DELETE /api/auth/accounts/{id}
pub async fn delete_account<R>(
    State(state): State<AuthAppState<R>>,
    caller: AuthenticatedAccount,
    Path(id): Path<i64>,
) -> AuthResult<impl IntoResponse>
where
    R: AccountRepository + RefreshTokenRepository + Send + Sync + 'static,
{
    let id = ensure_owner(caller, id)?;
    let use_case = DeleteAccountUseCase::new(state.repo.clone(), state.config.clone());
    let removed = use_case.execute(id).await?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, state.config.refresh_cookie().build_delete_cookie())],
        Json(AccountResponse::from(removed)),
    ))
}
