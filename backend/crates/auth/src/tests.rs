//! Crate-level tests for the auth flows
//! In-memory repositories, real Argon2 (cheap parameters), real token codec.

#[cfg(test)]
mod support {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::{DateTime, Utc};
    use kernel::id::AccountId;
    use platform::password::PasswordHashParams;

    use crate::application::config::AuthConfig;
    use crate::domain::entity::{Account, NewAccount, RefreshRecord};
    use crate::domain::repository::{AccountRepository, RefreshTokenRepository};
    use crate::domain::value_object::Email;
    use crate::error::{AuthError, AuthResult};
    use crate::infra::InMemoryAuthRepository;

    pub const FAST_HASH: PasswordHashParams = PasswordHashParams {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    };

    pub fn config() -> AuthConfig {
        AuthConfig {
            password_hash: FAST_HASH,
            ..AuthConfig::development()
        }
    }

    /// Every access token is born expired, so every protected call rotates
    pub fn expiring_config() -> AuthConfig {
        AuthConfig {
            access_token_ttl: Duration::ZERO,
            ..config()
        }
    }

    pub fn repo() -> Arc<InMemoryAuthRepository> {
        Arc::new(InMemoryAuthRepository::new())
    }

    /// In-memory repository whose sign-in side effects can be made to fail
    #[derive(Clone, Default)]
    pub struct FlakyRepository {
        pub inner: InMemoryAuthRepository,
        pub fail_last_login: bool,
        pub fail_upsert: bool,
    }

    impl AccountRepository for FlakyRepository {
        async fn create(&self, account: &NewAccount) -> AuthResult<AccountId> {
            self.inner.create(account).await
        }

        async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
            self.inner.find_by_email(email).await
        }

        async fn find_by_id(&self, id: AccountId) -> AuthResult<Option<Account>> {
            self.inner.find_by_id(id).await
        }

        async fn update_last_login(&self, id: AccountId, at: DateTime<Utc>) -> AuthResult<()> {
            if self.fail_last_login {
                return Err(AuthError::Internal("last login write failed".to_string()));
            }
            self.inner.update_last_login(id, at).await
        }

        async fn delete(&self, id: AccountId) -> AuthResult<Option<Account>> {
            self.inner.delete(id).await
        }
    }

    impl RefreshTokenRepository for FlakyRepository {
        async fn upsert(&self, record: &RefreshRecord) -> AuthResult<()> {
            if self.fail_upsert {
                return Err(AuthError::Internal("refresh write failed".to_string()));
            }
            self.inner.upsert(record).await
        }

        async fn replace(&self, current_digest: &str, next: &RefreshRecord) -> AuthResult<bool> {
            self.inner.replace(current_digest, next).await
        }

        async fn remove(&self, token_digest: &str) -> AuthResult<bool> {
            self.inner.remove(token_digest).await
        }
    }
}

#[cfg(test)]
mod use_case_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use kernel::id::AccountId;

    use super::support::*;
    use crate::application::*;
    use crate::domain::entity::refresh_token::digest;
    use crate::domain::repository::AccountRepository;
    use crate::domain::token::{TokenKind, TokenPair};
    use crate::domain::value_object::Email;
    use crate::error::{AuthError, AuthResult};
    use crate::infra::InMemoryAuthRepository;

    fn sign_up_input() -> SignUpInput {
        SignUpInput {
            user_name: "testUser2023".to_string(),
            email: "test-user@gmail.com".to_string(),
            password: "qweRty2023".to_string(),
        }
    }

    async fn signed_up(repo: &Arc<InMemoryAuthRepository>, config: &Arc<AuthConfig>) -> AccountId {
        SignUpUseCase::new(repo.clone(), config.clone())
            .execute(sign_up_input())
            .await
            .unwrap()
    }

    fn sign_in(
        repo: &Arc<InMemoryAuthRepository>,
        config: &Arc<AuthConfig>,
    ) -> SignInUseCase<InMemoryAuthRepository, InMemoryAuthRepository> {
        SignInUseCase::new(repo.clone(), repo.clone(), config.clone())
    }

    fn credentials(password: &str) -> SignInInput {
        SignInInput {
            email: "test-user@gmail.com".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in_yields_pair_for_new_id() {
        let repo = repo();
        let config = Arc::new(config());

        let id = signed_up(&repo, &config).await;
        let pair = sign_in(&repo, &config)
            .execute(credentials("qweRty2023"))
            .await
            .unwrap();

        let codec = config.token_codec();
        assert_eq!(pair.subject, id);
        assert_eq!(
            codec.verify(TokenKind::Access, &pair.access_token).unwrap().subject(),
            id
        );
        assert_eq!(
            codec.verify(TokenKind::Refresh, &pair.refresh_token).unwrap().subject(),
            id
        );

        let record = repo.refresh_record(id).await.unwrap();
        assert_eq!(record.token_digest, digest(&pair.refresh_token));
    }

    #[tokio::test]
    async fn test_sign_up_normalizes_email() {
        let repo = repo();
        let config = Arc::new(config());
        let id = SignUpUseCase::new(repo.clone(), config.clone())
            .execute(SignUpInput {
                email: "  Test-User@GMAIL.com ".to_string(),
                ..sign_up_input()
            })
            .await
            .unwrap();

        let stored = repo
            .find_by_email(&Email::new("test-user@gmail.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.created_at, stored.last_login_at);
    }

    #[tokio::test]
    async fn test_empty_sign_up_fails_on_username_before_persistence() {
        let repo = repo();
        let config = Arc::new(config());

        let err = SignUpUseCase::new(repo.clone(), config.clone())
            .execute(SignUpInput {
                user_name: String::new(),
                email: String::new(),
                password: String::new(),
            })
            .await
            .unwrap_err();

        match err {
            AuthError::Validation(inner) => assert!(inner.message().starts_with("username")),
            other => panic!("expected validation error, got {other:?}"),
        }

        // Nothing was created: the first real account still gets id 1
        assert_eq!(signed_up(&repo, &config).await, AccountId::new(1));
    }

    #[tokio::test]
    async fn test_sign_up_rejects_weak_password_and_duplicate_email() {
        let repo = repo();
        let config = Arc::new(config());

        let weak = SignUpUseCase::new(repo.clone(), config.clone())
            .execute(SignUpInput {
                password: "qwerty2023".to_string(),
                ..sign_up_input()
            })
            .await;
        assert!(matches!(weak, Err(AuthError::Validation(_))));

        signed_up(&repo, &config).await;
        let duplicate = SignUpUseCase::new(repo.clone(), config.clone())
            .execute(SignUpInput {
                user_name: "another_user".to_string(),
                ..sign_up_input()
            })
            .await;
        assert!(matches!(duplicate, Err(AuthError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_wrong_password_leaves_refresh_record_untouched() {
        let repo = repo();
        let config = Arc::new(config());
        let id = signed_up(&repo, &config).await;

        sign_in(&repo, &config)
            .execute(credentials("qweRty2023"))
            .await
            .unwrap();
        let before = repo.refresh_record(id).await;

        let result = sign_in(&repo, &config)
            .execute(credentials("qweRty2024"))
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        assert_eq!(repo.refresh_record(id).await, before);
    }

    async fn flaky_sign_in(flaky: FlakyRepository) -> (FlakyRepository, AuthResult<TokenPair>) {
        let config = Arc::new(config());
        SignUpUseCase::new(Arc::new(flaky.clone()), config.clone())
            .execute(sign_up_input())
            .await
            .unwrap();

        let repo = Arc::new(flaky.clone());
        let result = SignInUseCase::new(repo.clone(), repo, config)
            .execute(credentials("qweRty2023"))
            .await;
        (flaky, result)
    }

    #[tokio::test]
    async fn test_sign_in_fails_when_last_login_write_fails() {
        let (flaky, result) = flaky_sign_in(FlakyRepository {
            fail_last_login: true,
            ..Default::default()
        })
        .await;

        assert!(matches!(result, Err(AuthError::Internal(_))));
        let account = flaky
            .inner
            .find_by_email(&Email::from_db("test-user@gmail.com"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.last_login_at, account.created_at);
    }

    #[tokio::test]
    async fn test_sign_in_fails_when_refresh_write_fails() {
        let (flaky, result) = flaky_sign_in(FlakyRepository {
            fail_upsert: true,
            ..Default::default()
        })
        .await;

        assert!(matches!(result, Err(AuthError::Internal(_))));
        assert_eq!(flaky.inner.refresh_record(AccountId::new(1)).await, None);
    }

    #[tokio::test]
    async fn test_unknown_email_is_not_found() {
        let repo = repo();
        let config = Arc::new(config());

        let result = sign_in(&repo, &config)
            .execute(credentials("qweRty2023"))
            .await;
        assert!(matches!(result, Err(AuthError::AccountNotFound)));
    }

    #[tokio::test]
    async fn test_rotation_replaces_stored_token_once() {
        let repo = repo();
        let config = Arc::new(config());
        let id = signed_up(&repo, &config).await;
        let first = sign_in(&repo, &config)
            .execute(credentials("qweRty2023"))
            .await
            .unwrap();

        // Distinct issue instant, hence distinct tokens
        tokio::time::sleep(Duration::from_millis(5)).await;

        let update = UpdateTokensUseCase::new(repo.clone(), config.clone());
        let second = update.execute(id, &first.refresh_token).await.unwrap();
        assert_ne!(second.refresh_token, first.refresh_token);
        assert_eq!(
            repo.refresh_record(id).await.unwrap().token_digest,
            digest(&second.refresh_token)
        );

        // The superseded token cannot rotate again
        let replay = update.execute(id, &first.refresh_token).await;
        assert!(matches!(replay, Err(AuthError::RefreshRejected)));
    }

    #[tokio::test]
    async fn test_sign_out_blocks_rotation_and_reports_missing_record() {
        let repo = repo();
        let config = Arc::new(config());
        let id = signed_up(&repo, &config).await;
        let pair = sign_in(&repo, &config)
            .execute(credentials("qweRty2023"))
            .await
            .unwrap();

        let sign_out = SignOutUseCase::new(repo.clone(), config.clone());
        sign_out.execute(&pair.refresh_token).await.unwrap();
        assert_eq!(repo.refresh_record(id).await, None);

        assert!(matches!(
            sign_out.execute(&pair.refresh_token).await,
            Err(AuthError::RefreshTokenNotFound)
        ));

        let rotation = UpdateTokensUseCase::new(repo.clone(), config.clone())
            .execute(id, &pair.refresh_token)
            .await;
        assert!(matches!(rotation, Err(AuthError::RefreshRejected)));
    }

    #[tokio::test]
    async fn test_get_and_delete_account() {
        let repo = repo();
        let config = Arc::new(config());
        let id = signed_up(&repo, &config).await;
        sign_in(&repo, &config)
            .execute(credentials("qweRty2023"))
            .await
            .unwrap();

        let account = GetAccountUseCase::new(repo.clone(), config.clone())
            .execute(id)
            .await
            .unwrap();
        assert_eq!(account.user_name.as_str(), "testUser2023");

        let removed = DeleteAccountUseCase::new(repo.clone(), config.clone())
            .execute(id)
            .await
            .unwrap();
        assert_eq!(removed.id, id);
        assert_eq!(repo.refresh_record(id).await, None);

        assert!(matches!(
            GetAccountUseCase::new(repo.clone(), config.clone())
                .execute(id)
                .await,
            Err(AuthError::AccountNotFound)
        ));
        assert!(matches!(
            DeleteAccountUseCase::new(repo.clone(), config.clone())
                .execute(id)
                .await,
            Err(AuthError::AccountNotFound)
        ));
    }
}

#[cfg(test)]
mod http_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use axum::routing::get;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::support::*;
    use crate::application::config::AuthConfig;
    use crate::error::REFRESH_REJECTED_MESSAGE;
    use crate::presentation::middleware::AuthenticatedAccount;
    use crate::presentation::router::auth_router_generic;

    fn app(config: AuthConfig) -> Router {
        Router::new().nest("/api/auth", auth_router_generic(repo(), Arc::new(config)))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn cookie_pair(response: &Response) -> Option<String> {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .find(|pair| pair.starts_with("refreshToken=") && pair.len() > "refreshToken=".len())
            .map(str::to_string)
    }

    struct Session {
        id: i64,
        authorization: String,
        cookie: String,
    }

    async fn sign_up_and_in(app: &Router, username: &str, email: &str) -> Session {
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/auth/sign-up",
                json!({"username": username, "email": email, "password": "qweRty2023"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let id = json_body(response).await["id"].as_i64().unwrap();

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/auth/sign-in",
                json!({"email": email, "password": "qweRty2023"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let authorization = response.headers()[header::AUTHORIZATION]
            .to_str()
            .unwrap()
            .to_string();
        let cookie = cookie_pair(&response).unwrap();
        let body = json_body(response).await;
        assert_eq!(body["accountId"], id);
        assert_eq!(body["tokenType"], "Bearer");
        assert_eq!(format!("Bearer {}", body["accessToken"].as_str().unwrap()), authorization);

        Session {
            id,
            authorization,
            cookie,
        }
    }

    fn get_account(id: i64, authorization: Option<&str>, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::get(format!("/api/auth/accounts/{id}"));
        if let Some(authorization) = authorization {
            builder = builder.header(header::AUTHORIZATION, authorization);
        }
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_sign_up_returns_created_id() {
        let app = app(config());
        let response = app
            .oneshot(post_json(
                "/api/auth/sign-up",
                json!({"username": "testUser2023", "email": "test-user@gmail.com", "password": "qweRty2023"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(json_body(response).await, json!({"id": 1}));
    }

    #[tokio::test]
    async fn test_empty_sign_up_is_problem_json() {
        let app = app(config());
        let response = app
            .oneshot(post_json(
                "/api/auth/sign-up",
                json!({"username": "", "email": "", "password": ""}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["status"], 400);
        assert!(body["detail"].as_str().unwrap().starts_with("username must"));
    }

    #[tokio::test]
    async fn test_sign_in_cookie_attributes() {
        let app = app(config());
        app.clone()
            .oneshot(post_json(
                "/api/auth/sign-up",
                json!({"username": "testUser2023", "email": "test-user@gmail.com", "password": "qweRty2023"}),
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(post_json(
                "/api/auth/sign-in",
                json!({"email": "test-user@gmail.com", "password": "qweRty2023"}),
            ))
            .await
            .unwrap();

        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("Path=/api"));
        assert!(set_cookie.contains("Max-Age=2592000"));
        assert!(set_cookie.contains("SameSite=Lax"));
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized_without_tokens() {
        let app = app(config());
        sign_up_and_in(&app, "testUser2023", "test-user@gmail.com").await;

        let response = app
            .oneshot(post_json(
                "/api/auth/sign-in",
                json!({"email": "test-user@gmail.com", "password": "Wrong12345"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(!response.headers().contains_key(header::AUTHORIZATION));
        assert!(!response.headers().contains_key(header::SET_COOKIE));
    }

    #[tokio::test]
    async fn test_owner_can_read_account() {
        let app = app(config());
        let session = sign_up_and_in(&app, "testUser2023", "test-user@gmail.com").await;

        let response = app
            .oneshot(get_account(session.id, Some(&session.authorization), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!response.headers().contains_key(header::SET_COOKIE));

        let body = json_body(response).await;
        assert_eq!(body["id"], session.id);
        assert_eq!(body["username"], "testUser2023");
        assert_eq!(body["email"], "test-user@gmail.com");
        assert!(body.get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn test_other_account_is_forbidden() {
        let app = app(config());
        let alice = sign_up_and_in(&app, "alice_2023", "alice@example.com").await;
        let bob = sign_up_and_in(&app, "bob_20230", "bob@example.com").await;

        let response = app
            .oneshot(get_account(bob.id, Some(&alice.authorization), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_missing_or_malformed_header_is_unauthorized() {
        let app = app(config());
        let session = sign_up_and_in(&app, "testUser2023", "test-user@gmail.com").await;

        for authorization in [None, Some("Token abc"), Some("Bearer not.valid")] {
            let response = app
                .clone()
                .oneshot(get_account(session.id, authorization, Some(&session.cookie)))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{authorization:?}");
        }
    }

    #[tokio::test]
    async fn test_expired_access_token_rotates() {
        let app = app(expiring_config());
        let session = sign_up_and_in(&app, "testUser2023", "test-user@gmail.com").await;
        tokio::time::sleep(Duration::from_millis(5)).await;

        let response = app
            .clone()
            .oneshot(get_account(
                session.id,
                Some(&session.authorization),
                Some(&session.cookie),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let new_authorization = response.headers()[header::AUTHORIZATION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(new_authorization.starts_with("Bearer "));
        let cookies: Vec<_> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(cookies.len(), 2);
        assert!(cookies[0].contains("Max-Age=0"));
        let new_cookie = cookie_pair(&response).unwrap();
        assert_ne!(new_cookie, session.cookie);

        // The old refresh token has been superseded
        let replay = app
            .clone()
            .oneshot(get_account(
                session.id,
                Some(&session.authorization),
                Some(&session.cookie),
            ))
            .await
            .unwrap();
        assert_eq!(replay.status(), StatusCode::BAD_REQUEST);

        // The new one works
        let next = app
            .oneshot(get_account(session.id, Some(&new_authorization), Some(&new_cookie)))
            .await
            .unwrap();
        assert_eq!(next.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_expired_access_without_cookie_is_bad_request() {
        let app = app(expiring_config());
        let session = sign_up_and_in(&app, "testUser2023", "test-user@gmail.com").await;

        let response = app
            .oneshot(get_account(session.id, Some(&session.authorization), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_refresh_of_other_account_is_rejected() {
        let app = app(expiring_config());
        let alice = sign_up_and_in(&app, "alice_2023", "alice@example.com").await;
        let bob = sign_up_and_in(&app, "bob_20230", "bob@example.com").await;

        let response = app
            .oneshot(get_account(alice.id, Some(&alice.authorization), Some(&bob.cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["detail"], REFRESH_REJECTED_MESSAGE);
    }

    #[tokio::test]
    async fn test_sign_out_is_idempotent_and_ends_rotation() {
        let app = app(expiring_config());
        let session = sign_up_and_in(&app, "testUser2023", "test-user@gmail.com").await;

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(
                    Request::post("/api/auth/sign-out")
                        .header(header::COOKIE, &session.cookie)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NO_CONTENT);
            let cleared = response.headers()[header::SET_COOKIE].to_str().unwrap();
            assert!(cleared.starts_with("refreshToken=;"));
            assert!(cleared.contains("Max-Age=0"));
        }

        let no_cookie = app
            .clone()
            .oneshot(Request::post("/api/auth/sign-out").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(no_cookie.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(get_account(
                session.id,
                Some(&session.authorization),
                Some(&session.cookie),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["detail"], REFRESH_REJECTED_MESSAGE);
    }

    #[tokio::test]
    async fn test_delete_account() {
        let app = app(config());
        let session = sign_up_and_in(&app, "testUser2023", "test-user@gmail.com").await;

        let response = app
            .clone()
            .oneshot(
                Request::delete(format!("/api/auth/accounts/{}", session.id))
                    .header(header::AUTHORIZATION, &session.authorization)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers()[header::SET_COOKIE]
                .to_str()
                .unwrap()
                .contains("Max-Age=0")
        );
        assert_eq!(json_body(response).await["id"], session.id);

        let response = app
            .oneshot(get_account(session.id, Some(&session.authorization), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_identity_without_middleware_is_internal_error() {
        async fn whoami(account: AuthenticatedAccount) -> String {
            account.id().to_string()
        }
        let app: Router = Router::new().route("/whoami", get(whoami));

        let response = app
            .oneshot(Request::get("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await["detail"],
            kernel::error::conversions::GENERIC_SERVER_DETAIL
        );
    }
}
