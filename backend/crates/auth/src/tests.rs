//! Unit and flow tests for the auth crate
//!
//! Pure units (codec, policies, value objects) are tested next to their
//! modules; this file covers configuration, DTO wire shapes, error
//! mapping, and the full login/refresh/logout lifecycle against the
//! in-memory store.

#[cfg(test)]
mod config_tests {
    use crate::application::config::*;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();

        assert_eq!(config.access_ttl, Duration::from_secs(15 * 60));
        assert_eq!(config.refresh_ttl, Duration::from_secs(7 * 24 * 3600));
        assert_eq!(config.lockout_threshold, 3);
        assert_eq!(config.lockout_duration, Duration::from_secs(30 * 60));
        assert!(!config.rotate_refresh_on_use);
        assert!(config.password_pepper.is_none());
    }

    #[test]
    fn test_refresh_ttl_exceeds_access_ttl() {
        let config = AuthConfig::default();
        assert!(config.refresh_ttl > config.access_ttl);
    }

    #[test]
    fn test_with_random_secrets() {
        let config1 = AuthConfig::with_random_secrets();
        let config2 = AuthConfig::with_random_secrets();

        assert_ne!(config1.access_secret, config2.access_secret);
        assert_ne!(config1.refresh_secret, config2.refresh_secret);
        // The two token classes never share a key
        assert_ne!(config1.access_secret, config1.refresh_secret);
        assert!(config1.access_secret.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_lockout_policy_from_config() {
        let config = AuthConfig {
            lockout_threshold: 5,
            lockout_duration: Duration::from_secs(600),
            ..AuthConfig::default()
        };

        let policy = config.lockout_policy();
        assert_eq!(policy.threshold, 5);
        assert_eq!(policy.duration, chrono::Duration::seconds(600));
    }
}

#[cfg(test)]
mod dto_tests {
    use crate::presentation::dto::*;

    #[test]
    fn test_login_response_serialization() {
        let response = LoginResponse {
            access_token: "aaa.bbb.ccc".to_string(),
            refresh_token: "ddd.eee.fff".to_string(),
            user: UserSummaryDto {
                id: "00000000-0000-0000-0000-000000000000".to_string(),
                email: "user@example.com".to_string(),
                role: "user".to_string(),
            },
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("accessToken"));
        assert!(json.contains("refreshToken"));
        assert!(json.contains(r#""role":"user""#));
        // The summary never carries a password hash
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_register_request_deserialization() {
        let json = r#"{"email":"user@example.com","password":"SecurePass123!"}"#;
        let request: RegisterRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.email, "user@example.com");
        assert_eq!(request.password, "SecurePass123!");
    }

    #[test]
    fn test_refresh_request_deserialization() {
        let json = r#"{"refreshToken":"aaa.bbb.ccc"}"#;
        let request: RefreshRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.refresh_token, "aaa.bbb.ccc");
    }

    #[test]
    fn test_refresh_response_omits_absent_rotation() {
        let response = RefreshResponse {
            access_token: "aaa.bbb.ccc".to_string(),
            refresh_token: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("refreshToken"));

        let response = RefreshResponse {
            access_token: "aaa.bbb.ccc".to_string(),
            refresh_token: Some("new.refresh.token".to_string()),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("refreshToken"));
    }
}

#[cfg(test)]
mod error_tests {
    use crate::error::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_error_into_response_status_codes() {
        let test_cases: Vec<(AuthError, StatusCode)> = vec![
            (
                AuthError::Validation(vec!["bad email".into()]),
                StatusCode::BAD_REQUEST,
            ),
            (AuthError::AlreadyExists, StatusCode::BAD_REQUEST),
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::AccountLocked, StatusCode::LOCKED),
            (AuthError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AuthError::Forbidden, StatusCode::FORBIDDEN),
            (AuthError::NotFound, StatusCode::NOT_FOUND),
            (AuthError::InvalidReference, StatusCode::BAD_REQUEST),
            (
                AuthError::Internal("test".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(
                response.status(),
                expected_status,
                "Error should return correct status code"
            );
        }
    }

    #[test]
    fn test_validation_error_carries_all_reasons() {
        let error = AuthError::Validation(vec![
            "Password must contain at least one uppercase letter".into(),
            "Password must contain at least one number".into(),
        ]);
        let message = error.to_string();
        assert!(message.contains("uppercase"));
        assert!(message.contains("number"));
    }

    #[test]
    fn test_error_display() {
        assert!(AuthError::InvalidCredentials.to_string().contains("Invalid"));
        assert!(AuthError::AccountLocked.to_string().contains("locked"));
        assert!(!AuthError::InvalidCredentials.to_string().contains("email not found"));
    }
}

#[cfg(test)]
mod flow_tests {
    use std::sync::Arc;
    use std::time::Duration as StdDuration;

    use chrono::Utc;

    use crate::application::config::AuthConfig;
    use crate::application::{
        LoginInput, LoginUseCase, LogoutUseCase, RefreshUseCase, RegisterInput, RegisterUseCase,
    };
    use crate::domain::repository::{AccountRepository, TokenBlacklist};
    use crate::domain::token::TokenCodec;
    use crate::domain::value_object::{email::Email, role::Role, token_id::TokenId};
    use crate::error::AuthError;
    use crate::infra::memory::InMemoryAuthStore;
    use crate::presentation::middleware::{Identity, authorize};

    const EMAIL: &str = "user@example.com";
    const PASSWORD: &str = "SecurePass123!";

    struct Harness {
        store: Arc<InMemoryAuthStore>,
        config: Arc<AuthConfig>,
        codec: Arc<TokenCodec>,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_config(AuthConfig::with_random_secrets())
        }

        fn with_config(config: AuthConfig) -> Self {
            let codec = Arc::new(config.token_codec());
            Self {
                store: Arc::new(InMemoryAuthStore::new()),
                config: Arc::new(config),
                codec,
            }
        }

        async fn register(&self, email: &str, password: &str) -> Result<String, AuthError> {
            RegisterUseCase::new(self.store.clone(), self.config.clone())
                .execute(RegisterInput {
                    email: email.to_string(),
                    password: password.to_string(),
                })
                .await
                .map(|out| out.account_id)
        }

        async fn login(
            &self,
            email: &str,
            password: &str,
        ) -> Result<crate::application::LoginOutput, AuthError> {
            LoginUseCase::new(self.store.clone(), self.codec.clone(), self.config.clone())
                .execute(LoginInput {
                    email: email.to_string(),
                    password: password.to_string(),
                })
                .await
        }

        async fn refresh(
            &self,
            token: &str,
        ) -> Result<crate::application::RefreshOutput, AuthError> {
            RefreshUseCase::new(self.store.clone(), self.codec.clone(), self.config.clone())
                .execute(token)
                .await
        }

        async fn logout(&self, token: &str) -> Result<(), AuthError> {
            LogoutUseCase::new(self.store.clone(), self.codec.clone())
                .execute(token)
                .await
        }
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_register_stores_hash_not_plaintext() {
        let h = Harness::new();
        h.register(EMAIL, PASSWORD).await.unwrap();

        let email = Email::new(EMAIL).unwrap();
        let account = h.store.find_by_email(&email).await.unwrap().unwrap();

        assert_ne!(account.password_hash.as_phc_string(), PASSWORD);
        assert!(account.password_hash.as_phc_string().starts_with("$argon2id$"));
        assert_eq!(account.role, Role::User);
        assert_eq!(account.failed_login_attempts, 0);
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email_and_keeps_record() {
        let h = Harness::new();
        h.register(EMAIL, PASSWORD).await.unwrap();

        let err = h.register(EMAIL, "OtherPass456?").await.unwrap_err();
        assert!(matches!(err, AuthError::AlreadyExists));

        // Case variants are the same address
        let err = h.register("User@Example.COM", PASSWORD).await.unwrap_err();
        assert!(matches!(err, AuthError::AlreadyExists));

        // The original record is untouched: the first password still works
        assert!(h.login(EMAIL, PASSWORD).await.is_ok());
    }

    #[tokio::test]
    async fn test_register_reports_every_password_violation() {
        let h = Harness::new();
        let err = h.register(EMAIL, "weak").await.unwrap_err();

        match err {
            AuthError::Validation(reasons) => {
                assert!(reasons.len() >= 3);
                assert!(reasons.iter().any(|r| r.contains("at least 8")));
                assert!(reasons.iter().any(|r| r.contains("uppercase")));
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_register_rejects_injection_probe_email() {
        let h = Harness::new();
        let err = h.register("x';--@example.com", PASSWORD).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    // ------------------------------------------------------------------
    // Login and lockout
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_login_returns_token_pair_and_summary() {
        let h = Harness::new();
        let account_id = h.register(EMAIL, PASSWORD).await.unwrap();

        let out = h.login(EMAIL, PASSWORD).await.unwrap();

        assert_eq!(out.user.account_id, account_id);
        assert_eq!(out.user.email, EMAIL);
        assert_eq!(out.user.role, Role::User);

        // Both tokens verify under their own codecs, and the refresh
        // token outlives the access token
        let access = h.codec.verify_access(&out.access_token).unwrap();
        let refresh = h.codec.verify_refresh(&out.refresh_token).unwrap();
        assert_eq!(access.sub.to_string(), account_id);
        assert_eq!(refresh.sub.to_string(), account_id);
        assert!(refresh.exp > access.exp);
    }

    #[tokio::test]
    async fn test_unknown_email_reads_like_wrong_password() {
        let h = Harness::new();
        h.register(EMAIL, PASSWORD).await.unwrap();

        let unknown = h.login("nobody@example.com", PASSWORD).await.unwrap_err();
        let wrong = h.login(EMAIL, "WrongPass123!").await.unwrap_err();

        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_three_failures_lock_the_account() {
        let h = Harness::new();
        h.register(EMAIL, PASSWORD).await.unwrap();

        for _ in 0..3 {
            let err = h.login(EMAIL, "WrongPass123!").await.unwrap_err();
            // The third failure still reads as InvalidCredentials; the
            // lock only surfaces on the next attempt
            assert!(matches!(err, AuthError::InvalidCredentials));
        }

        let email = Email::new(EMAIL).unwrap();
        let account = h.store.find_by_email(&email).await.unwrap().unwrap();
        assert_eq!(account.failed_login_attempts, 3);
        let lock_until = account.lock_until.expect("account must be locked");
        assert!(lock_until > Utc::now());

        // Fourth attempt with the CORRECT password is rejected as locked
        // and does not increment the counter
        let err = h.login(EMAIL, PASSWORD).await.unwrap_err();
        assert!(matches!(err, AuthError::AccountLocked));

        let account = h.store.find_by_email(&email).await.unwrap().unwrap();
        assert_eq!(account.failed_login_attempts, 3);
    }

    #[tokio::test]
    async fn test_login_after_lock_expiry_succeeds_and_resets() {
        // Zero-length lockout: the lock is set but expires immediately
        let config = AuthConfig {
            lockout_duration: StdDuration::from_secs(0),
            ..AuthConfig::with_random_secrets()
        };
        let h = Harness::with_config(config);
        h.register(EMAIL, PASSWORD).await.unwrap();

        for _ in 0..3 {
            let _ = h.login(EMAIL, "WrongPass123!").await;
        }

        let email = Email::new(EMAIL).unwrap();
        let account = h.store.find_by_email(&email).await.unwrap().unwrap();
        assert!(account.lock_until.is_some());

        // Lock window has elapsed; correct password works and resets state
        h.login(EMAIL, PASSWORD).await.unwrap();

        let account = h.store.find_by_email(&email).await.unwrap().unwrap();
        assert_eq!(account.failed_login_attempts, 0);
        assert!(account.lock_until.is_none());
    }

    #[tokio::test]
    async fn test_success_resets_counter_below_threshold() {
        let h = Harness::new();
        h.register(EMAIL, PASSWORD).await.unwrap();

        let _ = h.login(EMAIL, "WrongPass123!").await;
        let _ = h.login(EMAIL, "WrongPass123!").await;
        h.login(EMAIL, PASSWORD).await.unwrap();

        let email = Email::new(EMAIL).unwrap();
        let account = h.store.find_by_email(&email).await.unwrap().unwrap();
        assert_eq!(account.failed_login_attempts, 0);

        // The counter starts from zero again: two more failures do not lock
        let _ = h.login(EMAIL, "WrongPass123!").await;
        let _ = h.login(EMAIL, "WrongPass123!").await;
        let account = h.store.find_by_email(&email).await.unwrap().unwrap();
        assert!(account.lock_until.is_none());
    }

    // ------------------------------------------------------------------
    // Refresh
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_refresh_mints_new_access_token() {
        let h = Harness::new();
        let account_id = h.register(EMAIL, PASSWORD).await.unwrap();
        let login = h.login(EMAIL, PASSWORD).await.unwrap();

        let out = h.refresh(&login.refresh_token).await.unwrap();

        let claims = h.codec.verify_access(&out.access_token).unwrap();
        assert_eq!(claims.sub.to_string(), account_id);
        // Default policy: no rotation
        assert!(out.refresh_token.is_none());

        // The same refresh token keeps working
        assert!(h.refresh(&login.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_refresh_rejects_never_issued_token() {
        let h = Harness::new();
        let account_id = h.register(EMAIL, PASSWORD).await.unwrap();
        h.login(EMAIL, PASSWORD).await.unwrap();

        // Signed with the right key for the right account, but its
        // token id was never recorded in the live set
        let email = Email::new(EMAIL).unwrap();
        let account = h.store.find_by_email(&email).await.unwrap().unwrap();
        let forged = h
            .codec
            .issue_refresh(&account.account_id, &TokenId::new())
            .unwrap();
        assert_eq!(
            h.codec.verify_refresh(&forged).unwrap().sub.to_string(),
            account_id
        );

        let err = h.refresh(&forged).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn test_refresh_rejects_garbage_token() {
        let h = Harness::new();
        let err = h.refresh("not.a.token").await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let h = Harness::new();
        h.register(EMAIL, PASSWORD).await.unwrap();
        let login = h.login(EMAIL, PASSWORD).await.unwrap();

        // An access token must not pass as a refresh token
        let err = h.refresh(&login.access_token).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn test_rotate_on_use_retires_old_token() {
        let config = AuthConfig {
            rotate_refresh_on_use: true,
            ..AuthConfig::with_random_secrets()
        };
        let h = Harness::with_config(config);
        h.register(EMAIL, PASSWORD).await.unwrap();
        let login = h.login(EMAIL, PASSWORD).await.unwrap();

        let out = h.refresh(&login.refresh_token).await.unwrap();
        let rotated = out.refresh_token.expect("rotation must return a new token");

        // Old token is revoked and blacklisted; the new one works
        assert!(h.store.contains(&login.refresh_token).await.unwrap());
        let err = h.refresh(&login.refresh_token).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
        assert!(h.refresh(&rotated).await.is_ok());
    }

    // ------------------------------------------------------------------
    // Logout
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_logout_revokes_and_blacklists() {
        let h = Harness::new();
        h.register(EMAIL, PASSWORD).await.unwrap();
        let login = h.login(EMAIL, PASSWORD).await.unwrap();

        h.logout(&login.refresh_token).await.unwrap();

        assert!(h.store.contains(&login.refresh_token).await.unwrap());

        // Signature and expiry still verify, but the coordinator must
        // reject the revoked token
        assert!(h.codec.verify_refresh(&login.refresh_token).is_some());
        let err = h.refresh(&login.refresh_token).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let h = Harness::new();
        h.register(EMAIL, PASSWORD).await.unwrap();
        let login = h.login(EMAIL, PASSWORD).await.unwrap();

        h.logout(&login.refresh_token).await.unwrap();
        // Second call: token already out of the live set, still success
        h.logout(&login.refresh_token).await.unwrap();

        assert!(h.store.contains(&login.refresh_token).await.unwrap());
    }

    #[tokio::test]
    async fn test_logout_only_revokes_one_device() {
        let h = Harness::new();
        h.register(EMAIL, PASSWORD).await.unwrap();

        // Two concurrent sessions (e.g. two devices)
        let first = h.login(EMAIL, PASSWORD).await.unwrap();
        let second = h.login(EMAIL, PASSWORD).await.unwrap();
        assert_ne!(first.refresh_token, second.refresh_token);

        h.logout(&first.refresh_token).await.unwrap();

        assert!(h.refresh(&first.refresh_token).await.is_err());
        assert!(h.refresh(&second.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_blacklist_purge_is_idempotent() {
        let h = Harness::new();
        h.register(EMAIL, PASSWORD).await.unwrap();
        let login = h.login(EMAIL, PASSWORD).await.unwrap();
        h.logout(&login.refresh_token).await.unwrap();

        // Entries younger than the refresh TTL survive the purge
        let cutoff = Utc::now() - chrono::Duration::days(8);
        assert_eq!(h.store.purge_expired(cutoff).await.unwrap(), 0);
        assert!(h.store.contains(&login.refresh_token).await.unwrap());

        // A cutoff in the future drops them; running again removes nothing
        let cutoff = Utc::now() + chrono::Duration::seconds(1);
        assert_eq!(h.store.purge_expired(cutoff).await.unwrap(), 1);
        assert_eq!(h.store.purge_expired(cutoff).await.unwrap(), 0);
    }

    // ------------------------------------------------------------------
    // Authorization gate over issued tokens
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_require_auth_middleware_gates_requests() {
        use axum::body::Body;
        use axum::http::{Request, StatusCode, header};
        use axum::middleware as axum_middleware;
        use axum::routing::get;
        use axum::{Extension, Router};
        use tower::ServiceExt;

        use crate::presentation::middleware::{AuthGateState, require_auth};

        let h = Harness::new();
        h.register(EMAIL, PASSWORD).await.unwrap();
        let login = h.login(EMAIL, PASSWORD).await.unwrap();

        let gate = AuthGateState {
            codec: h.codec.clone(),
        };
        let app = Router::new()
            .route(
                "/protected",
                get(|Extension(identity): Extension<Identity>| async move {
                    identity.account_id.to_string()
                }),
            )
            .layer(axum_middleware::from_fn(move |req, next| {
                require_auth(gate.clone(), req, next)
            }));

        // No header
        let response = app
            .clone()
            .oneshot(Request::get("/protected").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // Malformed scheme
        let response = app
            .clone()
            .oneshot(
                Request::get("/protected")
                    .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // Valid access token is admitted
        let response = app
            .oneshot(
                Request::get("/protected")
                    .header(
                        header::AUTHORIZATION,
                        format!("Bearer {}", login.access_token),
                    )
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_require_role_middleware_forbids_wrong_role() {
        use axum::body::Body;
        use axum::http::{Request, StatusCode, header};
        use axum::middleware as axum_middleware;
        use axum::routing::get;
        use axum::Router;
        use tower::ServiceExt;

        use crate::presentation::middleware::{RoleGateState, require_role};

        let h = Harness::new();
        h.register(EMAIL, PASSWORD).await.unwrap();
        let login = h.login(EMAIL, PASSWORD).await.unwrap();

        let gate = RoleGateState {
            codec: h.codec.clone(),
            allowed_roles: Arc::from([Role::Admin]),
        };
        let app = Router::new()
            .route("/admin", get(|| async { "ok" }))
            .layer(axum_middleware::from_fn(move |req, next| {
                require_role(gate.clone(), req, next)
            }));

        // A user-role token is authenticated but not authorized
        let response = app
            .clone()
            .oneshot(
                Request::get("/admin")
                    .header(
                        header::AUTHORIZATION,
                        format!("Bearer {}", login.access_token),
                    )
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // No token at all is Unauthorized, not Forbidden
        let response = app
            .oneshot(Request::get("/admin").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_issued_token_authorizes_by_role_set() {
        let h = Harness::new();
        h.register(EMAIL, PASSWORD).await.unwrap();
        let login = h.login(EMAIL, PASSWORD).await.unwrap();

        let claims = h.codec.verify_access(&login.access_token).unwrap();
        let identity = Identity {
            account_id: claims.account_id(),
            role: claims.role,
        };

        assert!(authorize(Some(&identity), &[Role::User]).is_ok());
        assert!(matches!(
            authorize(Some(&identity), &[Role::Admin]).unwrap_err(),
            AuthError::Forbidden
        ));
        assert!(matches!(
            authorize(None, &[Role::Admin]).unwrap_err(),
            AuthError::Unauthorized
        ));
    }
}
