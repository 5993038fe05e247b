use std::sync::Arc;
use std::time::Duration;

use auth::TokenIssuer;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::get_me::get_me;
use super::handlers::refresh_token::refresh_token;
use super::handlers::sign_in::sign_in;
use super::handlers::sign_up::sign_up;
use super::handlers::update_name::update_name;
use super::middleware::authenticate as auth_middleware;
use crate::account::ports::AccountServicePort;
use crate::session::ports::SessionServicePort;

#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<dyn SessionServicePort>,
    pub account_service: Arc<dyn AccountServicePort>,
    pub token_issuer: Arc<TokenIssuer>,
}

pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let public_routes = Router::new()
        .route("/api/v1/users/signup", post(sign_up))
        .route("/api/v1/users/signin", post(sign_in))
        .route("/api/v1/user/refresh-token", post(refresh_token));

    let protected_routes = Router::new()
        .route("/api/v1/users/me", get(get_me))
        .route("/api/v1/users/update-name/:user_id", put(update_name))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(trace_layer)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use auth::TokenSettings;
    use axum::body::to_bytes;
    use axum::http::header::AUTHORIZATION;
    use axum::http::header::CONTENT_TYPE;
    use axum::http::StatusCode;
    use chrono::Duration as ChronoDuration;
    use chrono::Utc;
    use serde_json::json;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::account::errors::AccountError;
    use crate::account::models::FederatedIdentity;
    use crate::account::service::AccountService;
    use crate::outbound::repositories::InMemoryAccountRepository;
    use crate::session::ports::IdentityProvider;
    use crate::session::service::SessionService;

    struct RejectingIdentityProvider;

    #[async_trait]
    impl IdentityProvider for RejectingIdentityProvider {
        async fn verify(&self, _id_token: &str) -> Result<FederatedIdentity, AccountError> {
            Err(AccountError::InvalidIdentityToken("rejected".to_string()))
        }
    }

    fn app() -> (Router, Arc<TokenIssuer>) {
        let tokens = Arc::new(
            TokenIssuer::new(TokenSettings::new(
                b"router-access-secret-0123456789abcdef".to_vec(),
                b"router-refresh-secret-0123456789abcdef".to_vec(),
            ))
            .unwrap(),
        );
        let accounts: Arc<dyn AccountServicePort> = Arc::new(AccountService::new(Arc::new(
            InMemoryAccountRepository::new(),
        )));
        let sessions = Arc::new(SessionService::new(
            accounts.clone(),
            Arc::new(RejectingIdentityProvider),
            tokens.clone(),
        ));

        let state = AppState {
            session_service: sessions,
            account_service: accounts,
            token_issuer: tokens.clone(),
        };

        (create_router(state, Duration::from_secs(5)), tokens)
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_gate_rejects_missing_token() {
        let (router, _) = app();

        let request = Request::get("/api/v1/users/me").body(Body::empty()).unwrap();
        let (status, body) = send(&router, request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], "false");
        assert_eq!(body["response"]["message"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn test_gate_rejects_expired_token() {
        let (router, tokens) = app();
        let issued = Utc::now() - ChronoDuration::minutes(16);
        let expired = tokens
            .issue_access_token_at("a@x.com", issued.timestamp(), issued)
            .unwrap();

        let request = Request::get("/api/v1/users/me")
            .header(AUTHORIZATION, format!("Bearer {}", expired))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&router, request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_gate_rejects_refresh_token() {
        let (router, tokens) = app();
        let refresh = tokens.issue_refresh_token("a@x.com").unwrap();

        let request = Request::get("/api/v1/users/me")
            .header(AUTHORIZATION, format!("Bearer {}", refresh))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&router, request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_sign_up_then_me() {
        let (router, _) = app();

        let (status, body) = send(
            &router,
            post_json(
                "/api/v1/users/signup",
                json!({ "email": "a@x.com", "password": "secret1", "fullName": "Ada" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], "true");

        let access_token = body["response"]["accessToken"].as_str().unwrap().to_string();
        let request = Request::get("/api/v1/users/me")
            .header(AUTHORIZATION, access_token)
            .body(Body::empty())
            .unwrap();
        let (status, me) = send(&router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["response"]["email"], "a@x.com");
        assert_eq!(me["response"]["fullName"], "Ada");
        assert_eq!(me["response"]["userId"], body["response"]["userId"]);
    }

    #[tokio::test]
    async fn test_sign_up_validation() {
        let (router, _) = app();

        let (status, body) = send(
            &router,
            post_json("/api/v1/users/signup", json!({ "email": "not-an-email", "password": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], "false");

        let request = Request::post("/api/v1/users/signup")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{"))
            .unwrap();
        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], "false");
    }

    #[tokio::test]
    async fn test_sign_in_empty_credentials_is_validation_error() {
        let (router, _) = app();

        let (status, body) = send(
            &router,
            post_json("/api/v1/users/signin", json!({ "email": "", "password": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], "false");

        let (status, _) = send(
            &router,
            post_json("/api/v1/users/signin", json!({ "email": "a@x.com", "password": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = send(
            &router,
            post_json(
                "/api/v1/users/signin",
                json!({ "email": "not-an-email", "password": "secret1" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["response"]["message"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_google_sign_in_requires_id_token() {
        let (router, _) = app();

        let (status, _) = send(
            &router,
            post_json("/api/v1/users/signin", json!({ "googleLogin": true })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = send(
            &router,
            post_json(
                "/api/v1/users/signin",
                json!({ "googleLogin": true, "idToken": "forged" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["response"]["message"], "Invalid identity token");
    }

    #[tokio::test]
    async fn test_refresh_without_token() {
        let (router, _) = app();

        let request = Request::post("/api/v1/user/refresh-token")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&router, request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["response"]["message"], "Invalid refresh token");
    }
}
