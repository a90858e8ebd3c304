use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use base64::prelude::*;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

use crate::features::auth::SessionGate;

/// Request ID generator using UUID v7 (time-ordered)
#[derive(Clone, Copy)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Custom MakeSpan that includes request_id in the tracing span
#[derive(Clone, Debug)]
pub struct MakeSpanWithRequestId;

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

pub fn cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    // If origins list contains "*", allow any origin
    if allowed_origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_methods(Any)
            .allow_headers(Any)
            .allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    // credentialed (cookie) requests cannot use wildcard methods or headers
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
        .allow_origin(AllowOrigin::list(origins))
}

pub fn basic_auth_middleware(
    valid_credentials: Arc<String>,
) -> impl Fn(
    Request,
    Next,
)
    -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, Response>> + Send>>
       + Clone {
    move |req: Request, next: Next| {
        let credentials = valid_credentials.clone();
        Box::pin(async move {
            let auth_header = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|header| header.to_str().ok());

            if let Some(auth_header) = auth_header {
                if let Some(encoded) = auth_header.strip_prefix("Basic ") {
                    if let Ok(decoded) = BASE64_STANDARD.decode(encoded) {
                        if let Ok(creds) = String::from_utf8(decoded) {
                            if creds == *credentials {
                                return Ok(next.run(req).await);
                            }
                        }
                    }
                }
            }

            Err((
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Basic realm=\"Swagger UI\"")],
                Body::from("Unauthorized"),
            )
                .into_response())
        })
    }
}

/// Session gate for protected routes.
///
/// Resolves the session cookie to a live session and hands the `SessionUser` to the
/// handler through request extensions. Without one the request is answered with a
/// `303 See Other` to the login page and no handler runs.
pub async fn require_session(
    State(gate): State<SessionGate>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let user = match gate.cookies.read(&jar) {
        Some(session_id) => gate.store.get(session_id).await,
        None => None,
    };

    match user {
        Some(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        None => {
            tracing::debug!("No live session for {}, redirecting to login", req.uri().path());
            Redirect::to(&gate.login_path).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::SessionUser;
    use crate::features::auth::{SessionCookies, SessionStore};
    use axum::{routing::get, Router};
    use axum_test::TestServer;
    use std::time::Duration;

    async fn whoami(user: SessionUser) -> String {
        user.email
    }

    fn gated_server(store: Arc<SessionStore>) -> TestServer {
        let gate = SessionGate::new(store, SessionCookies::new("sid", false), "/login");
        let app = Router::new()
            .route("/api/dashboard", get(whoami))
            .route_layer(axum::middleware::from_fn_with_state(gate, require_session));
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_missing_cookie_redirects_to_login() {
        let server = gated_server(Arc::new(SessionStore::new(Duration::from_secs(60))));

        let response = server.get("/api/dashboard").await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header(header::LOCATION), "/login");
        assert!(response.text().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_or_expired_session_redirects() {
        let store = Arc::new(SessionStore::new(Duration::ZERO));
        let expired = store.create(Uuid::now_v7(), "A", "a@example.com").await;
        let server = gated_server(Arc::clone(&store));

        let response = server
            .get("/api/dashboard")
            .add_header(header::COOKIE, format!("sid={}", expired.session_id))
            .await;
        response.assert_status(StatusCode::SEE_OTHER);

        let response = server
            .get("/api/dashboard")
            .add_header(header::COOKIE, "sid=garbage")
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_live_session_reaches_handler() {
        let store = Arc::new(SessionStore::new(Duration::from_secs(60)));
        let session = store.create(Uuid::now_v7(), "A", "a@example.com").await;
        let server = gated_server(Arc::clone(&store));

        let response = server
            .get("/api/dashboard")
            .add_header(header::COOKIE, format!("sid={}", session.session_id))
            .await;

        response.assert_status_ok();
        response.assert_text("a@example.com");
    }

    #[test]
    fn test_request_ids_are_uuids() {
        let request = axum::http::Request::new(());
        let id = MakeRequestUuid.make_request_id(&request).unwrap();
        let value = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(value).is_ok());
    }
}
