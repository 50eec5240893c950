//! Admin access gating for route groups.
//!
//! Three guards, each installed on a `Router<AppState>` with `route_layer`
//! so that path parameters are already parsed when the guard runs:
//!
//! - [`require_path_prefix`]: the `{path_prefix}` segment must equal the configured prefix.
//! - [`require_admin_key`]: `?key=` or `Authorization` must carry the configured admin key.
//! - [`require_path_and_admin`]: path first, then key.
//!
//! Every rejection is `AppError::NotFound`, rendered exactly like the router
//! fallback. The request is forwarded untouched on success, so handlers see
//! the raw query string and header.
//!
//! ```ignore
//! let admin = Router::new().route("/{path_prefix}/admin", get(home));
//! let admin = middleware::admin::require_path_and_admin(admin, state.clone());
//! app = app.merge(admin);
//! ```

use axum::{
    Router,
    extract::{RawPathParams, Request, State, rejection::RawPathParamsRejection},
    http::{HeaderMap, Uri, header},
    middleware::{self, Next},
    response::Response,
};
use url::form_urlencoded;

use crate::error::AppError;
use crate::state::AppState;

/// Name of the route parameter holding the admin path segment.
pub const PATH_PREFIX_PARAM: &str = "path_prefix";

/// Name of the query parameter carrying the explicit admin key.
pub const ADMIN_KEY_PARAM: &str = "key";

type PathParams = Result<RawPathParams, RawPathParamsRejection>;

pub fn require_path_prefix(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state, path_prefix_middleware))
}

pub fn require_admin_key(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state, admin_key_middleware))
}

/// One layer doing both checks in a fixed order, rather than two stacked
/// layers whose order depends on how they were added.
pub fn require_path_and_admin(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(
        state,
        path_and_admin_middleware,
    ))
}

async fn path_prefix_middleware(
    State(state): State<AppState>,
    params: PathParams,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    state
        .admin
        .check_path_prefix(path_segment(&params))
        .inspect_err(|_| log_rejection(req.uri()))?;

    Ok(next.run(req).await)
}

async fn admin_key_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = query_key(req.uri());
    let authorization = authorization_header(req.headers());

    state
        .admin
        .check_admin_key(key.as_deref(), authorization)
        .inspect_err(|_| log_rejection(req.uri()))?;

    Ok(next.run(req).await)
}

async fn path_and_admin_middleware(
    State(state): State<AppState>,
    params: PathParams,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = query_key(req.uri());
    let authorization = authorization_header(req.headers());

    state
        .admin
        .check_path_and_admin(path_segment(&params), key.as_deref(), authorization)
        .inspect_err(|_| log_rejection(req.uri()))?;

    Ok(next.run(req).await)
}

fn path_segment(params: &PathParams) -> Option<&str> {
    params
        .as_ref()
        .ok()?
        .iter()
        .find(|(name, _)| *name == PATH_PREFIX_PARAM)
        .map(|(_, value)| value)
}

/// Explicit admin key from the query string: the last non-empty `key`
/// value. Repeated or oddly encoded parameters never make it disappear, so
/// a present key always shadows the `Authorization` header.
pub fn query_key(uri: &Uri) -> Option<String> {
    form_urlencoded::parse(uri.query()?.as_bytes())
        .filter(|(name, value)| name == ADMIN_KEY_PARAM && !value.is_empty())
        .last()
        .map(|(_, value)| value.into_owned())
}

// Non-visible-ASCII header values count as "no header".
fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

fn log_rejection(uri: &Uri) {
    tracing::debug!(path = %uri.path(), "admin request rejected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json,
        body::{Body, to_bytes},
        http::{HeaderValue, StatusCode},
        routing::get,
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::error::not_found;
    use crate::services::admin::AdminGuard;

    /// Echoes the raw inputs so tests can see what reached the handler.
    async fn echo(req: Request) -> Json<Value> {
        Json(json!({
            "path": req.uri().path(),
            "query": req.uri().query(),
            "authorization": authorization_header(req.headers()),
        }))
    }

    fn app() -> Router {
        let state = AppState::new(AdminGuard::new("s3cr3t", "adm"));

        let path_only = require_path_prefix(
            Router::new().route("/{path_prefix}/page", get(echo)),
            state.clone(),
        );
        let key_only = require_admin_key(Router::new().route("/verify", get(echo)), state.clone());
        let both = require_path_and_admin(
            Router::new().route("/{path_prefix}/echo", get(echo)),
            state.clone(),
        );
        let no_param = require_path_prefix(
            Router::new().route("/static/page", get(echo)),
            state.clone(),
        );

        Router::new()
            .merge(path_only)
            .merge(key_only)
            .merge(both)
            .merge(no_param)
            .fallback(not_found)
            .with_state(state)
    }

    async fn send(uri: &str, authorization: Option<&str>) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let res = app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn send_json(uri: &str, authorization: Option<&str>) -> (StatusCode, Value) {
        let (status, bytes) = send(uri, authorization).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn path_guard_passes_matching_segment() {
        let (status, body) = send_json("/adm/page", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["path"], "/adm/page");
    }

    #[tokio::test]
    async fn path_guard_rejects_other_segments() {
        for uri in ["/ADM/page", "/ad/page", "/admin/page", "/public/page"] {
            let (status, _) = send(uri, Some("Bearer s3cr3t")).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn path_guard_rejects_route_without_param() {
        let (status, _) = send("/static/page", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn key_guard_accepts_query_bearer_and_bare_header() {
        assert_eq!(send("/verify?key=s3cr3t", None).await.0, StatusCode::OK);
        assert_eq!(send("/verify", Some("Bearer s3cr3t")).await.0, StatusCode::OK);
        assert_eq!(send("/verify", Some("s3cr3t")).await.0, StatusCode::OK);
        assert_eq!(
            send("/verify?key=", Some("Bearer s3cr3t")).await.0,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn key_guard_rejects_missing_empty_and_wrong() {
        for (uri, authorization) in [
            ("/verify", None),
            ("/verify?key=", None),
            ("/verify", Some("Bearer ")),
            ("/verify", Some("Bearer wrong")),
            ("/verify?key=wrong", Some("Bearer s3cr3t")),
            ("/verify?key=S3CR3T", None),
        ] {
            let (status, _) = send(uri, authorization).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri} {authorization:?}");
        }
    }

    #[tokio::test]
    async fn repeated_query_keys_still_shadow_the_header() {
        for uri in [
            "/verify?key=wrong&key=alsowrong",
            "/verify?key=wrong&key=",
            "/verify?key=&key=wrong",
        ] {
            let (status, _) = send(uri, Some("Bearer s3cr3t")).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        }

        assert_eq!(
            send("/verify?key=wrong&key=s3cr3t", None).await.0,
            StatusCode::OK
        );
        assert_eq!(
            send("/verify?key=s3cr3t&key=", Some("Bearer wrong")).await.0,
            StatusCode::OK
        );
        assert_eq!(
            send("/verify?key=&key=", Some("Bearer s3cr3t")).await.0,
            StatusCode::OK
        );
    }

    #[test]
    fn query_key_reads_last_non_empty_value() {
        let key = |uri: &str| query_key(&uri.parse::<Uri>().unwrap());

        assert_eq!(key("/v"), None);
        assert_eq!(key("/v?page=2"), None);
        assert_eq!(key("/v?key="), None);
        assert_eq!(key("/v?key=a&key=b").as_deref(), Some("b"));
        assert_eq!(key("/v?key=a&key=").as_deref(), Some("a"));
        assert_eq!(key("/v?key=s3%63r3t").as_deref(), Some("s3cr3t"));
        assert_eq!(key("/v?key=a+b").as_deref(), Some("a b"));
    }

    #[tokio::test]
    async fn non_ascii_header_is_treated_as_absent() {
        let value = HeaderValue::from_bytes(b"Bearer s3cr3t\xff").unwrap();

        let req = Request::builder()
            .uri("/verify")
            .header(header::AUTHORIZATION, value.clone())
            .body(Body::empty())
            .unwrap();
        let res = app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let req = Request::builder()
            .uri("/verify?key=s3cr3t")
            .header(header::AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap();
        let res = app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn combined_guard_scenarios() {
        assert_eq!(send("/adm/echo", Some("Bearer s3cr3t")).await.0, StatusCode::OK);
        assert_eq!(send("/adm/echo", Some("s3cr3t")).await.0, StatusCode::OK);
        assert_eq!(
            send("/public/echo", Some("Bearer s3cr3t")).await.0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            send("/public/echo?key=s3cr3t", None).await.0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            send("/adm/echo", Some("Bearer wrong")).await.0,
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn combined_guard_forwards_original_inputs() {
        let (status, body) = send_json("/adm/echo?key=s3cr3t&page=2", Some("Bearer other")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["path"], "/adm/echo");
        assert_eq!(body["query"], "key=s3cr3t&page=2");
        assert_eq!(body["authorization"], "Bearer other");

        let (status, body) = send_json("/adm/echo", Some("Bearer s3cr3t")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["query"], Value::Null);
        assert_eq!(body["authorization"], "Bearer s3cr3t");
    }

    #[tokio::test]
    async fn rejections_look_like_unknown_routes() {
        let unknown = send("/does/not/exist", None).await;
        let wrong_path = send("/public/echo", Some("Bearer s3cr3t")).await;
        let wrong_key = send("/adm/echo", Some("Bearer wrong")).await;
        let key_only = send("/verify", None).await;

        assert_eq!(unknown.0, StatusCode::NOT_FOUND);
        assert_eq!(wrong_path, unknown);
        assert_eq!(wrong_key, unknown);
        assert_eq!(key_only, unknown);
    }
}
