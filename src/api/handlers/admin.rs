/*
 * Responsibility
 * - 管理者向けエンドポイント (ガード通過後にだけ到達する)
 * - ガードは入力を書き換えないので、ここでは生の path / query / header を読む
 * - キーそのものはレスポンスにもログにも出さない
 */
use axum::{
    Json,
    extract::Path,
    http::{HeaderMap, Uri, header},
};
use serde::Serialize;

use crate::middleware::admin::query_key;

#[derive(Debug, Serialize)]
pub struct LoginPage {
    pub path_prefix: String,
    pub accepts: [&'static str; 2],
}

#[derive(Debug, Serialize)]
pub struct AdminHome {
    pub status: &'static str,
    pub path_prefix: String,
    pub key_source: KeySource,
}

#[derive(Debug, Serialize)]
pub struct Verified {
    pub status: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySource {
    Query,
    Authorization,
}

impl KeySource {
    // Same precedence as the guard: a non-empty ?key= wins.
    fn of(uri: &Uri) -> Self {
        match query_key(uri) {
            Some(_) => KeySource::Query,
            None => KeySource::Authorization,
        }
    }
}

/// GET /{path_prefix}/login (path guard only)
pub async fn login(Path(path_prefix): Path<String>) -> Json<LoginPage> {
    Json(LoginPage {
        path_prefix,
        accepts: ["?key=<admin key>", "Authorization: Bearer <admin key>"],
    })
}

/// GET /auth/verify (admin key guard only)
pub async fn verify() -> Json<Verified> {
    Json(Verified { status: "ok" })
}

/// GET /{path_prefix}/admin (path + admin key)
pub async fn home(
    Path(path_prefix): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Json<AdminHome> {
    let key_source = KeySource::of(&uri);
    tracing::info!(
        ?key_source,
        has_authorization = headers.contains_key(header::AUTHORIZATION),
        "admin home accessed"
    );

    Json(AdminHome {
        status: "ok",
        path_prefix,
        key_source,
    })
}
