/*
 * Responsibility
 * - URL 構造を定義
 * - どのルートにどの管理者ガードを掛けるかをここで決める
 *   (ガードは route_layer なので、ルートごとに小さな Router を作って merge する)
 */
use axum::{Router, routing::get};

use crate::middleware::admin::{require_admin_key, require_path_and_admin, require_path_prefix};
use crate::state::AppState;

use crate::api::handlers::{
    admin::{home, login, verify},
    health::health,
};

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/health", get(health));

    let login = require_path_prefix(
        Router::new().route("/{path_prefix}/login", get(login)),
        state.clone(),
    );

    let verify = require_admin_key(
        Router::new().route("/auth/verify", get(verify)),
        state.clone(),
    );

    let admin = require_path_and_admin(
        Router::new().route("/{path_prefix}/admin", get(home)),
        state,
    );

    public.merge(login).merge(verify).merge(admin)
}
