/*
 * Responsibility
 * - Router / middleware に紐づける共有コンテキスト (AppState)
 *   - admin: 管理者ガードの期待値 (起動時に注入、以後不変)
 * - Clone 前提で持つ (内部は Arc で cheap)
 */
use crate::config::Config;
use crate::services::admin::AdminGuard;

#[derive(Clone, Debug)]
pub struct AppState {
    pub admin: AdminGuard,
}

impl AppState {
    pub fn new(admin: AdminGuard) -> Self {
        Self { admin }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(AdminGuard::new(
            config.admin_key.clone(),
            config.admin_path_prefix.clone(),
        ))
    }
}
