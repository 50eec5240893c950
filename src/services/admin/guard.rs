/*
 * Responsibility
 * - 起動時に決まる期待値 (管理者キー / パスプレフィックス) を保持する
 * - 判定ロジック本体。失敗はすべて AppError::NotFound に潰す
 *   (401/403 を返すと管理画面の存在がばれるため)
 * - axum には依存しない。middleware から呼ばれる
 */
use std::fmt;
use std::sync::Arc;

use crate::error::AppError;

use super::key::extract_admin_key;

/// Expected values for the admin guards. Immutable once built.
#[derive(Clone)]
pub struct AdminGuard {
    admin_key: Arc<str>,
    path_prefix: Arc<str>,
}

impl AdminGuard {
    pub fn new(admin_key: impl Into<String>, path_prefix: impl Into<String>) -> Self {
        Self {
            admin_key: Arc::from(admin_key.into()),
            path_prefix: Arc::from(path_prefix.into()),
        }
    }

    /// Exact, case-sensitive match of the routed path segment.
    /// A route that carries no segment at all is rejected too.
    pub fn check_path_prefix(&self, segment: Option<&str>) -> Result<(), AppError> {
        match segment {
            Some(segment) if segment == &*self.path_prefix => Ok(()),
            Some(_) => {
                tracing::debug!("admin guard: path_prefix mismatch");
                Err(AppError::NotFound)
            }
            None => {
                tracing::debug!("admin guard: route has no path_prefix parameter");
                Err(AppError::NotFound)
            }
        }
    }

    /// Compare the candidate derived from `key` / `authorization` with the
    /// configured admin key.
    pub fn check_admin_key(
        &self,
        key: Option<&str>,
        authorization: Option<&str>,
    ) -> Result<(), AppError> {
        match extract_admin_key(key, authorization) {
            Some(candidate) if candidate == &*self.admin_key => Ok(()),
            Some(_) => {
                tracing::debug!("admin guard: admin key mismatch");
                Err(AppError::NotFound)
            }
            None => {
                tracing::debug!("admin guard: admin key missing");
                Err(AppError::NotFound)
            }
        }
    }

    /// Path first, then key. Both fail the same way.
    pub fn check_path_and_admin(
        &self,
        segment: Option<&str>,
        key: Option<&str>,
        authorization: Option<&str>,
    ) -> Result<(), AppError> {
        self.check_path_prefix(segment)?;
        self.check_admin_key(key, authorization)
    }
}

impl fmt::Debug for AdminGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminGuard")
            .field("admin_key", &"<redacted>")
            .field("path_prefix", &self.path_prefix)
            .finish()
    }
}
