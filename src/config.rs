/*
 * Responsibility
 * - 環境変数の読み込み (ADMIN_KEY, ADMIN_PATH_PREFIX, PORT など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - ADMIN_KEY は Debug 出力に出さない
 */
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REQUEST_BODY_LIMIT: usize = 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

pub struct Config {
    pub addr: SocketAddr,

    pub admin_key: String,
    pub admin_path_prefix: String,

    pub request_timeout: Duration,
    pub request_body_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key/value source. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(v) => v.parse::<u16>().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => DEFAULT_PORT,
        };
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let admin_key = lookup("ADMIN_KEY").ok_or(ConfigError::Missing("ADMIN_KEY"))?;
        if admin_key.is_empty() {
            return Err(ConfigError::Invalid("ADMIN_KEY"));
        }

        let admin_path_prefix = lookup("ADMIN_PATH_PREFIX")
            .ok_or(ConfigError::Missing("ADMIN_PATH_PREFIX"))?;
        // a single path segment: the router can never match "" or "a/b"
        if admin_path_prefix.is_empty() || admin_path_prefix.contains('/') {
            return Err(ConfigError::Invalid("ADMIN_PATH_PREFIX"));
        }

        let request_timeout = lookup("REQUEST_TIMEOUT_SECS")
            .map(|v| v.parse::<u64>())
            .transpose()
            .map_err(|_| ConfigError::Invalid("REQUEST_TIMEOUT_SECS"))?
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));

        let request_body_limit = lookup("REQUEST_BODY_LIMIT")
            .map(|v| v.parse::<usize>())
            .transpose()
            .map_err(|_| ConfigError::Invalid("REQUEST_BODY_LIMIT"))?
            .unwrap_or(DEFAULT_REQUEST_BODY_LIMIT);

        Ok(Self {
            addr,
            admin_key,
            admin_path_prefix,
            request_timeout,
            request_body_limit,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("admin_key", &"<redacted>")
            .field("admin_path_prefix", &self.admin_path_prefix)
            .field("request_timeout", &self.request_timeout)
            .field("request_body_limit", &self.request_body_limit)
            .finish()
    }
}
