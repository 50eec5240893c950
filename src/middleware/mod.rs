/*
 * Responsibility
 * - middleware の公開インターフェース
 * - admin: 管理者ガード (path prefix / admin key / 両方)
 * - http: request id, access log, body limit, timeout
 */
pub mod admin;
pub mod http;
