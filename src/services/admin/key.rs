/*
 * Responsibility
 * - 管理者キーの候補を 2 つの入力 (?key= と Authorization) から 1 つに決める
 * - HTTP / axum には依存しない (純粋関数)
 */

/// Authorization ヘッダ値の先頭にあれば取り除く scheme
pub const BEARER_PREFIX: &str = "Bearer ";

/// Pick the candidate admin key from the explicit query value and the raw
/// `Authorization` header value.
///
/// - A non-empty `key` always wins, whatever the header says.
/// - Otherwise a non-empty header is used, minus a leading `"Bearer "`.
///   `"Bearer "` alone yields `Some("")`, which is not the same as `None`.
/// - Otherwise there is no candidate.
pub fn extract_admin_key<'a>(
    key: Option<&'a str>,
    authorization: Option<&'a str>,
) -> Option<&'a str> {
    if let Some(key) = key.filter(|k| !k.is_empty()) {
        return Some(key);
    }

    let authorization = authorization.filter(|a| !a.is_empty())?;

    Some(
        authorization
            .strip_prefix(BEARER_PREFIX)
            .unwrap_or(authorization),
    )
}
