/*
 * Responsibility
 * - `Authorization` header の field-value を `scheme value` に分解する
 * - scheme の大文字小文字は区別しない/する、の判断は呼び出し側 (extractor) の責務
 */
use axum::http::HeaderValue;

/// `Authorization: <scheme> <value>` split into its two parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeader {
    pub scheme: String,
    pub value: String,
}

/// The header value contained bytes that are not visible ASCII, so it cannot
/// be treated as text at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("authorization header is not a text value")]
pub struct NonTextHeader;

/// Parse a textual header value.
///
/// The scheme is the first run of non-whitespace characters, followed by at
/// least one whitespace character (space, tab, CR or LF), followed by the
/// value. Returns `None` when there is no such split.
pub fn parse(header: &str) -> Option<AuthHeader> {
    let (scheme, rest) = next_token(header)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let (value, _) = next_token(rest)?;

    Some(AuthHeader {
        scheme: scheme.to_string(),
        value: value.to_string(),
    })
}

/// Parse a raw header value.
///
/// - `Err(NonTextHeader)`: the value is not text
/// - `Ok(None)`: text, but malformed
/// - `Ok(Some(_))`: `scheme` and `value` found
pub fn parse_value(value: &HeaderValue) -> Result<Option<AuthHeader>, NonTextHeader> {
    let text = value.to_str().map_err(|_| NonTextHeader)?;
    Ok(parse(text))
}

// Skip leading whitespace and return the next non-empty token plus the remainder.
fn next_token(input: &str) -> Option<(&str, &str)> {
    let trimmed = input.trim_start();
    let end = trimmed
        .find(char::is_whitespace)
        .unwrap_or(trimmed.len());
    if end == 0 {
        return None;
    }
    Some(trimmed.split_at(end))
}
