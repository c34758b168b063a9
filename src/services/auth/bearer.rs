//! `Authorization` header → raw token.

/// Scheme prefix. Matched case-sensitively, exactly one space.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Pull the raw token out of an `Authorization` header value.
///
/// Accepts both `Bearer <token>` and a bare `<token>`. Returns `None` when
/// nothing is left after trimming.
pub fn extract_token(header_value: &str) -> Option<&str> {
    let token = match header_value.strip_prefix(BEARER_PREFIX) {
        Some(rest) => rest.trim(),
        None => header_value.trim(),
    };

    (!token.is_empty()).then_some(token)
}
