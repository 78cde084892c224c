//! Bearer token extraction from the raw `Authorization` header.

use crate::error::{AuthError, AuthResult};

const BEARER_PREFIX: &str = "bearer ";

/// Returns the token that follows a case-insensitive `bearer ` prefix.
///
/// The token itself is not inspected; an empty or garbled value is left for
/// signature verification to reject.
pub fn bearer_token(header: Option<&str>) -> AuthResult<&str> {
    let header = match header {
        Some(h) if !h.is_empty() => h,
        _ => return Err(AuthError::MissingHeader),
    };

    match header.get(..BEARER_PREFIX.len()) {
        Some(scheme) if scheme.eq_ignore_ascii_case(BEARER_PREFIX) => {
            Ok(&header[BEARER_PREFIX.len()..])
        }
        _ => Err(AuthError::MalformedHeader),
    }
}
