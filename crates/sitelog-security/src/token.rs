use sitelog_core::{SitelogError, SitelogResult};

/// Number of random bytes in a token.
pub const TOKEN_BYTES: usize = 32;

/// Generate an opaque CSRF-style token: 32 bytes from the OS random source,
/// rendered as 64 lowercase hex characters.
///
/// Fails if the OS random source is unavailable; there is no fallback.
pub fn generate_secure_token() -> SitelogResult<String> {
    let mut bytes = [0u8; TOKEN_BYTES];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| SitelogError::Security(format!("OS random source unavailable: {e}")))?;
    Ok(hex::encode(bytes))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = generate_secure_token().unwrap();
        assert_eq!(token.len(), 64);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_tokens_differ() {
        let a = generate_secure_token().unwrap();
        let b = generate_secure_token().unwrap();
        assert_ne!(a, b);
    }
}
