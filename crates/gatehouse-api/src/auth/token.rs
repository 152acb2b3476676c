// Session token handling
// Decision: tokens are prefixed with "gs_" for identification
// Decision: the full token lives only in the browser cookie, stored hashed in DB

use rand::Rng;
use sha2::{Digest, Sha256};

/// Session token prefix for identification
pub const SESSION_TOKEN_PREFIX: &str = "gs_";
const SESSION_TOKEN_LENGTH: usize = 32; // 32 random bytes = 64 hex chars

/// Generated session token (full token leaves the server only once,
/// inside the Set-Cookie header)
#[derive(Debug)]
pub struct GeneratedSessionToken {
    /// Full token (gs_<random>)
    pub token: String,
    /// SHA-256 hash for database storage
    pub token_hash: String,
}

/// Generate a new session token
pub fn generate_session_token() -> GeneratedSessionToken {
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..SESSION_TOKEN_LENGTH).map(|_| rng.gen()).collect();
    let random_hex = hex::encode(&random_bytes);

    let token = format!("{}{}", SESSION_TOKEN_PREFIX, random_hex);
    let token_hash = hash_session_token(&token);

    GeneratedSessionToken { token, token_hash }
}

/// Hash a session token for database storage/lookup
pub fn hash_session_token(token: &str) -> String {
    let hash = Sha256::digest(token.as_bytes());
    hex::encode(hash)
}

/// Validate session token format before touching the database
pub fn is_valid_session_token_format(token: &str) -> bool {
    if !token.starts_with(SESSION_TOKEN_PREFIX) {
        return false;
    }

    let token_part = &token[SESSION_TOKEN_PREFIX.len()..];

    if token_part.len() != SESSION_TOKEN_LENGTH * 2 {
        return false;
    }

    token_part.chars().all(|c| c.is_ascii_hexdigit())
}

/// Generate a random state value for the OAuth round trip
pub fn generate_oauth_state() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 16] = rng.gen();
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_session_token() {
        let generated = generate_session_token();

        assert!(generated.token.starts_with(SESSION_TOKEN_PREFIX));
        assert!(is_valid_session_token_format(&generated.token));
        assert_eq!(generated.token_hash, hash_session_token(&generated.token));
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = generate_session_token();
        let b = generate_session_token();

        assert_ne!(a.token, b.token);
        assert_ne!(a.token_hash, b.token_hash);
    }

    #[test]
    fn test_is_valid_session_token_format() {
        let generated = generate_session_token();
        assert!(is_valid_session_token_format(&generated.token));

        // Wrong prefix
        assert!(!is_valid_session_token_format(
            "sk_1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef"
        ));

        // Too short
        assert!(!is_valid_session_token_format("gs_1234"));

        // Non-hex characters
        assert!(!is_valid_session_token_format(
            "gs_gggggggggggggggggggggggggggggggggggggggggggggggggggggggggggggggg"
        ));

        // No prefix
        assert!(!is_valid_session_token_format(
            "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef"
        ));
    }

    #[test]
    fn test_hash_consistency() {
        let token = "gs_1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef";
        assert_eq!(hash_session_token(token), hash_session_token(token));
    }

    #[test]
    fn test_oauth_state_is_random() {
        let a = generate_oauth_state();
        let b = generate_oauth_state();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }
}
