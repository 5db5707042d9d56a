//! Random admin token generation.

use base64::Engine as _;

/// Random bytes per token; encodes to 43 URL-safe characters.
const TOKEN_LENGTH_BYTES: usize = 32;

/// Generates a cryptographically secure random API token.
///
/// Uses `getrandom` for entropy and encodes the result as URL-safe base64
/// without padding.
///
/// # Panics
///
/// Panics if the system random number generator fails.
pub fn generate_token() -> String {
    let mut buffer = [0u8; TOKEN_LENGTH_BYTES];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer)
}
