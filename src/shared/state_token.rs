use rand::Rng;

/// Generate a new OAuth state token (32 random bytes = 64 hex characters)
pub fn generate_state_token() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    hex::encode(bytes)
}

/// Compare two state tokens without short-circuiting on the first
/// differing byte. Length mismatch still returns early; the tokens we
/// issue are fixed-length.
pub fn tokens_match(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
