//! Stream key generation.
//!
//! Keys are auto-generated for operators who do not want to invent
//! their own: a role prefix followed by a v4 UUID with the dashes
//! stripped, e.g. `live_3f2c9a...` / `play_81d0b4...`. The prefixes
//! make the role of a pasted key obvious in encoder and player
//! configuration.

use uuid::Uuid;

/// Prefix for publisher (sender-side) keys.
pub const PUBLISHER_KEY_PREFIX: &str = "live_";

/// Prefix for player (viewer-side) keys.
pub const PLAYER_KEY_PREFIX: &str = "play_";

/// Generate a fresh publisher key.
#[must_use]
pub fn generate_publisher_key() -> String {
    format!("{PUBLISHER_KEY_PREFIX}{}", Uuid::new_v4().simple())
}

/// Generate a fresh player key.
#[must_use]
pub fn generate_player_key() -> String {
    format!("{PLAYER_KEY_PREFIX}{}", Uuid::new_v4().simple())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_publisher_key_format() {
        let key = generate_publisher_key();

        assert!(key.starts_with(PUBLISHER_KEY_PREFIX));
        let suffix = key.strip_prefix(PUBLISHER_KEY_PREFIX).unwrap();
        assert_eq!(suffix.len(), 32);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_player_key_format() {
        let key = generate_player_key();

        assert!(key.starts_with(PLAYER_KEY_PREFIX));
        let suffix = key.strip_prefix(PLAYER_KEY_PREFIX).unwrap();
        assert_eq!(suffix.len(), 32);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_keys_are_unique() {
        let a = generate_publisher_key();
        let b = generate_publisher_key();
        assert_ne!(a, b);

        let c = generate_player_key();
        let d = generate_player_key();
        assert_ne!(c, d);
    }

    #[test]
    fn test_publisher_and_player_keys_differ() {
        // The role prefixes alone guarantee a generated pair can never
        // collide, which the create form relies on.
        assert_ne!(generate_publisher_key(), generate_player_key());
    }
}
