//! UUID utilities

use uuid::Uuid;

/// Generate a new UUIDv4
pub fn generate() -> Uuid {
    Uuid::new_v4()
}

/// Generate a random storage key (hyphenated UUIDv4 string)
///
/// Keys are never derived from user-supplied file names, so two authors
/// uploading `cover.png` never collide.
pub fn generate_key() -> String {
    Uuid::new_v4().to_string()
}

/// Parse UUID from string
pub fn parse(s: &str) -> Result<Uuid, uuid::Error> {
    Uuid::parse_str(s)
}
