//! API token keys.

use uuid::Uuid;

/// Length of a token key in hex characters.
pub const TOKEN_KEY_LEN: usize = 40;

/// Generate a random 40-character lowercase hex token key.
pub fn generate_token_key() -> String {
    let mut key = Uuid::new_v4().simple().to_string();
    key.push_str(&Uuid::new_v4().simple().to_string());
    key.truncate(TOKEN_KEY_LEN);
    key
}
