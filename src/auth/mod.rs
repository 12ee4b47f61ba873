//! Token authentication.
//!
//! This module provides:
//! - Salted, iterated password hashing
//! - Opaque API token generation
//! - Request extractors resolving the `Authorization` header to a user
//! - Ownership/staff permission checks
//! - Bootstrap of the configured staff account

pub mod admin;
pub mod extractor;
pub mod password;
pub mod permissions;
pub mod token;

pub use admin::ensure_admin;
pub use extractor::{AuthUser, MaybeAuthUser};
pub use password::{
    hash_password, hash_password_blocking, verify_password, verify_password_blocking, PasswordError,
};
pub use permissions::{can_modify, ensure_can_modify, ensure_staff};
pub use token::generate_token_key;
