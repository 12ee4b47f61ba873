//! User accounts and profile edits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::primitives::ValidationError;

const MAX_USERNAME_LEN: usize = 150;

/// A registered account.
///
/// The password hash never leaves the repository layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
    pub is_staff: bool,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Fields required to insert an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_staff: bool,
}

/// Partial profile update. Absent fields are left untouched.
///
/// An empty `bio` or `profile_picture` clears the field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileChanges {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
}

impl User {
    pub fn apply(&mut self, changes: ProfileChanges) -> Result<(), ValidationError> {
        if let Some(email) = changes.email {
            self.email = validate_email(&email)?;
        }
        if let Some(first_name) = changes.first_name {
            self.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = changes.last_name {
            self.last_name = last_name.trim().to_string();
        }
        if let Some(bio) = changes.bio {
            self.bio = non_empty(bio);
        }
        if let Some(picture) = changes.profile_picture {
            self.profile_picture = non_empty(picture);
        }
        Ok(())
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Usernames are 1-150 characters of letters, digits and `@.+-_`.
pub fn validate_username(value: &str) -> Result<String, ValidationError> {
    let username = value.trim();
    if username.is_empty() {
        return Err(ValidationError::Blank("username"));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(ValidationError::TooLong {
            field: "username",
            max: MAX_USERNAME_LEN,
        });
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(ValidationError::Invalid {
            field: "username",
            message: "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.".to_string(),
        });
    }
    Ok(username.to_string())
}

/// Emails are optional; a non-empty email needs a local part and a domain.
pub fn validate_email(value: &str) -> Result<String, ValidationError> {
    let email = value.trim();
    if email.is_empty() {
        return Ok(String::new());
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') && !domain.contains('@') => {
            Ok(email.to_string())
        }
        _ => Err(ValidationError::Invalid {
            field: "email",
            message: "Enter a valid email address.".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 1,
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            bio: Some("hello".to_string()),
            profile_picture: None,
            is_staff: false,
            is_active: true,
            date_joined: Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn test_apply_leaves_absent_fields() {
        let mut u = user();
        u.apply(ProfileChanges {
            first_name: Some(" Ada ".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(u.first_name, "Ada");
        assert_eq!(u.email, "ada@example.com");
        assert_eq!(u.bio.as_deref(), Some("hello"));
    }

    #[test]
    fn test_apply_empty_bio_clears() {
        let mut u = user();
        u.apply(ProfileChanges {
            bio: Some(String::new()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(u.bio, None);
    }

    #[test]
    fn test_apply_rejects_bad_email() {
        let mut u = user();
        assert!(u
            .apply(ProfileChanges {
                email: Some("not-an-email".to_string()),
                ..Default::default()
            })
            .is_err());
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email(" ada@example.com ").unwrap(), "ada@example.com");
        assert_eq!(validate_email("").unwrap(), "");
        assert!(validate_email("ada").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ada@localhost").is_err());
    }

    #[test]
    fn test_validate_username() {
        assert_eq!(validate_username(" ada.l+1 ").unwrap(), "ada.l+1");
        assert!(validate_username("").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"a".repeat(151)).is_err());
    }
}
