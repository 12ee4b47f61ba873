//! Object-level permissions: owners and staff may write, everyone else may only read.

use crate::domain::User;
use crate::error::AppError;

/// Whether `user` may modify an object owned by `owner_id`.
pub fn can_modify(owner_id: Option<i64>, user: &User) -> bool {
    user.is_staff || owner_id == Some(user.id)
}

pub fn ensure_can_modify(owner_id: Option<i64>, user: &User) -> Result<(), AppError> {
    if can_modify(owner_id, user) {
        Ok(())
    } else {
        Err(AppError::permission_denied())
    }
}

pub fn ensure_staff(user: &User) -> Result<(), AppError> {
    if user.is_staff {
        Ok(())
    } else {
        Err(AppError::permission_denied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(id: i64, is_staff: bool) -> User {
        User {
            id,
            username: format!("user{}", id),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            bio: None,
            profile_picture: None,
            is_staff,
            is_active: true,
            date_joined: Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn test_owner_can_modify() {
        assert!(can_modify(Some(1), &user(1, false)));
        assert!(!can_modify(Some(2), &user(1, false)));
    }

    #[test]
    fn test_orphaned_objects_are_staff_only() {
        assert!(!can_modify(None, &user(1, false)));
        assert!(can_modify(None, &user(1, true)));
    }

    #[test]
    fn test_ensure_staff() {
        assert!(ensure_staff(&user(1, true)).is_ok());
        assert!(matches!(
            ensure_staff(&user(1, false)),
            Err(AppError::Forbidden(_))
        ));
    }
}
