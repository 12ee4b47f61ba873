//! Startup bootstrap of the configured staff account.

use tracing::info;

use crate::auth::hash_password_blocking;
use crate::config::AdminAccount;
use crate::db::Repository;
use crate::domain::{validate_email, validate_username, NewUser, User};
use crate::error::AppError;

/// Make sure `admin` exists and is staff.
///
/// An existing account is promoted; its password is left as is.
pub async fn ensure_admin(
    repo: &Repository,
    admin: &AdminAccount,
    iterations: u32,
) -> Result<User, AppError> {
    let username = validate_username(&admin.username)?;

    if let Some((mut user, _)) = repo.get_credentials(&username).await? {
        if !user.is_staff {
            repo.set_staff(user.id, true).await?;
            user.is_staff = true;
            info!(user_id = user.id, "promoted existing account to staff");
        }
        return Ok(user);
    }

    let email = validate_email(&admin.email)?;
    let password_hash = hash_password_blocking(admin.password.clone(), iterations).await?;
    let user = repo
        .create_user(&NewUser {
            username,
            email,
            password_hash,
            is_staff: true,
        })
        .await?;
    info!(user_id = user.id, username = %user.username, "created staff account");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;
    use crate::db::repo::test_support::{temp_repo, user};

    fn admin(username: &str) -> AdminAccount {
        AdminAccount {
            username: username.to_string(),
            password: "letmein".to_string(),
            email: "curator@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_creates_staff_account() {
        let (repo, _temp) = temp_repo().await;
        let created = ensure_admin(&repo, &admin("curator"), 2).await.unwrap();
        assert!(created.is_staff);

        let (_, hash) = repo.get_credentials("curator").await.unwrap().unwrap();
        assert_eq!(verify_password("letmein", &hash), Ok(true));
    }

    #[tokio::test]
    async fn test_promotes_existing_account_once() {
        let (repo, _temp) = temp_repo().await;
        let existing = user(&repo, "curator").await;

        let promoted = ensure_admin(&repo, &admin("curator"), 2).await.unwrap();
        assert_eq!(promoted.id, existing.id);
        assert!(promoted.is_staff);

        let again = ensure_admin(&repo, &admin("curator"), 2).await.unwrap();
        assert_eq!(again.id, existing.id);
        assert!(repo.get_user(existing.id).await.unwrap().unwrap().is_staff);
    }
}
