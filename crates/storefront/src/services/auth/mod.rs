//! Authentication service.
//!
//! Registration and password login on top of [`UserRepository`]. Session
//! state (who is logged in) is handled by `middleware::auth`; this service
//! only decides whether a set of credentials identifies a user.

mod error;
pub mod password;

pub use error::AuthError;
pub use password::{hash_password, verify_password};

use sqlx::SqlitePool;

use safehub_core::Email;

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::User;

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user.
    ///
    /// The name is trimmed, the email trimmed and lowercased. The password is
    /// taken as-is but must not be empty.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` if any field is blank.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered,
    /// including when a concurrent registration wins the race to insert.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let name = name.trim();
        let Ok(email) = Email::parse(email) else {
            return Err(AuthError::MissingFields);
        };
        if name.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        // Fast path; the unique index below is what actually guarantees uniqueness.
        if self.users.get_by_email(&email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = hash_password(password)?;

        self.users
            .create(name, &email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })
    }

    /// Login with email and password.
    ///
    /// Unknown emails, blank emails and wrong passwords all produce the
    /// same error.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let Ok(email) = Email::parse(email) else {
            return Err(AuthError::InvalidCredentials);
        };

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_register_normalizes_input() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);

        let user = auth
            .register("  Ana ", " Ana@Example.com ", "pw123")
            .await
            .unwrap();
        assert_eq!(user.name, "Ana");
        assert_eq!(user.email.as_str(), "ana@example.com");
    }

    #[tokio::test]
    async fn test_register_requires_every_field() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);

        for (name, email, password) in [
            ("", "ana@example.com", "pw123"),
            ("   ", "ana@example.com", "pw123"),
            ("Ana", "", "pw123"),
            ("Ana", "ana@example.com", ""),
        ] {
            let result = auth.register(name, email, password).await;
            assert!(matches!(result, Err(AuthError::MissingFields)));
        }

        assert_eq!(UserRepository::new(&pool).count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_register_accepts_any_non_empty_email() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);

        let user = auth.register("N", " Bob ", "pw").await.unwrap();
        assert_eq!(user.email.as_str(), "bob");

        let logged_in = auth.login("BOB", "pw").await.unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn test_register_duplicate_is_case_insensitive() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);

        auth.register("Ana", "ana@example.com", "pw123")
            .await
            .unwrap();
        let result = auth.register("Bob", "ANA@example.com", "x").await;

        assert!(matches!(result, Err(AuthError::UserAlreadyExists)));
        assert_eq!(UserRepository::new(&pool).count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_registration_succeeds_once() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);

        let (first, second) = tokio::join!(
            auth.register("Ana", "ana@example.com", "pw123"),
            auth.register("Bob", "ANA@example.com", "x"),
        );

        assert_eq!(usize::from(first.is_ok()) + usize::from(second.is_ok()), 1);
        for result in [first, second] {
            if let Err(e) = result {
                assert!(matches!(e, AuthError::UserAlreadyExists));
            }
        }
        assert_eq!(UserRepository::new(&pool).count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_login_accepts_correct_password() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);

        let registered = auth
            .register("Ana", "ana@example.com", "pw123")
            .await
            .unwrap();
        let logged_in = auth.login("ANA@example.com ", "pw123").await.unwrap();
        assert_eq!(logged_in.id, registered.id);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);

        auth.register("Ana", "ana@example.com", "pw123")
            .await
            .unwrap();

        let wrong_password = auth.login("ana@example.com", "wrongpw").await;
        let unknown_email = auth.login("bob@example.com", "pw123").await;
        let blank_email = auth.login("   ", "pw123").await;

        for result in [wrong_password, unknown_email, blank_email] {
            assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        }
    }
}
