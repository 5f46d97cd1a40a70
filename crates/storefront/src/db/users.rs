//! User repository for database operations.
//!
//! The `users` table enforces email uniqueness itself (unique index,
//! case-insensitive collation); callers may pre-check with
//! [`UserRepository::get_by_email`] but must still handle
//! [`RepositoryError::Conflict`] from [`UserRepository::create`].

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use safehub_core::{Email, UserId};

use super::RepositoryError;
use crate::models::user::User;

/// Raw `users` row.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<(User, String), RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        let user = User {
            id: UserId::new(self.id),
            email,
            name: self.name,
            created_at: self.created_at,
        };

        Ok((user, self.password_hash))
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the email in the database is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .get_password_hash(email)
            .await?
            .map(|(user, _hash)| user))
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the email in the database is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, email, name, password_hash, created_at
            FROM users
            WHERE id = ?
            ",
        )
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| r.into_user().map(|(user, _hash)| user))
            .transpose()
    }

    /// Get a user together with their password hash, by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, email, name, password_hash, created_at
            FROM users
            WHERE email = ?
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Create a new user with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (email, name, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, email, name, password_hash, created_at
            ",
        )
        .bind(email.as_str())
        .bind(name)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        let (user, _hash) = row.into_user()?;
        Ok(user)
    }

    /// Count registered users.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let pool = test_pool().await;
        let users = UserRepository::new(&pool);

        let created = users
            .create("Ana", &email("ana@example.com"), "hash-1")
            .await
            .unwrap();
        assert_eq!(created.name, "Ana");
        assert_eq!(created.email.as_str(), "ana@example.com");

        let by_email = users
            .get_by_email(&email("ana@example.com"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email, created);

        let by_id = users.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id, created);

        let (_, hash) = users
            .get_password_hash(&email("ana@example.com"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hash, "hash-1");
    }

    #[tokio::test]
    async fn test_lookup_missing_user() {
        let pool = test_pool().await;
        let users = UserRepository::new(&pool);

        assert!(
            users
                .get_by_email(&email("nobody@example.com"))
                .await
                .unwrap()
                .is_none()
        );
        assert!(users.get_by_id(UserId::new(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let pool = test_pool().await;
        let users = UserRepository::new(&pool);

        users
            .create("Ana", &email("ana@example.com"), "hash-1")
            .await
            .unwrap();
        let result = users
            .create("Bob", &email("ANA@example.com"), "hash-2")
            .await;

        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
        assert_eq!(users.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unique_index_ignores_case_for_raw_inserts() {
        let pool = test_pool().await;
        let users = UserRepository::new(&pool);

        users
            .create("Ana", &email("ana@example.com"), "hash-1")
            .await
            .unwrap();

        // Bypass Email normalization to exercise the store-level constraint.
        let result = sqlx::query(
            "INSERT INTO users (email, name, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind("Ana@Example.com")
        .bind("Bob")
        .bind("hash-2")
        .bind(Utc::now())
        .execute(&pool)
        .await;

        assert!(result.is_err());
        assert_eq!(users.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_ids_are_distinct() {
        let pool = test_pool().await;
        let users = UserRepository::new(&pool);

        let a = users
            .create("Ana", &email("ana@example.com"), "h")
            .await
            .unwrap();
        let b = users
            .create("Bob", &email("bob@example.com"), "h")
            .await
            .unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(users.count().await.unwrap(), 2);
    }
}
