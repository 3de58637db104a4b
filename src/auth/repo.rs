use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::User;

const USER_COLUMNS: &str = "id, email, username, password_hash, is_private, created_at";

/// Emails are stored trimmed and lowercased at registration, so the email
/// side of the login predicate must lowercase the identifier too or a
/// mixed-case email could never log back in. Usernames stay exact.
fn login_lookup_sql() -> String {
    format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users
        WHERE email = lower($1) OR username = $1
        LIMIT 1
        "#,
    )
}

impl User {
    /// Login lookup: one predicate matching email OR username, so
    /// unknown-identifier and wrong-password take the same path out.
    pub async fn find_by_email_or_username(
        db: &PgPool,
        identifier: &str,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&login_lookup_sql())
            .bind(identifier)
            .fetch_optional(db)
            .await
    }

    pub async fn find_by_username(db: &PgPool, username: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE username = $1
            "#,
        ))
        .bind(username)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Registration pre-check; the unique constraints on email and username
    /// remain the authority under concurrency.
    pub async fn identity_taken(db: &PgPool, email: &str, username: &str) -> sqlx::Result<bool> {
        let existing = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id
            FROM users
            WHERE email = $1 OR username = $2
            LIMIT 1
            "#,
        )
        .bind(email)
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(existing.is_some())
    }

    /// Create a new user with hashed password.
    pub async fn create(
        db: &PgPool,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(email)
        .bind(username)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_lookup_normalizes_email_but_not_username() {
        let sql = login_lookup_sql();
        assert!(sql.contains("email = lower($1)"));
        assert!(sql.contains("username = $1"));
        assert!(!sql.contains("username = lower"));
    }
}
