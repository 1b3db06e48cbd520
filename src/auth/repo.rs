use crate::auth::repo_types::User;
use sqlx::SqlitePool;

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &SqlitePool, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password, gpa
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    /// Find a user by username.
    pub async fn find_by_username(db: &SqlitePool, username: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password, gpa
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &SqlitePool, id: i64) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password, gpa
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Create a new user with hashed password. The stored gpa starts at 0.
    pub async fn create(
        db: &SqlitePool,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password)
            VALUES (?, ?, ?)
            RETURNING id, username, email, password, gpa
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }

    /// Stored gpa, or `None` when the user does not exist.
    pub async fn cached_gpa(db: &SqlitePool, id: i64) -> sqlx::Result<Option<f64>> {
        let row: Option<(f64,)> = sqlx::query_as(r#"SELECT gpa FROM users WHERE id = ?"#)
            .bind(id)
            .fetch_optional(db)
            .await?;
        Ok(row.map(|(gpa,)| gpa))
    }

    pub async fn save_gpa(db: &SqlitePool, id: i64, gpa: f64) -> sqlx::Result<()> {
        sqlx::query(r#"UPDATE users SET gpa = ? WHERE id = ?"#)
            .bind(gpa)
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}
