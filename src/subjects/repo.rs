use sqlx::SqlitePool;

use super::repo_types::Subject;

/// All subjects of one user, in storage order.
pub async fn list_by_user(db: &SqlitePool, user_id: i64) -> sqlx::Result<Vec<Subject>> {
    sqlx::query_as::<_, Subject>(
        r#"
        SELECT id, user_id, subject_name, credit, grade
        FROM subjects
        WHERE user_id = ?
        ORDER BY id
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn insert(
    db: &SqlitePool,
    user_id: i64,
    subject_name: &str,
    credit: f64,
    grade: &str,
) -> sqlx::Result<Subject> {
    sqlx::query_as::<_, Subject>(
        r#"
        INSERT INTO subjects (user_id, subject_name, credit, grade)
        VALUES (?, ?, ?, ?)
        RETURNING id, user_id, subject_name, credit, grade
        "#,
    )
    .bind(user_id)
    .bind(subject_name)
    .bind(credit)
    .bind(grade)
    .fetch_one(db)
    .await
}

/// Delete scoped by owner. Returns the number of rows removed (0 or 1).
pub async fn delete_owned(db: &SqlitePool, user_id: i64, subject_id: i64) -> sqlx::Result<u64> {
    let res = sqlx::query(r#"DELETE FROM subjects WHERE id = ? AND user_id = ?"#)
        .bind(subject_id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::User, db};

    async fn seed_user(db: &SqlitePool, name: &str) -> i64 {
        User::create(db, name, &format!("{}@example.com", name), "hash")
            .await
            .expect("seed user")
            .id
    }

    #[tokio::test]
    async fn list_returns_only_the_owners_rows_in_insert_order() {
        let pool = db::in_memory().await;
        let ada = seed_user(&pool, "ada").await;
        let grace = seed_user(&pool, "grace").await;

        insert(&pool, ada, "Calculus", 4.0, "A").await.unwrap();
        insert(&pool, grace, "Compilers", 3.0, "B").await.unwrap();
        insert(&pool, ada, "Physics", 3.0, "B+").await.unwrap();

        let names: Vec<String> = list_by_user(&pool, ada)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.subject_name)
            .collect();
        assert_eq!(names, vec!["Calculus", "Physics"]);
    }

    #[tokio::test]
    async fn insert_requires_an_existing_user() {
        let pool = db::in_memory().await;
        let err = insert(&pool, 999, "Orphan", 3.0, "A").await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn delete_is_scoped_to_owner() {
        let pool = db::in_memory().await;
        let ada = seed_user(&pool, "ada").await;
        let grace = seed_user(&pool, "grace").await;
        let subject = insert(&pool, ada, "Calculus", 4.0, "A").await.unwrap();

        assert_eq!(delete_owned(&pool, grace, subject.id).await.unwrap(), 0);
        assert_eq!(list_by_user(&pool, ada).await.unwrap().len(), 1);

        assert_eq!(delete_owned(&pool, ada, subject.id).await.unwrap(), 1);
        assert_eq!(delete_owned(&pool, ada, subject.id).await.unwrap(), 0);
        assert!(list_by_user(&pool, ada).await.unwrap().is_empty());
    }
}
