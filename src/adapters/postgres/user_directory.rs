use crate::domain::value_objects::UserId;
use crate::ports::user_directory::{Result, UserDirectory as UserDirectoryTrait, UserRecord};
use async_trait::async_trait;
use sqlx::{PgPool, Row};

/// PostgreSQL implementation of UserDirectory
///
/// Read-only view over the `users` table owned by the user context.
pub struct UserDirectory {
    pool: PgPool,
}

impl UserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectoryTrait for UserDirectory {
    async fn find_user(&self, user_id: UserId) -> Result<Option<UserRecord>> {
        let row = sqlx::query(
            r#"
            SELECT user_id, name
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| UserRecord {
            user_id: UserId::from_uuid(row.get("user_id")),
            name: row.get("name"),
        }))
    }

    async fn exists(&self, user_id: UserId) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE user_id = $1)")
                .bind(user_id.value())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}
