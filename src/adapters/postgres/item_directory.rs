use crate::domain::value_objects::{ItemId, UserId};
use crate::ports::item_directory::{ItemDirectory as ItemDirectoryTrait, ItemRecord, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row};

/// PostgreSQL implementation of ItemDirectory
///
/// Read-only view over the `items` table owned by the item context.
pub struct ItemDirectory {
    pool: PgPool,
}

impl ItemDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemDirectoryTrait for ItemDirectory {
    async fn find_item(&self, item_id: ItemId) -> Result<Option<ItemRecord>> {
        let row = sqlx::query(
            r#"
            SELECT item_id, owner_id, name, available
            FROM items
            WHERE item_id = $1
            "#,
        )
        .bind(item_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| ItemRecord {
            item_id: ItemId::from_uuid(row.get("item_id")),
            owner_id: UserId::from_uuid(row.get("owner_id")),
            name: row.get("name"),
            available: row.get("available"),
        }))
    }

    /// Uses the (owner_id) index
    async fn items_owned_by(&self, owner_id: UserId) -> Result<Vec<ItemId>> {
        let ids: Vec<uuid::Uuid> = sqlx::query_scalar(
            r#"
            SELECT item_id
            FROM items
            WHERE owner_id = $1
            "#,
        )
        .bind(owner_id.value())
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().map(ItemId::from_uuid).collect())
    }
}
