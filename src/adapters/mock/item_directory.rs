use crate::domain::value_objects::{ItemId, UserId};
use crate::ports::item_directory::{ItemDirectory as ItemDirectoryTrait, ItemRecord, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// ItemDirectoryのモック実装
///
/// アイテムを登録することで状態を持ったテストをサポート。
pub struct ItemDirectory {
    items: Mutex<HashMap<ItemId, ItemRecord>>,
}

impl ItemDirectory {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
        }
    }

    /// テスト用にアイテムを登録
    pub fn add_item(&self, owner_id: UserId, name: &str, available: bool) -> ItemId {
        let item_id = ItemId::new();
        self.items.lock().unwrap().insert(
            item_id,
            ItemRecord {
                item_id,
                owner_id,
                name: name.to_string(),
                available,
            },
        );
        item_id
    }

    /// テスト用に貸出可否を切り替え
    pub fn set_available(&self, item_id: ItemId, available: bool) {
        if let Some(item) = self.items.lock().unwrap().get_mut(&item_id) {
            item.available = available;
        }
    }
}

impl Default for ItemDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemDirectoryTrait for ItemDirectory {
    async fn find_item(&self, item_id: ItemId) -> Result<Option<ItemRecord>> {
        Ok(self.items.lock().unwrap().get(&item_id).cloned())
    }

    async fn items_owned_by(&self, owner_id: UserId) -> Result<Vec<ItemId>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|item| item.owner_id == owner_id)
            .map(|item| item.item_id)
            .collect())
    }
}
