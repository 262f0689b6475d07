use crate::domain::value_objects::UserId;
use crate::ports::user_directory::{Result, UserDirectory as UserDirectoryTrait, UserRecord};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Mock implementation of UserDirectory
///
/// Supports stateful testing by storing registered users.
pub struct UserDirectory {
    users: Mutex<HashMap<UserId, UserRecord>>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }

    /// Register a user for testing purposes
    pub fn add_user(&self, name: &str) -> UserId {
        let user_id = UserId::new();
        self.users.lock().unwrap().insert(
            user_id,
            UserRecord {
                user_id,
                name: name.to_string(),
            },
        );
        user_id
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserDirectoryTrait for UserDirectory {
    async fn find_user(&self, user_id: UserId) -> Result<Option<UserRecord>> {
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }

    async fn exists(&self, user_id: UserId) -> Result<bool> {
        Ok(self.users.lock().unwrap().contains_key(&user_id))
    }
}
