//! In-memory backend, used by tests and as the default when no database
//! path is configured.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{StoreError, TodoItem, TodoStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    items: BTreeMap<i64, TodoItem>,
    // Monotonically increasing; deleted ids are never handed out again.
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn list(&self) -> Result<Vec<TodoItem>, StoreError> {
        Ok(self.inner.read().await.items.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Option<TodoItem>, StoreError> {
        Ok(self.inner.read().await.items.get(&id).cloned())
    }

    async fn insert(&self, mut item: TodoItem) -> Result<TodoItem, StoreError> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        item.id = inner.next_id;
        inner.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update(&self, item: &TodoItem) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.items.get_mut(&item.id) {
            *existing = item.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.inner.write().await.items.remove(&id);
        Ok(())
    }

    async fn exists(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.inner.read().await.items.contains_key(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        let items = [
            ("Walk dog", false),
            ("Walk snd dog", true),
            ("Walk trd dog", false),
        ];
        for (name, is_complete) in items {
            store
                .insert(TodoItem {
                    id: 0,
                    name: name.to_string(),
                    is_complete,
                })
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn list_returns_all_seeded_items() {
        let store = seeded().await;
        assert_eq!(store.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn get_returns_item_with_matching_id() {
        let store = seeded().await;
        let item = store.get(1).await.unwrap().unwrap();
        assert_eq!(item.id, 1);
        assert_eq!(item.name, "Walk dog");
    }

    #[tokio::test]
    async fn get_missing_id_returns_none() {
        let store = seeded().await;
        assert!(store.get(4).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids_and_ignores_client_id() {
        let store = seeded().await;
        let stored = store
            .insert(TodoItem {
                id: 99,
                name: "New".to_string(),
                is_complete: false,
            })
            .await
            .unwrap();
        assert_eq!(stored.id, 4);
        assert!(store.exists(4).await.unwrap());
        assert!(!store.exists(99).await.unwrap());
    }

    #[tokio::test]
    async fn update_replaces_record_in_place() {
        let store = seeded().await;
        let replacement = TodoItem {
            id: 2,
            name: "Take out trash".to_string(),
            is_complete: false,
        };
        store.update(&replacement).await.unwrap();
        assert_eq!(store.get(2).await.unwrap().unwrap(), replacement);
        assert_eq!(store.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn update_missing_id_is_a_noop() {
        let store = seeded().await;
        let phantom = TodoItem {
            id: 4,
            name: "Phantom".to_string(),
            is_complete: false,
        };
        store.update(&phantom).await.unwrap();
        assert!(!store.exists(4).await.unwrap());
        assert_eq!(store.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let store = seeded().await;
        store.delete(1).await.unwrap();
        assert!(store.get(1).await.unwrap().is_none());
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn deleted_ids_are_never_reused() {
        let store = seeded().await;
        store.delete(3).await.unwrap();
        let stored = store.insert(TodoItem::default()).await.unwrap();
        assert_eq!(stored.id, 4);
    }
}
