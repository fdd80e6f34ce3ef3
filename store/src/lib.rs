//! Persistence layer for the todo service.
//!
//! # Overview
//! Defines the `TodoItem` record and the `TodoStore` capability trait, plus
//! two backends: `MemoryStore` for tests and local development, and
//! `SqliteStore` for durable storage. Handlers hold an `Arc<dyn TodoStore>`,
//! so swapping the engine never touches service logic.
//!
//! # Design
//! - Ids are assigned by the store on insert (auto-increment) and are never
//!   reused after a delete within a store lifetime.
//! - `update` and `delete` do not report a missing id; callers gate on
//!   `exists` first and pick the status code themselves.
//! - The trait is async via `async_trait` so it stays dyn-compatible while
//!   both backends await their internal locks.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single todo item, serialized in camelCase on the wire.
///
/// All fields default on deserialization: a POST body may omit any of them,
/// and a client-supplied `id` is ignored by `insert`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct TodoItem {
    pub id: i64,
    pub name: String,
    pub is_complete: bool,
}

/// Backend failures. The in-memory store is infallible but shares the
/// signature so the two backends are interchangeable behind the trait.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Durable storage of todo items, keyed by a numeric id.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All items, in no guaranteed order.
    async fn list(&self) -> Result<Vec<TodoItem>, StoreError>;

    /// The item with this id, if any.
    async fn get(&self, id: i64) -> Result<Option<TodoItem>, StoreError>;

    /// Persists the item under a fresh id (any id on `item` is ignored) and
    /// returns the stored copy.
    async fn insert(&self, item: TodoItem) -> Result<TodoItem, StoreError>;

    /// Replaces the record whose id matches `item.id` in place. A no-op if
    /// the id is absent.
    async fn update(&self, item: &TodoItem) -> Result<(), StoreError>;

    /// Removes the record with this id, if present.
    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    async fn exists(&self, id: i64) -> Result<bool, StoreError>;
}
