//! Storage collaborators for the flashcard collection.
//!
//! The engine only needs four operations. Stores own their connection; the engine never
//! opens or manages one.

pub mod db;
pub mod memory;

use crate::error::StorageError;
use crate::models::Flashcard;
use async_trait::async_trait;
use uuid::Uuid;

pub use db::SqliteStore;
pub use memory::MemoryStore;

pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[async_trait]
pub trait FlashcardStore: Send + Sync {
    /// All cards, in insertion order
    async fn get_all(&self) -> StorageResult<Vec<Flashcard>>;

    /// Fails with `StorageError::NotFound` when the id is absent
    async fn get_one(&self, id: Uuid) -> StorageResult<Flashcard>;

    /// Inserts or replaces by id. A replaced card keeps its insertion position.
    async fn put(&self, card: &Flashcard) -> StorageResult<()>;

    /// Fails with `StorageError::NotFound` when the id is absent
    async fn delete(&self, id: Uuid) -> StorageResult<()>;
}
