//! In-memory store, used by tests and for throwaway sessions.
use super::{FlashcardStore, StorageResult};
use crate::error::StorageError;
use crate::models::Flashcard;
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct MemoryStore {
    cards: Mutex<Vec<Flashcard>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cards(cards: Vec<Flashcard>) -> Self {
        Self {
            cards: Mutex::new(cards),
        }
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Vec<Flashcard>>> {
        self.cards
            .lock()
            .map_err(|_| StorageError::Corrupt("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl FlashcardStore for MemoryStore {
    async fn get_all(&self) -> StorageResult<Vec<Flashcard>> {
        Ok(self.lock()?.clone())
    }

    async fn get_one(&self, id: Uuid) -> StorageResult<Flashcard> {
        self.lock()?
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(StorageError::NotFound(id))
    }

    async fn put(&self, card: &Flashcard) -> StorageResult<()> {
        let mut cards = self.lock()?;
        match cards.iter_mut().find(|c| c.id == card.id) {
            Some(existing) => *existing = card.clone(),
            None => cards.push(card.clone()),
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        let mut cards = self.lock()?;
        let pos = cards
            .iter()
            .position(|c| c.id == id)
            .ok_or(StorageError::NotFound(id))?;
        cards.remove(pos);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CardDraft, CardSource};
    use chrono::Utc;

    fn card(question: &str) -> Flashcard {
        Flashcard::from_draft(CardDraft::qa(question, "a"), &CardSource::default(), Utc::now())
            .unwrap()
    }

    #[tokio::test]
    async fn test_put_keeps_insertion_order_on_replace() {
        let store = MemoryStore::new();
        let mut first = card("first");
        let second = card("second");
        store.put(&first).await.unwrap();
        store.put(&second).await.unwrap();

        first.schedule.repetition = 2;
        store.put(&first).await.unwrap();

        let all = store.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].question, "first");
        assert_eq!(all[0].schedule.repetition, 2);
        assert_eq!(all[1].question, "second");
    }

    #[tokio::test]
    async fn test_missing_ids() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(
            store.get_one(id).await,
            Err(StorageError::NotFound(found)) if found == id
        ));
        assert!(matches!(
            store.delete(id).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let a = card("a");
        let b = card("b");
        let store = MemoryStore::with_cards(vec![a.clone(), b.clone()]);

        store.delete(a.id).await.unwrap();
        let all = store.get_all().await.unwrap();
        assert_eq!(all, vec![b]);
    }
}
