//! Caller-facing review API.
//!
//! `ReviewEngine` wires the scheduler and the due-card query to an injected store and
//! clock. Every schedule change goes through `compute_next_schedule`; nothing else writes
//! a schedule.
//!
//! Reviews are read, compute, write. Two reviews of the same card running at the same
//! time both start from the same snapshot and the last write wins; callers that need
//! both counted must serialize reviews per card.

use crate::clock::{Clock, SystemClock};
use crate::database::FlashcardStore;
use crate::error::Result;
use crate::models::{
    CardDraft, CardSource, Flashcard, ProgressStats, compute_next_schedule, select_due,
};
use log::info;
use uuid::Uuid;

pub struct ReviewEngine<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: FlashcardStore> ReviewEngine<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: FlashcardStore, C: Clock> ReviewEngine<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Applies a review of quality 0-5 to a card and persists the new schedule.
    /// An invalid quality is rejected before anything is written.
    pub async fn review_card(&self, id: Uuid, quality: i32) -> Result<Flashcard> {
        let mut card = self.store.get_one(id).await?;
        let now = self.clock.now();
        card.schedule = compute_next_schedule(&card.schedule, quality, now)?;
        card.updated_at = now;
        self.store.put(&card).await?;

        info!(
            "Reviewed {} (quality {}): next review in {} day(s)",
            id, quality, card.schedule.interval
        );
        Ok(card)
    }

    /// Cards due now, soonest first.
    pub async fn get_due_cards(&self) -> Result<Vec<Flashcard>> {
        let cards = self.store.get_all().await?;
        Ok(select_due(&cards, self.clock.now()))
    }

    pub async fn add_card(&self, draft: CardDraft, source: &CardSource) -> Result<Flashcard> {
        let card = Flashcard::from_draft(draft, source, self.clock.now())?;
        self.store.put(&card).await?;
        info!("Added flashcard {}", card.id);
        Ok(card)
    }

    /// Stores one card per generated draft. Drafts are validated up front so a bad draft
    /// leaves the store untouched.
    pub async fn add_generated(
        &self,
        drafts: Vec<CardDraft>,
        source: &CardSource,
    ) -> Result<Vec<Flashcard>> {
        let now = self.clock.now();
        let cards = drafts
            .into_iter()
            .map(|draft| Flashcard::from_draft(draft, source, now))
            .collect::<Result<Vec<_>>>()?;

        for card in &cards {
            self.store.put(card).await?;
        }

        info!(
            "Added {} generated flashcards from {:?}",
            cards.len(),
            source.url
        );
        Ok(cards)
    }

    /// Upserts previously exported cards as-is, schedules included. Every card is
    /// validated before the first write.
    pub async fn restore(&self, cards: &[Flashcard]) -> Result<usize> {
        for card in cards {
            card.validate()?;
        }
        for card in cards {
            self.store.put(card).await?;
        }
        info!("Restored {} flashcards", cards.len());
        Ok(cards.len())
    }

    pub async fn get_card(&self, id: Uuid) -> Result<Flashcard> {
        Ok(self.store.get_one(id).await?)
    }

    pub async fn all_cards(&self) -> Result<Vec<Flashcard>> {
        Ok(self.store.get_all().await?)
    }

    pub async fn delete_card(&self, id: Uuid) -> Result<()> {
        self.store.delete(id).await?;
        info!("Deleted flashcard {}", id);
        Ok(())
    }

    pub async fn progress(&self) -> Result<ProgressStats> {
        let cards = self.store.get_all().await?;
        Ok(ProgressStats::from_cards(&cards, self.clock.now()))
    }
}
