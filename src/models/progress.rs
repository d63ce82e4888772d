//! Progress counters for a flashcard collection.
use super::Flashcard;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Consecutive successful reviews after which a card counts as mastered
pub const MASTERED_REPETITIONS: u32 = 3;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStats {
    pub total: usize,
    /// Never successfully reviewed
    pub new: usize,
    pub learning: usize,
    pub mastered: usize,
    pub due: usize,
}

impl ProgressStats {
    pub fn from_cards<'a, I>(cards: I, now: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = &'a Flashcard>,
    {
        let mut stats = Self::default();
        for card in cards {
            stats.total += 1;
            match card.schedule.repetition {
                0 => stats.new += 1,
                r if r >= MASTERED_REPETITIONS => stats.mastered += 1,
                _ => stats.learning += 1,
            }
            if card.is_due(now) {
                stats.due += 1;
            }
        }
        stats
    }

    /// Share of mastered cards, 0.0 for an empty collection
    pub fn completion(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.mastered as f64 / self.total as f64
        }
    }
}
