//! Selection of the cards that are due for review.
use super::Flashcard;
use chrono::{DateTime, Utc};
use log::debug;

/// Returns the cards whose next review is at or before `now`, soonest first.
///
/// The sort is stable, so cards due at the same instant keep their input order.
/// Nothing is mutated: selecting a card does not mark it as seen.
pub fn select_due<'a, I>(cards: I, now: DateTime<Utc>) -> Vec<Flashcard>
where
    I: IntoIterator<Item = &'a Flashcard>,
{
    let mut due: Vec<Flashcard> = cards
        .into_iter()
        .filter(|card| card.is_due(now))
        .cloned()
        .collect();
    due.sort_by_key(|card| card.schedule.next_review);

    debug!("{} cards due at {}", due.len(), now);
    due
}
