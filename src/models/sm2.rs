//! SM-2 (SuperMemo 2) spaced repetition algorithm implementation.
//!
//! The SM-2 algorithm calculates review intervals based on recall quality:
//! - Each card has an ease factor (EF) that adjusts based on performance
//! - Quality grades 0-2: reset repetitions and review again the next day
//! - Quality grades 3-5: increase interval progressively (1 day → 6 days → interval * EF)
//! - EF is adjusted after every review, lapses included, and never falls below 1.3
//!
//! Scheduling is a pure transform of a snapshot. Two concurrent reviews of the same card
//! computed from the same snapshot overwrite each other when written back; the last write
//! wins.

use super::ReviewSchedule;
use super::review_schedule::MIN_EASE_FACTOR;
use crate::error::{EngineError, Result};
use chrono::{DateTime, Duration, Utc};
use log::debug;

pub const MAX_QUALITY: i32 = 5;
/// Lowest quality that still counts as a successful recall
pub const PASSING_QUALITY: i32 = 3;

/// EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))
pub fn ease_delta(quality: i32) -> f64 {
    let miss = (MAX_QUALITY - quality) as f64;
    0.1 - miss * (0.08 + miss * 0.02)
}

fn check_quality(quality: i32) -> Result<()> {
    if (0..=MAX_QUALITY).contains(&quality) {
        Ok(())
    } else {
        Err(EngineError::InvalidInput(format!(
            "quality must be between 0 and {MAX_QUALITY}, got {quality}"
        )))
    }
}

/// Calculates the schedule that follows a review of quality 0-5
/// (0 = complete blackout, 5 = perfect response) performed at `now`.
pub fn compute_next_schedule(
    current: &ReviewSchedule,
    quality: i32,
    now: DateTime<Utc>,
) -> Result<ReviewSchedule> {
    check_quality(quality)?;
    current.validate()?;

    let (interval, repetition) = if quality < PASSING_QUALITY {
        (1, 0)
    } else {
        let repetition = current.repetition.saturating_add(1);
        let interval = match repetition {
            1 => 1,
            2 => 6,
            _ => {
                let grown = (current.interval as f64 * current.ease_factor).round();
                if grown > u32::MAX as f64 {
                    return Err(EngineError::InvalidInput(format!(
                        "interval overflow: {} days * {}",
                        current.interval, current.ease_factor
                    )));
                }
                grown as u32
            }
        };
        (interval, repetition)
    };

    let ease_factor = (current.ease_factor + ease_delta(quality)).max(MIN_EASE_FACTOR);

    let next_review = Duration::try_days(interval as i64)
        .and_then(|d| now.checked_add_signed(d))
        .ok_or_else(|| {
            EngineError::InvalidInput(format!("next review date out of range: {interval} days"))
        })?;

    debug!(
        "quality {quality}: interval {} -> {interval}, repetition {} -> {repetition}, ease {:.2} -> {ease_factor:.2}",
        current.interval, current.repetition, current.ease_factor
    );

    Ok(ReviewSchedule {
        next_review,
        interval,
        repetition,
        ease_factor,
    })
}
