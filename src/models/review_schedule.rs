//! Spaced repetition state owned by every flashcard.
use crate::error::{EngineError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_EASE_FACTOR: f64 = 1.3;
pub const INITIAL_EASE_FACTOR: f64 = 2.5;
pub const INITIAL_INTERVAL_DAYS: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSchedule {
    pub next_review: DateTime<Utc>,
    /// Days until the next review
    pub interval: u32,
    /// Consecutive successful reviews since the last lapse
    pub repetition: u32,
    pub ease_factor: f64,
}

impl ReviewSchedule {
    /// Schedule of a freshly created card: due one day after `now`.
    pub fn initial(now: DateTime<Utc>) -> Self {
        Self {
            next_review: now + Duration::days(INITIAL_INTERVAL_DAYS as i64),
            interval: INITIAL_INTERVAL_DAYS,
            repetition: 0,
            ease_factor: INITIAL_EASE_FACTOR,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval < 1 {
            return Err(EngineError::InvalidInput(format!(
                "interval must be at least 1 day, got {}",
                self.interval
            )));
        }
        if !self.ease_factor.is_finite() || self.ease_factor < MIN_EASE_FACTOR {
            return Err(EngineError::InvalidInput(format!(
                "ease factor must be at least {MIN_EASE_FACTOR}, got {}",
                self.ease_factor
            )));
        }
        Ok(())
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_initial_schedule() {
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 8, 30, 0).unwrap();
        let schedule = ReviewSchedule::initial(now);

        assert_eq!(schedule.interval, 1);
        assert_eq!(schedule.repetition, 0);
        assert_eq!(schedule.ease_factor, 2.5);
        assert_eq!(schedule.next_review, now + Duration::days(1));
        assert!(schedule.validate().is_ok());
        assert!(!schedule.is_due(now));
        assert!(schedule.is_due(now + Duration::days(1)));
    }

    #[test]
    fn test_validate_rejects_broken_schedules() {
        let now = Utc::now();
        let zero_interval = ReviewSchedule {
            interval: 0,
            ..ReviewSchedule::initial(now)
        };
        assert!(matches!(
            zero_interval.validate(),
            Err(EngineError::InvalidInput(_))
        ));

        let low_ease = ReviewSchedule {
            ease_factor: 1.2,
            ..ReviewSchedule::initial(now)
        };
        assert!(low_ease.validate().is_err());

        let nan_ease = ReviewSchedule {
            ease_factor: f64::NAN,
            ..ReviewSchedule::initial(now)
        };
        assert!(nan_ease.validate().is_err());
    }

    #[test]
    fn test_serializes_camel_case() {
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let json = serde_json::to_value(ReviewSchedule::initial(now)).unwrap();

        assert_eq!(json["interval"], 1);
        assert_eq!(json["easeFactor"], 2.5);
        assert!(json.get("nextReview").is_some());
    }
}
