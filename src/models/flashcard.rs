//! Flashcard is a question/answer pair generated from an article, plus its review schedule.
use super::{CardDraft, ReviewSchedule};
use crate::error::{EngineError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CardType {
    #[default]
    Qa,
    MultipleChoice {
        options: Vec<String>,
        #[serde(rename = "correctAnswer")]
        correct_answer: usize,
    },
}

impl CardType {
    pub fn label(&self) -> &'static str {
        match self {
            CardType::Qa => "qa",
            CardType::MultipleChoice { .. } => "multiple-choice",
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let CardType::MultipleChoice {
            options,
            correct_answer,
        } = self
        {
            if *correct_answer >= options.len() {
                return Err(EngineError::InvalidInput(format!(
                    "correct answer index {} is out of range for {} options",
                    correct_answer,
                    options.len()
                )));
            }
        }
        Ok(())
    }
}

/// Author-assigned difficulty, 1 (very easy) to 5 (very hard). Metadata only, the
/// scheduler never reads it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MEDIUM: Difficulty = Difficulty(3);

    pub fn new(value: u8) -> Result<Self> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(EngineError::InvalidInput(format!(
                "difficulty must be between 1 and 5, got {value}"
            )))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::MEDIUM
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        Difficulty::new(value).map_err(|e| e.to_string())
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> u8 {
        d.0
    }
}

/// Page a card was generated from
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardSource {
    pub url: String,
    pub title: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    #[serde(flatten)]
    pub card_type: CardType,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
    pub source_url: String,
    pub source_title: String,
    pub created_at: DateTime<Utc>,
    /// Creation time, then the time of the latest review
    pub updated_at: DateTime<Utc>,
    pub schedule: ReviewSchedule,
}

impl Flashcard {
    /// Creates a card with a fresh id and the initial schedule (due one day after `now`).
    pub fn from_draft(draft: CardDraft, source: &CardSource, now: DateTime<Utc>) -> Result<Self> {
        draft.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            question: draft.question.trim().to_string(),
            answer: draft.answer.trim().to_string(),
            card_type: draft.card_type,
            difficulty: draft.difficulty,
            tags: normalize_tags(draft.tags),
            source_url: source.url.clone(),
            source_title: source.title.clone(),
            created_at: now,
            updated_at: now,
            schedule: ReviewSchedule::initial(now),
        })
    }

    /// Checks the invariants every stored card holds: non-blank question and answer,
    /// tags forming a set, a valid card type and a valid schedule.
    pub fn validate(&self) -> Result<()> {
        if self.question.trim().is_empty() || self.answer.trim().is_empty() {
            return Err(EngineError::InvalidInput(format!(
                "flashcard {}: question and answer cannot be empty",
                self.id
            )));
        }
        if normalize_tags(&self.tags) != self.tags {
            return Err(EngineError::InvalidInput(format!(
                "flashcard {}: tags must be trimmed, non-empty and unique",
                self.id
            )));
        }
        self.card_type.validate()?;
        self.schedule
            .validate()
            .map_err(|e| EngineError::InvalidInput(format!("flashcard {}: {}", self.id, e)))
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.schedule.is_due(now)
    }
}

/// Trims tags, drops empty ones and removes duplicates, keeping first occurrences in order.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}
