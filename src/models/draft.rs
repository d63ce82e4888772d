//! Card drafts produced by content generation, before they become scheduled flashcards.
//!
//! The model is asked for a JSON array of `{question, answer, type, difficulty, tags}`
//! objects. Replies are not always clean: they may be fenced in a markdown code block or
//! surrounded by prose, and single entries may be incomplete. `parse_generated` keeps
//! every usable entry and skips the rest.

use super::{CardType, Difficulty};
use crate::error::{EngineError, Result};
use log::warn;
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq)]
pub struct CardDraft {
    pub question: String,
    pub answer: String,
    pub card_type: CardType,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
}

impl CardDraft {
    pub fn qa(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            card_type: CardType::Qa,
            difficulty: Difficulty::default(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.question.trim().is_empty() {
            return Err(EngineError::InvalidInput(
                "question cannot be empty".to_string(),
            ));
        }
        if self.answer.trim().is_empty() {
            return Err(EngineError::InvalidInput("answer cannot be empty".to_string()));
        }
        self.card_type.validate()
    }
}

/// One entry of the model reply, as loosely as the model tends to write it.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedEntry {
    #[serde(default)]
    question: String,
    #[serde(default)]
    answer: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    difficulty: Option<i64>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    correct_answer: Option<usize>,
}

impl TryFrom<GeneratedEntry> for CardDraft {
    type Error = EngineError;

    fn try_from(entry: GeneratedEntry) -> Result<Self> {
        let difficulty = match entry.difficulty {
            None => Difficulty::default(),
            Some(d) => {
                let d = u8::try_from(d).map_err(|_| {
                    EngineError::InvalidInput(format!("difficulty out of range: {d}"))
                })?;
                Difficulty::new(d)?
            }
        };

        let card_type = match entry.kind.as_deref() {
            None | Some("qa") => CardType::Qa,
            Some("multiple-choice") => CardType::MultipleChoice {
                options: entry.options,
                correct_answer: entry.correct_answer.ok_or_else(|| {
                    EngineError::InvalidInput(
                        "multiple-choice card without correctAnswer".to_string(),
                    )
                })?,
            },
            Some(other) => {
                return Err(EngineError::InvalidInput(format!(
                    "unknown card type: {other}"
                )));
            }
        };

        let draft = CardDraft {
            question: entry.question,
            answer: entry.answer,
            card_type,
            difficulty,
            tags: entry.tags,
        };
        draft.validate()?;
        Ok(draft)
    }
}

/// Finds the JSON array in a raw model reply. The array starts at the first `[`; the
/// widest slice ending on a `]` that parses wins, so brackets in trailing prose
/// ("see [1]") are tolerated.
fn json_array_entries(text: &str) -> Result<Vec<serde_json::Value>> {
    let start = text.find('[').ok_or_else(|| {
        EngineError::InvalidInput("generated content does not contain a JSON array".to_string())
    })?;

    let mut last_error = None;
    for (end, _) in text.match_indices(']').rev() {
        if end < start {
            break;
        }
        match serde_json::from_str::<Vec<serde_json::Value>>(&text[start..=end]) {
            Ok(entries) => return Ok(entries),
            Err(e) => last_error = Some(e),
        }
    }

    Err(EngineError::InvalidInput(match last_error {
        Some(e) => format!("generated content is not a JSON array: {e}"),
        None => "generated content does not contain a JSON array".to_string(),
    }))
}

/// Parses a model reply into drafts. Fails only when the reply holds no JSON array at all;
/// malformed entries are logged and skipped.
pub fn parse_generated(text: &str) -> Result<Vec<CardDraft>> {
    let entries = json_array_entries(text)?;

    let mut drafts = Vec::with_capacity(entries.len());
    for (idx, value) in entries.into_iter().enumerate() {
        let parsed = serde_json::from_value::<GeneratedEntry>(value)
            .map_err(|e| EngineError::InvalidInput(e.to_string()))
            .and_then(CardDraft::try_from);
        match parsed {
            Ok(draft) => drafts.push(draft),
            Err(e) => warn!("Skipping generated card #{}: {}", idx + 1, e),
        }
    }

    Ok(drafts)
}
