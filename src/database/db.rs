//! SQLite-backed flashcard store
//!
//! One row per card. Schedule columns live next to the content so a review is a single
//! upsert. Tags and multiple-choice options are stored as JSON text, timestamps as
//! RFC 3339 strings.

use super::{FlashcardStore, StorageResult};
use crate::error::StorageError;
use crate::models::{CardType, Difficulty, Flashcard, ReviewSchedule};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS flashcards (
    id TEXT PRIMARY KEY,
    question TEXT NOT NULL,
    answer TEXT NOT NULL,
    card_type TEXT NOT NULL DEFAULT 'qa',
    options TEXT,
    correct_answer INTEGER,
    difficulty INTEGER NOT NULL DEFAULT 3,
    tags TEXT NOT NULL DEFAULT '[]',
    source_url TEXT NOT NULL,
    source_title TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    next_review TEXT NOT NULL,
    interval_days INTEGER NOT NULL DEFAULT 1,
    repetitions INTEGER NOT NULL DEFAULT 0,
    ease_factor REAL NOT NULL DEFAULT 2.5
)";

const SELECT_COLUMNS: &str = "SELECT id, question, answer, card_type, options, correct_answer,
    difficulty, tags, source_url, source_title, created_at, updated_at, next_review,
    interval_days, repetitions, ease_factor FROM flashcards";

/// Columns of one `flashcards` row, before validation
struct CardRow {
    id: String,
    question: String,
    answer: String,
    card_type: String,
    options: Option<String>,
    correct_answer: Option<i64>,
    difficulty: i64,
    tags: String,
    source_url: String,
    source_title: String,
    created_at: String,
    updated_at: String,
    next_review: String,
    interval_days: i64,
    repetitions: i64,
    ease_factor: f64,
}

impl CardRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            question: row.get(1)?,
            answer: row.get(2)?,
            card_type: row.get(3)?,
            options: row.get(4)?,
            correct_answer: row.get(5)?,
            difficulty: row.get(6)?,
            tags: row.get(7)?,
            source_url: row.get(8)?,
            source_title: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
            next_review: row.get(12)?,
            interval_days: row.get(13)?,
            repetitions: row.get(14)?,
            ease_factor: row.get(15)?,
        })
    }
}

fn corrupt(id: &str, what: impl std::fmt::Display) -> StorageError {
    StorageError::Corrupt(format!("flashcard {id}: {what}"))
}

fn parse_timestamp(id: &str, value: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| corrupt(id, format!("bad timestamp {value:?}: {e}")))
}

impl TryFrom<CardRow> for Flashcard {
    type Error = StorageError;

    fn try_from(row: CardRow) -> StorageResult<Self> {
        let id = Uuid::parse_str(&row.id).map_err(|e| corrupt(&row.id, e))?;

        let card_type = match row.card_type.as_str() {
            "qa" => CardType::Qa,
            "multiple-choice" => {
                let options: Vec<String> =
                    serde_json::from_str(row.options.as_deref().unwrap_or("[]"))?;
                let correct_answer = row
                    .correct_answer
                    .and_then(|i| usize::try_from(i).ok())
                    .ok_or_else(|| corrupt(&row.id, "missing correct answer"))?;
                CardType::MultipleChoice {
                    options,
                    correct_answer,
                }
            }
            other => return Err(corrupt(&row.id, format!("unknown card type {other:?}"))),
        };

        let difficulty = u8::try_from(row.difficulty)
            .ok()
            .and_then(|d| Difficulty::new(d).ok())
            .ok_or_else(|| corrupt(&row.id, format!("bad difficulty {}", row.difficulty)))?;

        let schedule = ReviewSchedule {
            next_review: parse_timestamp(&row.id, &row.next_review)?,
            interval: u32::try_from(row.interval_days)
                .map_err(|_| corrupt(&row.id, format!("bad interval {}", row.interval_days)))?,
            repetition: u32::try_from(row.repetitions)
                .map_err(|_| corrupt(&row.id, format!("bad repetition {}", row.repetitions)))?,
            ease_factor: row.ease_factor,
        };

        Ok(Flashcard {
            id,
            question: row.question,
            answer: row.answer,
            card_type,
            difficulty,
            tags: serde_json::from_str(&row.tags)?,
            source_url: row.source_url,
            source_title: row.source_title,
            created_at: parse_timestamp(&row.id, &row.created_at)?,
            updated_at: parse_timestamp(&row.id, &row.updated_at)?,
            schedule,
        })
    }
}

pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Opens (or creates) the database file and its schema
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        debug!("Opening flashcard database at {}", path.display());
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> StorageResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StorageResult<Self> {
        conn.execute(SCHEMA, ())?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Corrupt("database lock poisoned".to_string()))
    }
}

#[async_trait]
impl FlashcardStore for SqliteStore {
    async fn get_all(&self) -> StorageResult<Vec<Flashcard>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY rowid ASC"))?;
        let rows = stmt
            .query_map([], CardRow::from_row)?
            .collect::<rusqlite::Result<Vec<CardRow>>>()?;

        // Undecodable rows are skipped here; get_one still reports them as corrupt
        let mut cards = Vec::with_capacity(rows.len());
        for row in rows {
            match Flashcard::try_from(row) {
                Ok(card) => cards.push(card),
                Err(e) => warn!("Skipping unreadable flashcard row: {e}"),
            }
        }
        Ok(cards)
    }

    async fn get_one(&self, id: Uuid) -> StorageResult<Flashcard> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id.to_string()],
                CardRow::from_row,
            )
            .optional()?
            .ok_or(StorageError::NotFound(id))?;

        Flashcard::try_from(row)
    }

    async fn put(&self, card: &Flashcard) -> StorageResult<()> {
        let (options, correct_answer) = match &card.card_type {
            CardType::Qa => (None, None),
            CardType::MultipleChoice {
                options,
                correct_answer,
            } => (
                Some(serde_json::to_string(options)?),
                Some(*correct_answer as i64),
            ),
        };
        let tags = serde_json::to_string(&card.tags)?;

        let conn = self.lock()?;
        // Upsert keeps the rowid, so get_all order stays the insertion order
        conn.execute(
            "INSERT INTO flashcards (id, question, answer, card_type, options, correct_answer,
                difficulty, tags, source_url, source_title, created_at, updated_at,
                next_review, interval_days, repetitions, ease_factor)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
             ON CONFLICT(id) DO UPDATE SET
                question = excluded.question,
                answer = excluded.answer,
                card_type = excluded.card_type,
                options = excluded.options,
                correct_answer = excluded.correct_answer,
                difficulty = excluded.difficulty,
                tags = excluded.tags,
                source_url = excluded.source_url,
                source_title = excluded.source_title,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at,
                next_review = excluded.next_review,
                interval_days = excluded.interval_days,
                repetitions = excluded.repetitions,
                ease_factor = excluded.ease_factor",
            params![
                card.id.to_string(),
                card.question,
                card.answer,
                card.card_type.label(),
                options,
                correct_answer,
                card.difficulty.value() as i64,
                tags,
                card.source_url,
                card.source_title,
                card.created_at.to_rfc3339(),
                card.updated_at.to_rfc3339(),
                card.schedule.next_review.to_rfc3339(),
                card.schedule.interval as i64,
                card.schedule.repetition as i64,
                card.schedule.ease_factor,
            ],
        )?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        let conn = self.lock()?;
        let deleted = conn.execute(
            "DELETE FROM flashcards WHERE id = ?1",
            params![id.to_string()],
        )?;
        if deleted == 0 {
            return Err(StorageError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CardDraft, CardSource};
    use chrono::{Duration, TimeZone};

    fn card(question: &str) -> Flashcard {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 15).unwrap();
        let source = CardSource {
            url: "https://example.com/a".to_string(),
            title: "An Article".to_string(),
        };
        Flashcard::from_draft(
            CardDraft::qa(question, "answer").with_tags(["one", "two"]),
            &source,
            now,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_put_and_get_one() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut card = card("What is SQLite?");
        card.card_type = CardType::MultipleChoice {
            options: vec!["A database".to_string(), "A fruit".to_string()],
            correct_answer: 0,
        };
        store.put(&card).await.unwrap();

        let loaded = store.get_one(card.id).await.unwrap();
        assert_eq!(loaded, card);
    }

    #[tokio::test]
    async fn test_upsert_preserves_order() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut first = card("first");
        let second = card("second");
        let third = card("third");
        for c in [&first, &second, &third] {
            store.put(c).await.unwrap();
        }

        first.schedule = ReviewSchedule {
            next_review: first.schedule.next_review + Duration::days(5),
            interval: 6,
            repetition: 2,
            ease_factor: 2.7,
        };
        store.put(&first).await.unwrap();

        let all = store.get_all().await.unwrap();
        let questions: Vec<&str> = all.iter().map(|c| c.question.as_str()).collect();
        assert_eq!(questions, vec!["first", "second", "third"]);
        assert_eq!(all[0].schedule, first.schedule);
    }

    #[tokio::test]
    async fn test_not_found() {
        let store = SqliteStore::open_in_memory().unwrap();
        let id = Uuid::new_v4();
        assert!(matches!(
            store.get_one(id).await,
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            store.delete(id).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_and_reopen_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cards.sqlite3");
        let keep = card("keep");
        let drop = card("drop");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.put(&keep).await.unwrap();
            store.put(&drop).await.unwrap();
            store.delete(drop.id).await.unwrap();
        }

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.get_all().await.unwrap(), vec![keep]);
    }

    #[tokio::test]
    async fn test_corrupt_row_is_reported() {
        let store = SqliteStore::open_in_memory().unwrap();
        let card = card("q");
        store.put(&card).await.unwrap();
        store
            .lock()
            .unwrap()
            .execute("UPDATE flashcards SET next_review = 'yesterday'", ())
            .unwrap();

        assert!(matches!(
            store.get_one(card.id).await,
            Err(StorageError::Corrupt(_))
        ));
    }

    #[tokio::test]
    async fn test_get_all_skips_corrupt_rows() {
        let store = SqliteStore::open_in_memory().unwrap();
        let good = card("good");
        let bad = card("bad");
        store.put(&good).await.unwrap();
        store.put(&bad).await.unwrap();
        store
            .lock()
            .unwrap()
            .execute(
                "UPDATE flashcards SET difficulty = 9 WHERE id = ?1",
                params![bad.id.to_string()],
            )
            .unwrap();

        assert_eq!(store.get_all().await.unwrap(), vec![good]);
        assert!(matches!(
            store.get_one(bad.id).await,
            Err(StorageError::Corrupt(_))
        ));
    }

    #[tokio::test]
    async fn test_updated_at_follows_upsert() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut card = card("q");
        store.put(&card).await.unwrap();

        card.updated_at = card.updated_at + Duration::days(3);
        store.put(&card).await.unwrap();

        let loaded = store.get_one(card.id).await.unwrap();
        assert_eq!(loaded.updated_at, card.updated_at);
        assert_eq!(loaded.created_at, card.created_at);
    }
}
