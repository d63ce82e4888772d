pub mod clock;
pub mod config;
pub mod database;
pub mod engine;
pub mod error;
pub mod export;
pub mod models;

pub use clock::{Clock, FixedClock, SystemClock};
pub use database::{FlashcardStore, MemoryStore, SqliteStore};
pub use engine::ReviewEngine;
pub use error::{EngineError, Result, StorageError};
pub use models::{
    CardDraft, CardSource, CardType, Difficulty, Flashcard, ProgressStats, ReviewSchedule,
    compute_next_schedule, parse_generated, select_due,
};
