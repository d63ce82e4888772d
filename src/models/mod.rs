pub mod draft;
pub mod flashcard;
pub mod progress;
pub mod review_queue;
pub mod review_schedule;
pub mod sm2;

pub use draft::{CardDraft, parse_generated};
pub use flashcard::{CardSource, CardType, Difficulty, Flashcard, normalize_tags};
pub use progress::ProgressStats;
pub use review_queue::select_due;
pub use review_schedule::ReviewSchedule;
pub use sm2::compute_next_schedule;
