//! CSV export for spreadsheet and flashcard-app import.
use crate::error::{Result, StorageError};
use crate::models::Flashcard;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const HEADERS: [&str; 6] = ["Question", "Answer", "Type", "Difficulty", "Tags", "Next Review"];

pub fn export_csv<W: Write>(cards: &[Flashcard], writer: W) -> Result<()> {
    let mut wtr = ::csv::Writer::from_writer(writer);
    wtr.write_record(HEADERS).map_err(StorageError::from)?;

    for card in cards {
        let difficulty = card.difficulty.value().to_string();
        let tags = card.tags.join(", ");
        let next_review = card.schedule.next_review.format("%Y-%m-%d").to_string();
        wtr.write_record([
            card.question.as_str(),
            card.answer.as_str(),
            card.card_type.label(),
            difficulty.as_str(),
            tags.as_str(),
            next_review.as_str(),
        ])
        .map_err(StorageError::from)?;
    }

    wtr.flush().map_err(StorageError::from)?;
    Ok(())
}

pub fn export_csv_to_path(cards: &[Flashcard], path: &Path) -> Result<()> {
    let file = File::create(path).map_err(StorageError::from)?;
    export_csv(cards, file)
}
