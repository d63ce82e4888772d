//! JSON import/export module for flashcard collections.
//! Saves the whole collection, schedules included, and loads it back.

use crate::error::{EngineError, Result, StorageError};
use crate::models::{Flashcard, normalize_tags};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Writes the cards as a pretty-printed JSON array.
pub fn export_json<W: Write>(cards: &[Flashcard], mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, cards).map_err(StorageError::from)?;
    writer.write_all(b"\n").map_err(StorageError::from)?;
    Ok(())
}

pub fn export_json_to_path(cards: &[Flashcard], path: &Path) -> Result<()> {
    let file = File::create(path).map_err(StorageError::from)?;
    let mut writer = BufWriter::new(file);
    export_json(cards, &mut writer)?;
    writer.flush().map_err(StorageError::from)?;
    Ok(())
}

/// Reads a JSON export. Tags are normalized, then every card is checked, so a hand-edited
/// file cannot bring blank text or an invalid schedule into the store.
pub fn import_json<R: Read>(reader: R) -> Result<Vec<Flashcard>> {
    let mut cards: Vec<Flashcard> = serde_json::from_reader(reader)
        .map_err(|e| EngineError::InvalidInput(format!("invalid flashcard export: {e}")))?;

    for card in &mut cards {
        card.tags = normalize_tags(&card.tags);
        card.validate()?;
    }
    Ok(cards)
}

pub fn import_json_from_path(path: &Path) -> Result<Vec<Flashcard>> {
    let file = File::open(path).map_err(StorageError::from)?;
    import_json(BufReader::new(file))
}
