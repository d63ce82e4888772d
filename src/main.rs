use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use flashcards_engine::config::{Config, ExportFormat};
use flashcards_engine::export;
use flashcards_engine::models::normalize_tags;
use flashcards_engine::*;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "flashcards", about = "Spaced repetition for article flashcards", version)]
struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store the cards from a saved model reply (JSON array of cards)
    Import {
        /// File holding the model reply
        file: PathBuf,
        /// URL of the source article
        #[arg(long, default_value = "")]
        url: String,
        /// Title of the source article
        #[arg(long, default_value = "")]
        title: String,
    },

    /// Add a single question/answer card
    Add {
        #[arg(long)]
        question: String,
        #[arg(long)]
        answer: String,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
        /// 1 (very easy) to 5 (very hard)
        #[arg(long, default_value = "3")]
        difficulty: u8,
        #[arg(long, default_value = "")]
        url: String,
        #[arg(long, default_value = "")]
        title: String,
    },

    /// List cards due for review, soonest first
    Due,

    /// Record a review of a card
    Review {
        id: Uuid,
        /// Recall quality, 0 (blackout) to 5 (perfect)
        #[arg(allow_negative_numbers = true)]
        quality: i32,
    },

    /// Show collection progress
    Stats,

    /// Delete a card
    Delete { id: Uuid },

    /// Export all cards
    Export {
        /// Defaults to the configured export format
        #[arg(long)]
        format: Option<ExportFormat>,
        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Load a JSON export back into the store
    Restore { file: PathBuf },
}

fn print_card(card: &Flashcard) {
    println!(
        "{}  due {}  [{}d, rep {}, ef {:.2}]  {}",
        card.id,
        card.schedule.next_review.format("%Y-%m-%d %H:%M"),
        card.schedule.interval,
        card.schedule.repetition,
        card.schedule.ease_factor,
        card.question
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    let store = SqliteStore::open(&config.database_path).with_context(|| {
        format!(
            "Failed to open database at {}",
            config.database_path.display()
        )
    })?;
    let engine = ReviewEngine::new(store);

    match cli.command {
        Command::Import { file, url, title } => {
            let reply = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let drafts = parse_generated(&reply)?;
            if drafts.is_empty() {
                bail!("No usable flashcards in {}", file.display());
            }
            let cards = engine
                .add_generated(drafts, &CardSource { url, title })
                .await?;
            println!("Imported {} flashcards", cards.len());
        }
        Command::Add {
            question,
            answer,
            tags,
            difficulty,
            url,
            title,
        } => {
            let tags = tags
                .map(|t| normalize_tags(t.split(',')))
                .unwrap_or_default();
            let draft = CardDraft::qa(question, answer)
                .with_tags(tags)
                .with_difficulty(Difficulty::new(difficulty)?);
            let card = engine.add_card(draft, &CardSource { url, title }).await?;
            println!("Added {}", card.id);
        }
        Command::Due => {
            let due = engine.get_due_cards().await?;
            if due.is_empty() {
                println!("Nothing due. Come back later!");
            }
            for card in &due {
                print_card(card);
            }
        }
        Command::Review { id, quality } => {
            let card = engine.review_card(id, quality).await?;
            print_card(&card);
        }
        Command::Stats => {
            let stats = engine.progress().await?;
            println!("Total:    {}", stats.total);
            println!("New:      {}", stats.new);
            println!("Learning: {}", stats.learning);
            println!("Mastered: {}", stats.mastered);
            println!("Due now:  {}", stats.due);
            println!("Progress: {:.0}%", stats.completion() * 100.0);
        }
        Command::Delete { id } => {
            engine.delete_card(id).await?;
            println!("Deleted {id}");
        }
        Command::Export { format, output } => {
            let cards = engine.all_cards().await?;
            let format = format.unwrap_or(config.export_format);
            match (format, output) {
                (ExportFormat::Csv, Some(path)) => export::export_csv_to_path(&cards, &path)?,
                (ExportFormat::Json, Some(path)) => export::export_json_to_path(&cards, &path)?,
                (ExportFormat::Csv, None) => export::export_csv(&cards, io::stdout().lock())?,
                (ExportFormat::Json, None) => export::export_json(&cards, io::stdout().lock())?,
            }
            io::stdout().flush()?;
        }
        Command::Restore { file } => {
            let cards = export::import_json_from_path(&file)?;
            let count = engine.restore(&cards).await?;
            println!("Restored {count} flashcards");
        }
    }

    Ok(())
}
