//! The `flashnotes list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use flashnotes_core::traits::FlashcardStore;
use flashnotes_providers::config::load_config_from;
use flashnotes_providers::create_store;

pub async fn execute(
    user_id: Option<String>,
    limit: usize,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(limit >= 1, "limit must be at least 1");

    let config = load_config_from(config_path.as_deref())?;
    let store = create_store(&config.store)?;

    let cards = store.recent(user_id.as_deref(), limit).await?;
    if cards.is_empty() {
        println!("No flashcards stored yet. Run `flashnotes serve` and generate some.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Created", "User", "Question", "Answer"]);

    for card in &cards {
        table.add_row(vec![
            Cell::new(
                card.created_at
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default(),
            ),
            Cell::new(card.user_id.as_deref().unwrap_or("-")),
            Cell::new(&card.question),
            Cell::new(&card.answer),
        ]);
    }

    println!("{table}");
    Ok(())
}
