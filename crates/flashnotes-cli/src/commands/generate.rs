//! The `flashnotes generate` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use flashnotes_core::model::Generation;
use flashnotes_core::FlashcardPipeline;
use flashnotes_providers::config::load_config_from;
use flashnotes_providers::create_generator;

pub async fn execute(
    notes: Option<String>,
    file: Option<PathBuf>,
    format: String,
    offline: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        matches!(format.as_str(), "table" | "json"),
        "unknown format '{format}', expected 'table' or 'json'"
    );

    let notes = match (notes, file) {
        (Some(notes), _) => notes,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read notes: {}", path.display()))?,
        (None, None) => anyhow::bail!("provide --notes or --file"),
    };
    anyhow::ensure!(!notes.trim().is_empty(), "notes are empty");

    let config = load_config_from(config_path.as_deref())?;

    let pipeline = if offline {
        FlashcardPipeline::offline()
    } else {
        FlashcardPipeline::new(Arc::from(create_generator(&config.generation)?))
    };

    let generation = pipeline.generate_detailed(&notes).await;

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&generation)?),
        _ => print_table(&generation),
    }

    Ok(())
}

fn print_table(generation: &Generation) {
    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Answer"]);

    for (i, card) in generation.flashcards.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&card.question),
            Cell::new(&card.answer),
        ]);
    }

    println!("{table}");
    eprintln!("Source: {}", generation.source);
}
