//! The `flashnotes init` command.

use anyhow::Result;

const CONFIG_FILE: &str = "flashnotes.toml";

pub fn execute() -> Result<()> {
    if std::path::Path::new(CONFIG_FILE).exists() {
        println!("{CONFIG_FILE} already exists, skipping.");
        return Ok(());
    }

    std::fs::write(CONFIG_FILE, SAMPLE_CONFIG)?;
    println!("Created {CONFIG_FILE}");

    println!("\nNext steps:");
    println!("  1. Export HF_API_TOKEN (optional, raises rate limits)");
    println!("  2. Export SUPABASE_URL and SUPABASE_ANON_KEY to persist cards");
    println!("  3. Run: flashnotes serve");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# flashnotes configuration

[generation]
base_url = "https://api-inference.huggingface.co"
api_token = "${HF_API_TOKEN}"
# Tried in order until one answers.
models = [
    "google/flan-t5-base",
    "google/flan-t5-small",
    "bigscience/mt0-small",
    "bigscience/T0pp",
]
max_new_tokens = 512
temperature = 0.3
timeout_secs = 60
# "universal" tries the next model on any failure,
# "retryable-only" stops at the first non-retryable HTTP status.
fallthrough = "universal"

[store]
# Leave unset to keep cards in memory only.
supabase_url = "${SUPABASE_URL}"
supabase_key = "${SUPABASE_ANON_KEY}"
table = "flashcards"

[server]
host = "0.0.0.0"
port = 8000
static_dir = "frontend"
"#;
