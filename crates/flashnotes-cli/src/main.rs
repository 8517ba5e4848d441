//! flashnotes CLI — the user-facing command-line interface and HTTP server.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod server;

#[derive(Parser)]
#[command(
    name = "flashnotes",
    version,
    about = "Turn study notes into question/answer flashcards"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the flashcard API and frontend
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (defaults to $PORT, then 8000)
        #[arg(long)]
        port: Option<u16>,

        /// Directory with index.html and other frontend assets
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Generate five flashcards from notes and print them
    Generate {
        /// Notes text
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        notes: Option<String>,

        /// Read notes from a file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,

        /// Skip the remote models and use the local generator only
        #[arg(long)]
        offline: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List recently stored flashcards
    List {
        /// Only cards belonging to this user
        #[arg(long)]
        user_id: Option<String>,

        /// Maximum number of cards
        #[arg(long, default_value = "50")]
        limit: usize,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter flashnotes.toml
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("flashnotes=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve {
            host,
            port,
            static_dir,
            config,
        } => commands::serve::execute(host, port, static_dir, config).await,
        Commands::Generate {
            notes,
            file,
            format,
            offline,
            config,
        } => commands::generate::execute(notes, file, format, offline, config).await,
        Commands::List {
            user_id,
            limit,
            config,
        } => commands::list::execute(user_id, limit, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
