//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `flashnotes` command isolated from the user's config and environment.
fn flashnotes(home: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("flashnotes").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env_remove("HF_API_TOKEN")
        .env_remove("SUPABASE_URL")
        .env_remove("SUPABASE_ANON_KEY")
        .env_remove("PORT");
    cmd
}

const NOTES: &str = "Photosynthesis converts light energy into chemical energy. \
    Chlorophyll absorbs mostly blue and red light. \
    The Calvin cycle fixes carbon dioxide into sugar.";

#[test]
fn help_output() {
    let home = TempDir::new().unwrap();
    flashnotes(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("flashcards"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("generate"));
}

#[test]
fn version_output() {
    let home = TempDir::new().unwrap();
    flashnotes(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("flashnotes"));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    flashnotes(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created flashnotes.toml"));

    let content = std::fs::read_to_string(dir.path().join("flashnotes.toml")).unwrap();
    assert!(content.contains("[generation]"));
    assert!(content.contains("google/flan-t5-base"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("flashnotes.toml"), "# mine\n").unwrap();

    flashnotes(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    let content = std::fs::read_to_string(dir.path().join("flashnotes.toml")).unwrap();
    assert_eq!(content, "# mine\n");
}

#[test]
fn generate_offline_prints_five_cards() {
    let home = TempDir::new().unwrap();
    let output = flashnotes(&home)
        .args(["generate", "--offline", "--notes", NOTES])
        .assert()
        .success()
        .stderr(predicate::str::contains("Source: local fallback"))
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    assert_eq!(
        stdout
            .matches("What is the main idea of this statement about")
            .count(),
        5
    );
    assert!(stdout.contains("Photosynthesis"));
}

#[test]
fn generate_offline_json() {
    let home = TempDir::new().unwrap();
    let output = flashnotes(&home)
        .args(["generate", "--offline", "--format", "json", "--notes", "Cats sleep."])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let cards = json["flashcards"].as_array().unwrap();
    assert_eq!(cards.len(), 5);
    for card in cards {
        assert_eq!(card["answer"], "Cats sleep.");
        assert_eq!(
            card["question"],
            "What is the main idea of this statement about Cats?"
        );
    }
    assert_eq!(json["source"]["kind"], "local_fallback");
}

#[test]
fn generate_from_file() {
    let home = TempDir::new().unwrap();
    let notes_path = home.path().join("notes.txt");
    std::fs::write(&notes_path, NOTES).unwrap();

    flashnotes(&home)
        .args(["generate", "--offline", "--file"])
        .arg(&notes_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Chlorophyll"));
}

#[test]
fn generate_empty_notes_fails() {
    let home = TempDir::new().unwrap();
    flashnotes(&home)
        .args(["generate", "--offline", "--notes", "   "])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: notes are empty"));
}

#[test]
fn generate_unknown_format_fails() {
    let home = TempDir::new().unwrap();
    flashnotes(&home)
        .args(["generate", "--offline", "--format", "xml", "--notes", NOTES])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn generate_requires_notes_or_file() {
    let home = TempDir::new().unwrap();
    flashnotes(&home).arg("generate").assert().failure();
}

#[test]
fn missing_config_file_fails() {
    let home = TempDir::new().unwrap();
    flashnotes(&home)
        .args(["generate", "--notes", NOTES, "--config", "no_such_config.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn list_without_store_is_empty() {
    let home = TempDir::new().unwrap();
    flashnotes(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No flashcards stored yet"));
}
