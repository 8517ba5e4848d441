//! flashnotes-providers — Generation and storage backends.
//!
//! Implements the core `TextGenerator` trait for the Hugging Face Inference
//! API and the `FlashcardStore` trait for Supabase and an in-memory store,
//! plus configuration loading and factories for both.

pub mod config;
pub mod huggingface;
pub mod memory;
pub mod mock;
pub mod supabase;

pub use config::{create_generator, create_store, load_config, FlashnotesConfig};
pub use huggingface::{HuggingFaceGenerator, HuggingFaceSettings};
pub use memory::MemoryStore;
pub use supabase::SupabaseStore;
