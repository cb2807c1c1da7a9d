pub mod analyzer;
pub mod cli;
pub mod config;
pub mod presenter;
pub mod profile;
pub mod web;

// Re-export core types for convenience
pub use entex_core::{ModelConfig, PresentationSpec, Request, Variant};
