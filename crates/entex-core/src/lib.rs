//! Core types shared by the entex crates.
//!
//! This crate provides the fundamental records every other component works with:
//! - Extraction variants (Variant)
//! - Per-variant model settings (ModelConfig)
//! - Per-variant page and download strings (PresentationSpec)
//! - Validated user input (Request)

mod model;
mod presentation;
mod request;
mod variant;

pub use model::{ModelConfig, DEFAULT_MODEL};
pub use presentation::PresentationSpec;
pub use request::{EmptyInputError, Request};
pub use variant::{ParseVariantError, Variant};
