//! Theme engine and template rendering.
//!
//! Provides Tera-based rendering of dex lists with built-in templates,
//! on-disk overrides and per-selector template suggestions.

mod engine;
pub mod templates;

pub use engine::{RenderedList, SharedThemeEngine, ThemeEngine};
