//! Theme engine and template rendering.
//!
//! Provides Tera-based page rendering from the built-in template set or a
//! template directory on disk.

mod engine;

pub use engine::ThemeEngine;
