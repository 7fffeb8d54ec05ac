//! Newsdesk Kernel Library
//!
//! Exposes the kernel's routes, models and services so the `newsdesk`
//! binary and the integration tests build the exact same application.

pub mod config;
pub mod db;
pub mod error;
pub mod form;
pub mod models;
pub mod routes;
pub mod session;
pub mod state;
pub mod theme;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
