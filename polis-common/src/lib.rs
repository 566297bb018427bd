//! # Polis Common Library
//!
//! Shared code for the conversation report tooling:
//! - Wire models for the backend's math, matrix and comment documents
//! - Configuration loading (TOML bootstrap + environment overrides)
//! - Common error type

pub mod config;
pub mod error;
pub mod models;

pub use error::{Error, Result};
pub use models::{Cell, CoOccurrenceMatrix, Comment, GroupVotes, MathResult, Tid};
