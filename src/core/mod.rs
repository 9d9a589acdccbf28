//! Core utilities and common types for provchain.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
