//! # provchain - Tamper-Evident Supply-Chain Provenance Ledger
//!
//! An append-only, in-memory ledger of hash-chained blocks:
//! - **Block**: content-addressed record binding a payload to its predecessor
//! - **Chain**: genesis seeding, append, whole-chain integrity verification
//!
//! ## Quick Start
//!
//! ```rust
//! use provchain::{Chain, Payload};
//! use serde_json::json;
//!
//! let mut ledger = Chain::new();
//! let payload: Payload = serde_json::from_value(json!({
//!     "action": "extract",
//!     "asset_id": "1000",
//!     "amount": "100kg",
//! }))
//! .unwrap();
//! ledger.append(payload);
//! assert!(ledger.verify().valid);
//! ```

pub mod core;
pub mod ledger;

pub use crate::core::error::{Error, Result};
pub use crate::core::types::Payload;
pub use crate::ledger::{Block, Chain, ChainVerification, IntegrityIssue};
