//! Tamper-evident provenance ledger.
//!
//! Provides an append-only audit trail for supply-chain events:
//! - Content-addressed blocks
//! - Hash-linked chain
//! - Whole-chain integrity verification

pub mod block;
pub mod chain;

pub use block::{Block, GENESIS_PREVIOUS_HASH};
pub use chain::{payload_from_value, Chain, ChainVerification, IntegrityIssue};
