//! Hash-linked chain of provenance blocks.
//!
//! Maintains an append-only, verifiable sequence of blocks. The chain is
//! single-writer and performs no internal locking; concurrent use requires
//! external exclusion.

use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::core::error::{Error, Result};
use crate::core::types::{Clock, IdSource, Payload, SystemClock, UuidIds};
use crate::ledger::block::{Block, GENESIS_PREVIOUS_HASH};

/// Integrity violation kinds detected by [`Chain::verify`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntegrityIssue {
    /// A block's recorded predecessor hash does not match the actual
    /// predecessor's current hash
    LinkFailure,
    /// A block's stored hash no longer matches the hash recomputed from
    /// its current field values
    Tampering,
}

impl std::fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrityIssue::LinkFailure => write!(f, "Chain Link Failure"),
            IntegrityIssue::Tampering => write!(f, "Data Tampering"),
        }
    }
}

/// Result of chain verification.
///
/// Verification stops at the first problem found, so at most one issue is
/// reported per walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainVerification {
    /// Whether the whole chain passed verification
    pub valid: bool,
    /// Kind of the first violation found, if any
    pub issue: Option<IntegrityIssue>,
    /// Id of the offending block, if any
    pub block_id: Option<Uuid>,
}

impl ChainVerification {
    fn ok() -> Self {
        Self {
            valid: true,
            issue: None,
            block_id: None,
        }
    }

    fn violated(issue: IntegrityIssue, block_id: Uuid) -> Self {
        Self {
            valid: false,
            issue: Some(issue),
            block_id: Some(block_id),
        }
    }
}

/// Append-only provenance chain.
///
/// Index 0 is always the genesis block (no payload, predecessor sentinel
/// `"0"`). Clock and id generation are injected capabilities so chains can
/// be built deterministically in tests; [`Chain::new`] wires in the system
/// clock and random UUIDs.
#[derive(Clone, Debug)]
pub struct Chain<C = SystemClock, I = UuidIds>
where
    C: Clock,
    I: IdSource,
{
    blocks: Vec<Block>,
    clock: C,
    ids: I,
}

impl Chain {
    /// Create a new chain seeded with a genesis block, using system time
    /// and random block ids.
    pub fn new() -> Self {
        Self::with_capabilities(SystemClock, UuidIds)
    }

    /// Import a chain previously exported with [`Chain::to_json`].
    ///
    /// The imported sequence is re-verified; a chain that fails
    /// verification is rejected rather than adopted.
    pub fn from_json(json: &str) -> Result<Self> {
        let blocks: Vec<Block> = serde_json::from_str(json)?;
        if blocks.is_empty() {
            return Err(Error::EmptyChain);
        }

        let chain = Self {
            blocks,
            clock: SystemClock,
            ids: UuidIds,
        };

        let verification = chain.verify();
        if !verification.valid {
            // block_id is always set on an invalid report; nil is unreachable
            return Err(Error::ChainIntegrityViolated(
                verification.block_id.unwrap_or(Uuid::nil()),
            ));
        }

        Ok(chain)
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, I> Chain<C, I>
where
    C: Clock,
    I: IdSource,
{
    /// Create a new chain with injected clock and id capabilities.
    pub fn with_capabilities(mut clock: C, mut ids: I) -> Self {
        let genesis = Block::new(ids.next_id(), None, clock.now(), GENESIS_PREVIOUS_HASH);
        debug!(block_id = %genesis.id, "seeded genesis block");

        Self {
            blocks: vec![genesis],
            clock,
            ids,
        }
    }

    /// Append a new block carrying `payload`.
    ///
    /// The block binds to the current tail via its hash and is stamped
    /// with the chain's clock.
    pub fn append(&mut self, payload: Payload) {
        let previous_hash = self.tail().hash.clone();
        let block = Block::new(
            self.ids.next_id(),
            Some(payload),
            self.clock.now(),
            previous_hash,
        );
        debug!(block_id = %block.id, height = self.blocks.len(), "appended block");
        self.blocks.push(block);
    }

    /// Verify the whole chain.
    ///
    /// Walks blocks 1..n in order. For each block the predecessor link is
    /// checked first, then the stored hash against a fresh recomputation;
    /// the first violation wins and the walk stops. The genesis block has
    /// no predecessor and its own hash is not re-checked.
    pub fn verify(&self) -> ChainVerification {
        for i in 1..self.blocks.len() {
            let current = &self.blocks[i];
            let previous = &self.blocks[i - 1];

            if current.previous_hash != previous.hash {
                warn!(block_id = %current.id, index = i, "chain link failure");
                return ChainVerification::violated(IntegrityIssue::LinkFailure, current.id);
            }

            if current.hash != current.compute_hash() {
                warn!(block_id = %current.id, index = i, "data tampering detected");
                return ChainVerification::violated(IntegrityIssue::Tampering, current.id);
            }
        }

        ChainVerification::ok()
    }

    /// Print every block's display rendering in chain order.
    pub fn print_all(&self) {
        for block in &self.blocks {
            println!("{block}");
        }
    }

    /// Number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// A chain is never empty; genesis is seeded at construction.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// All blocks in chain order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// The newest block.
    pub fn tail(&self) -> &Block {
        self.blocks
            .last()
            .expect("chain always contains the genesis block")
    }

    /// Mutable access to the blocks, for tamper experiments on a cloned
    /// chain. The slice cannot grow, shrink, or reorder, so the sequence
    /// stays append-only even through this hook.
    pub fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }

    /// Export the block sequence as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.blocks)?)
    }
}

/// Convenience for demo and test callers: build a [`Payload`] from a
/// `serde_json::json!` object literal.
pub fn payload_from_value(value: Value) -> Result<Payload> {
    Ok(serde_json::from_value(value)?)
}
