//! Provenance block structure.
//!
//! Content-addressed, immutable-after-construction records for the audit
//! trail. A block does not enforce chain linkage itself; that is the
//! chain layer's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::core::types::Payload;

/// Sentinel predecessor reference carried by the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// An immutable block in the provenance chain.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Block {
    /// Unique identifier, used for reporting which block failed a check
    pub id: Uuid,
    /// Recorded event; `None` marks the genesis block
    pub payload: Option<Payload>,
    /// Creation time, floating-point seconds since the Unix epoch
    pub timestamp: f64,
    /// Hex hash of the predecessor block, `"0"` for genesis
    pub previous_hash: String,
    /// Content hash of this block, computed once at construction
    pub hash: String,
}

impl Block {
    /// Create a new block and seal it with its content hash.
    ///
    /// `previous_hash` is stored verbatim; no format validation is
    /// performed here.
    pub fn new(
        id: Uuid,
        payload: Option<Payload>,
        timestamp: f64,
        previous_hash: impl Into<String>,
    ) -> Self {
        let mut block = Self {
            id,
            payload,
            timestamp,
            previous_hash: previous_hash.into(),
            hash: String::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// Compute the content hash (SHA-256, lowercase hex).
    ///
    /// Covers every field except `hash` itself. The field set is encoded
    /// as a compact JSON object with lexicographically sorted keys, so the
    /// digest is identical for logically equal blocks regardless of how
    /// their payload maps were built.
    pub fn compute_hash(&self) -> String {
        let payload = match &self.payload {
            Some(map) => Value::Object(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()),
            None => Value::Null,
        };

        let mut fields = serde_json::Map::new();
        fields.insert("id".to_string(), Value::String(self.id.to_string()));
        fields.insert("payload".to_string(), payload);
        fields.insert(
            "previous_hash".to_string(),
            Value::String(self.previous_hash.clone()),
        );
        fields.insert("timestamp".to_string(), Value::from(self.timestamp));

        let encoded = Value::Object(fields).to_string();
        hex::encode(Sha256::digest(encoded.as_bytes()))
    }

    /// Human-oriented multi-line rendering: id, UTC time, hash, payload.
    ///
    /// Diagnostic convenience only; no integrity logic reads this.
    pub fn to_display_string(&self) -> String {
        let payload = match &self.payload {
            Some(map) => serde_json::to_string_pretty(map)
                .unwrap_or_else(|_| "<unrenderable payload>".to_string()),
            None => "Genesis Block".to_string(),
        };

        format!(
            "#{} - {} - [{}]\n{}",
            self.id,
            format_utc(self.timestamp),
            self.hash,
            payload
        )
    }
}

impl std::fmt::Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

/// Render epoch seconds as a UTC date-time with fractional seconds.
fn format_utc(timestamp: f64) -> String {
    let mut secs = timestamp.trunc() as i64;
    let mut nanos = (timestamp.fract() * 1_000_000_000.0).round() as u32;
    if nanos >= 1_000_000_000 {
        secs += 1;
        nanos = 0;
    }

    match DateTime::<Utc>::from_timestamp(secs, nanos) {
        Some(when) => when.format("%Y-%m-%d %H:%M:%S%.6f UTC").to_string(),
        None => format!("{timestamp} (epoch seconds)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload() -> Payload {
        let mut payload = Payload::new();
        payload.insert("action".to_string(), json!("extract"));
        payload.insert("asset_id".to_string(), json!("1000"));
        payload.insert("amount".to_string(), json!("100kg"));
        payload
    }

    #[test]
    fn test_block_creation() {
        let id = Uuid::from_u128(7);
        let block = Block::new(id, Some(sample_payload()), 1_700_000_000.25, "abc123");

        assert_eq!(block.id, id);
        assert_eq!(block.payload, Some(sample_payload()));
        assert_eq!(block.timestamp, 1_700_000_000.25);
        assert_eq!(block.previous_hash, "abc123");
        assert!(!block.hash.is_empty());
    }

    #[test]
    fn test_hash_is_lowercase_hex_sha256() {
        let block = Block::new(Uuid::from_u128(1), None, 0.0, GENESIS_PREVIOUS_HASH);

        assert_eq!(block.hash.len(), 64);
        assert!(block
            .hash
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_hash_deterministic() {
        let block = Block::new(
            Uuid::from_u128(2),
            Some(sample_payload()),
            1_700_000_000.0,
            "0",
        );

        assert_eq!(block.compute_hash(), block.compute_hash());
        assert_eq!(block.hash, block.compute_hash());
    }

    #[test]
    fn test_hash_excludes_hash_field() {
        let mut block = Block::new(
            Uuid::from_u128(3),
            Some(sample_payload()),
            1_700_000_000.0,
            "0",
        );
        let original = block.compute_hash();

        block.hash = "ffff".to_string();
        assert_eq!(block.compute_hash(), original);
    }

    #[test]
    fn test_hash_changes_on_field_mutation() {
        let pristine = Block::new(
            Uuid::from_u128(4),
            Some(sample_payload()),
            1_700_000_000.0,
            "0",
        );

        let mut tampered = pristine.clone();
        tampered
            .payload
            .as_mut()
            .unwrap()
            .insert("amount".to_string(), json!("1000kg"));
        assert_ne!(tampered.compute_hash(), pristine.hash);

        let mut tampered = pristine.clone();
        tampered.timestamp += 1.0;
        assert_ne!(tampered.compute_hash(), pristine.hash);

        let mut tampered = pristine.clone();
        tampered.previous_hash = "abc123".to_string();
        assert_ne!(tampered.compute_hash(), pristine.hash);
    }

    #[test]
    fn test_hash_canonical_regardless_of_insertion_order() {
        let mut forward = Payload::new();
        forward.insert("action".to_string(), json!("transfer"));
        forward.insert("asset_id".to_string(), json!("1000"));
        forward.insert("destination".to_string(), json!("Storage Facility #11"));

        let mut reversed = Payload::new();
        reversed.insert("destination".to_string(), json!("Storage Facility #11"));
        reversed.insert("asset_id".to_string(), json!("1000"));
        reversed.insert("action".to_string(), json!("transfer"));

        let a = Block::new(Uuid::from_u128(5), Some(forward), 42.0, "0");
        let b = Block::new(Uuid::from_u128(5), Some(reversed), 42.0, "0");

        assert_eq!(a.hash, b.hash);
    }

    #[test]
    fn test_hash_covers_nested_payload_values() {
        let mut payload = Payload::new();
        payload.insert(
            "custody".to_string(),
            json!({"holder": "Mine #45", "witnesses": ["a", "b"]}),
        );
        let pristine = Block::new(Uuid::from_u128(6), Some(payload), 42.0, "0");

        let mut tampered = pristine.clone();
        tampered.payload.as_mut().unwrap().insert(
            "custody".to_string(),
            json!({"holder": "Mine #45", "witnesses": ["a", "c"]}),
        );

        assert_ne!(tampered.compute_hash(), pristine.hash);
    }

    #[test]
    fn test_display_genesis() {
        let block = Block::new(Uuid::from_u128(8), None, 1_700_000_000.5, "0");
        let rendered = block.to_display_string();

        assert!(rendered.contains(&block.id.to_string()));
        assert!(rendered.contains(&block.hash));
        assert!(rendered.contains("Genesis Block"));
        assert!(rendered.contains("UTC"));
    }

    #[test]
    fn test_display_payload_pretty_printed() {
        let block = Block::new(
            Uuid::from_u128(9),
            Some(sample_payload()),
            1_700_000_000.0,
            "0",
        );
        let rendered = block.to_display_string();

        assert!(rendered.contains("\"action\": \"extract\""));
        assert!(!rendered.contains("Genesis Block"));
    }

    #[test]
    fn test_format_utc() {
        assert_eq!(format_utc(0.0), "1970-01-01 00:00:00.000000 UTC");
        assert_eq!(format_utc(1.5), "1970-01-01 00:00:01.500000 UTC");
    }

    #[test]
    fn test_block_serde_round_trip() {
        let block = Block::new(
            Uuid::from_u128(10),
            Some(sample_payload()),
            1_700_000_000.0,
            "0",
        );

        let json = serde_json::to_string(&block).unwrap();
        let parsed: Block = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.id, block.id);
        assert_eq!(parsed.hash, block.hash);
        assert_eq!(parsed.compute_hash(), block.hash);
    }
}
