//! Common types and capabilities used across provchain modules.

use std::collections::BTreeMap;

use uuid::Uuid;

/// Block payload: a key-ordered mapping of string keys to JSON values.
///
/// `BTreeMap` keeps top-level keys sorted; nested objects inside
/// [`serde_json::Value`] are sorted as well (the `preserve_order` feature
/// of serde_json is not enabled), so a payload always serializes to the
/// same canonical text regardless of insertion order.
pub type Payload = BTreeMap<String, serde_json::Value>;

/// Clock capability: supplies block creation times as epoch seconds.
///
/// Injected into [`crate::ledger::Chain`] so tests can run against a
/// deterministic clock instead of ambient system time.
pub trait Clock {
    /// Current time in floating-point seconds since the Unix epoch.
    fn now(&mut self) -> f64;
}

/// Identifier capability: supplies a fresh unique id per block.
pub trait IdSource {
    /// Next block identifier. Must be practically collision-free across
    /// the process lifetime.
    fn next_id(&mut self) -> Uuid;
}

/// Production clock backed by the system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&mut self) -> f64 {
        chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
    }
}

/// Production id source backed by random (v4) UUIDs.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIds;

impl IdSource for UuidIds {
    fn next_id(&mut self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic clock for tests: starts at a given instant and advances
/// by a fixed step on every reading.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: f64,
    step: f64,
}

impl ManualClock {
    /// Clock frozen at `now`; every reading returns the same instant.
    pub fn fixed(now: f64) -> Self {
        Self { now, step: 0.0 }
    }

    /// Clock starting at `start`, advancing by `step` seconds per reading.
    pub fn stepping(start: f64, step: f64) -> Self {
        Self { now: start, step }
    }
}

impl Clock for ManualClock {
    fn now(&mut self) -> f64 {
        let now = self.now;
        self.now += self.step;
        now
    }
}

/// Deterministic id source for tests: ids 1, 2, 3, ... encoded as UUIDs.
#[derive(Clone, Debug, Default)]
pub struct SequentialIds {
    next: u128,
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> Uuid {
        self.next += 1;
        Uuid::from_u128(self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_fixed() {
        let mut clock = ManualClock::fixed(1_700_000_000.5);
        assert_eq!(clock.now(), 1_700_000_000.5);
        assert_eq!(clock.now(), 1_700_000_000.5);
    }

    #[test]
    fn test_manual_clock_stepping() {
        let mut clock = ManualClock::stepping(10.0, 2.5);
        assert_eq!(clock.now(), 10.0);
        assert_eq!(clock.now(), 12.5);
        assert_eq!(clock.now(), 15.0);
    }

    #[test]
    fn test_sequential_ids_unique() {
        let mut ids = SequentialIds::default();
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
        assert_eq!(a, Uuid::from_u128(1));
        assert_eq!(b, Uuid::from_u128(2));
    }

    #[test]
    fn test_system_clock_is_recent() {
        let mut clock = SystemClock;
        // 2023-01-01 as a sanity lower bound
        assert!(clock.now() > 1_672_531_200.0);
    }
}
