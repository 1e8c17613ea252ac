//! Calculation history ledger
//!
//! Completed calculations are kept oldest-first and written through to a
//! [`KeyValueStore`] after every mutation as a JSON array of display lines.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::format::{number_to_string, to_fixed, HISTORY_DECIMALS};
use crate::core::{CalcError, CalcResult, Operation};
use crate::store::{KeyValueStore, StoreError};

/// A single completed calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Left-hand operand
    pub operand1: f64,
    /// The operator applied
    pub operator: Operation,
    /// Right-hand operand
    pub operand2: f64,
    /// The result of the calculation
    pub result: f64,
}

impl HistoryEntry {
    /// Creates a new history entry
    #[must_use]
    pub fn new(operand1: f64, operator: Operation, operand2: f64, result: f64) -> Self {
        Self {
            operand1,
            operator,
            operand2,
            result,
        }
    }

    /// Returns the display line, e.g. `5 + 3 = 8.0000`
    #[must_use]
    pub fn line(&self) -> String {
        format!(
            "{} {} {} = {}",
            number_to_string(self.operand1),
            self.operator,
            number_to_string(self.operand2),
            to_fixed(self.result, HISTORY_DECIMALS)
        )
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line())
    }
}

impl FromStr for HistoryEntry {
    type Err = CalcError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let malformed = || CalcError::MalformedHistory(line.to_string());

        let (lhs, rhs) = line.split_once(" = ").ok_or_else(malformed)?;
        let mut parts = lhs.split_whitespace();
        let (Some(a), Some(op), Some(b), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };

        Ok(Self {
            operand1: a.parse().map_err(|_| malformed())?,
            operator: Operation::from_symbol(op).ok_or_else(malformed)?,
            operand2: b.parse().map_err(|_| malformed())?,
            result: rhs.trim().parse().map_err(|_| malformed())?,
        })
    }
}

/// Serializes entries into the persisted payload
pub fn encode_history(entries: &[HistoryEntry]) -> String {
    let lines: Vec<String> = entries.iter().map(HistoryEntry::line).collect();
    serde_json::to_string(&lines).unwrap_or_else(|_| "[]".to_string())
}

/// Parses the persisted payload. Any malformed line rejects the whole payload.
pub fn decode_history(payload: &str) -> CalcResult<Vec<HistoryEntry>> {
    let lines: Vec<String> = serde_json::from_str(payload)
        .map_err(|e| CalcError::MalformedHistory(e.to_string()))?;
    lines.iter().map(|line| line.parse()).collect()
}

/// Calculator history ledger
///
/// Owns its store; every mutation is flushed immediately. Storage failures
/// are logged and never interrupt a mutation; the most recent one is kept
/// for [`Ledger::take_write_error`].
#[derive(Debug)]
pub struct Ledger<S> {
    /// Entries, oldest first
    entries: Vec<HistoryEntry>,
    /// Persistent backing store
    store: S,
    /// Storage key for the payload
    key: String,
    /// Maximum number of entries to keep (oldest dropped first)
    limit: Option<usize>,
    /// Most recent failed write, if not yet taken
    write_error: Option<StoreError>,
}

impl<S: KeyValueStore> Ledger<S> {
    /// Loads the ledger stored under `key`.
    ///
    /// Absent, empty or malformed data yields an empty ledger.
    pub fn load(store: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let entries = match store.get(&key) {
            Ok(Some(payload)) if !payload.trim().is_empty() => match decode_history(&payload) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "ignoring malformed history");
                    Vec::new()
                }
            },
            Ok(_) => Vec::new(),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "history store unreadable");
                Vec::new()
            }
        };
        tracing::debug!(key = %key, entries = entries.len(), "history loaded");

        Self {
            entries,
            store,
            key,
            limit: None,
            write_error: None,
        }
    }

    /// Caps the ledger at `limit` entries, trimming the oldest right away
    #[must_use]
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        if self.trim_to_limit() {
            self.persist();
        }
        self
    }

    /// Appends a completed calculation and persists
    pub fn append(&mut self, entry: HistoryEntry) {
        tracing::info!(entry = %entry, "history append");
        self.entries.push(entry);
        self.trim_to_limit();
        self.persist();
    }

    /// Removes the entry at `index` (0 = oldest) and persists.
    ///
    /// Out-of-range indices are ignored.
    pub fn delete(&mut self, index: usize) -> Option<HistoryEntry> {
        if index >= self.entries.len() {
            tracing::debug!(index, len = self.entries.len(), "history delete out of range");
            return None;
        }
        let removed = self.entries.remove(index);
        tracing::info!(index, entry = %removed, "history delete");
        self.persist();
        Some(removed)
    }

    /// Removes every entry and persists the empty ledger
    pub fn clear(&mut self) {
        tracing::info!(removed = self.entries.len(), "history clear");
        self.entries.clear();
        self.persist();
    }

    /// Returns the entries, oldest first
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Returns the number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the ledger is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry at the given index (0 = oldest)
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// Returns the most recent entry
    #[must_use]
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Returns `(storage index, entry)` pairs, newest first
    pub fn iter_rev(&self) -> impl Iterator<Item = (usize, &HistoryEntry)> {
        self.entries.iter().enumerate().rev()
    }

    /// Returns the display lines, oldest first
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(HistoryEntry::line).collect()
    }

    /// Returns the storage key
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the configured entry cap
    #[must_use]
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Returns the backing store
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the last failed write since the previous call, clearing it
    pub fn take_write_error(&mut self) -> Option<StoreError> {
        self.write_error.take()
    }

    fn trim_to_limit(&mut self) -> bool {
        match self.limit {
            Some(limit) if self.entries.len() > limit => {
                let excess = self.entries.len() - limit;
                self.entries.drain(..excess);
                true
            }
            _ => false,
        }
    }

    fn persist(&mut self) {
        let payload = encode_history(&self.entries);
        if let Err(e) = self.store.set(&self.key, &payload) {
            tracing::warn!(key = %self.key, error = %e, "failed to persist history");
            self.write_error = Some(e);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreResult};

    const KEY: &str = "calculatorHistory";

    fn entry(a: f64, op: Operation, b: f64) -> HistoryEntry {
        HistoryEntry::new(a, op, b, op.apply(a, b).unwrap())
    }

    fn empty_ledger() -> Ledger<MemoryStore> {
        Ledger::load(MemoryStore::new(), KEY)
    }

    /// Store whose writes always fail
    #[derive(Debug, Default)]
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> StoreResult<Option<String>> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> StoreResult<()> {
            Err(StoreError::unavailable("read-only"))
        }
    }

    // ===== HistoryEntry tests =====

    #[test]
    fn test_history_entry_line() {
        let e = entry(5.0, Operation::Add, 3.0);
        assert_eq!(e.line(), "5 + 3 = 8.0000");
        assert_eq!(e.to_string(), "5 + 3 = 8.0000");
    }

    #[test]
    fn test_history_entry_line_negative_and_fraction() {
        let e = entry(-1.5, Operation::Divide, 4.0);
        assert_eq!(e.line(), "-1.5 / 4 = -0.3750");
    }

    #[test]
    fn test_history_entry_line_rounds_result() {
        let e = entry(1.0, Operation::Divide, 3.0);
        assert_eq!(e.line(), "1 / 3 = 0.3333");
    }

    #[test]
    fn test_history_entry_parse() {
        let e: HistoryEntry = "-2 - -3 = 1.0000".parse().unwrap();
        assert_eq!(e.operand1, -2.0);
        assert_eq!(e.operator, Operation::Subtract);
        assert_eq!(e.operand2, -3.0);
        assert_eq!(e.result, 1.0);
    }

    #[test]
    fn test_history_entry_parse_reproduces_line() {
        for line in ["5 + 3 = 8.0000", "1e+21 * 2 = 2e+21", "0.1 + 0.2 = 0.3000"] {
            let parsed: HistoryEntry = line.parse().unwrap();
            assert_eq!(parsed.line(), line);
        }
    }

    #[test]
    fn test_history_entry_parse_rejects_garbage() {
        for line in ["", "5 + 3", "5 ^ 3 = 125", "a + b = c", "1 + 2 + 3 = 6", "5 + = 5"] {
            assert!(matches!(
                line.parse::<HistoryEntry>(),
                Err(CalcError::MalformedHistory(_))
            ));
        }
    }

    // ===== Payload tests =====

    #[test]
    fn test_encode_history_is_json_array_of_strings() {
        let payload = encode_history(&[entry(2.0, Operation::Multiply, 3.0)]);
        assert_eq!(payload, r#"["2 * 3 = 6.0000"]"#);
    }

    #[test]
    fn test_decode_history_rejects_non_array() {
        assert!(decode_history(r#"{"a":1}"#).is_err());
        assert!(decode_history("[1, 2]").is_err());
        assert!(decode_history("garbage").is_err());
    }

    // ===== Ledger tests =====

    #[test]
    fn test_ledger_load_absent() {
        let ledger = empty_ledger();
        assert!(ledger.is_empty());
        assert_eq!(ledger.key(), KEY);
    }

    #[test]
    fn test_ledger_load_existing() {
        let store = MemoryStore::with_value(KEY, r#"["1 + 1 = 2.0000","2 * 4 = 8.0000"]"#);
        let ledger = Ledger::load(store, KEY);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.get(0).unwrap().result, 2.0);
        assert_eq!(ledger.last().unwrap().operator, Operation::Multiply);
    }

    #[test]
    fn test_ledger_load_empty_string() {
        let ledger = Ledger::load(MemoryStore::with_value(KEY, ""), KEY);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_ledger_load_malformed_json() {
        let ledger = Ledger::load(MemoryStore::with_value(KEY, "{not json"), KEY);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_ledger_load_malformed_line() {
        let store = MemoryStore::with_value(KEY, r#"["1 + 1 = 2.0000","oops"]"#);
        assert!(Ledger::load(store, KEY).is_empty());
    }

    #[test]
    fn test_ledger_append_persists() {
        let mut ledger = empty_ledger();
        ledger.append(entry(5.0, Operation::Add, 3.0));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.store().raw(KEY), Some(r#"["5 + 3 = 8.0000"]"#));
    }

    #[test]
    fn test_ledger_delete() {
        let mut ledger = empty_ledger();
        ledger.append(entry(1.0, Operation::Add, 1.0));
        ledger.append(entry(2.0, Operation::Add, 2.0));
        ledger.append(entry(3.0, Operation::Add, 3.0));

        let removed = ledger.delete(1).unwrap();
        assert_eq!(removed.result, 4.0);
        assert_eq!(ledger.lines(), vec!["1 + 1 = 2.0000", "3 + 3 = 6.0000"]);
        assert_eq!(
            ledger.store().raw(KEY),
            Some(r#"["1 + 1 = 2.0000","3 + 3 = 6.0000"]"#)
        );
    }

    #[test]
    fn test_ledger_delete_out_of_bounds_is_noop() {
        let mut ledger = empty_ledger();
        ledger.append(entry(1.0, Operation::Add, 1.0));
        let before = ledger.store().clone();

        assert!(ledger.delete(1).is_none());
        assert!(ledger.delete(usize::MAX).is_none());
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.store(), &before);
    }

    #[test]
    fn test_ledger_delete_on_empty_is_noop() {
        let mut ledger = empty_ledger();
        assert!(ledger.delete(0).is_none());
        assert_eq!(ledger.store().raw(KEY), None);
    }

    #[test]
    fn test_ledger_append_then_delete_restores() {
        let mut ledger = empty_ledger();
        ledger.append(entry(1.0, Operation::Add, 1.0));
        let before = ledger.entries().to_vec();

        ledger.append(entry(9.0, Operation::Subtract, 4.0));
        ledger.delete(ledger.len() - 1);
        assert_eq!(ledger.entries(), before.as_slice());
    }

    #[test]
    fn test_ledger_clear_persists_empty() {
        let mut ledger = empty_ledger();
        ledger.append(entry(1.0, Operation::Add, 1.0));
        ledger.clear();
        assert!(ledger.is_empty());
        assert_eq!(ledger.store().raw(KEY), Some("[]"));
    }

    #[test]
    fn test_ledger_iter_rev_keeps_storage_indices() {
        let mut ledger = empty_ledger();
        ledger.append(entry(1.0, Operation::Add, 1.0));
        ledger.append(entry(2.0, Operation::Add, 2.0));

        let indexed: Vec<(usize, f64)> = ledger.iter_rev().map(|(i, e)| (i, e.result)).collect();
        assert_eq!(indexed, vec![(1, 4.0), (0, 2.0)]);
    }

    #[test]
    fn test_ledger_limit_drops_oldest() {
        let mut ledger = empty_ledger().with_limit(Some(2));
        ledger.append(entry(1.0, Operation::Add, 1.0));
        ledger.append(entry(2.0, Operation::Add, 2.0));
        ledger.append(entry(3.0, Operation::Add, 3.0));

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.get(0).unwrap().result, 4.0);
        assert_eq!(ledger.limit(), Some(2));
    }

    #[test]
    fn test_ledger_limit_trims_loaded_history() {
        let store = MemoryStore::with_value(
            KEY,
            r#"["1 + 1 = 2.0000","2 + 2 = 4.0000","3 + 3 = 6.0000"]"#,
        );
        let ledger = Ledger::load(store, KEY).with_limit(Some(1));
        assert_eq!(ledger.lines(), vec!["3 + 3 = 6.0000"]);
        assert_eq!(ledger.store().raw(KEY), Some(r#"["3 + 3 = 6.0000"]"#));
    }

    #[test]
    fn test_ledger_survives_write_failures() {
        let mut ledger = Ledger::load(ReadOnlyStore, KEY);
        ledger.append(entry(1.0, Operation::Add, 1.0));
        assert_eq!(ledger.len(), 1);
        ledger.clear();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_ledger_keeps_last_write_error() {
        let mut ledger = Ledger::load(ReadOnlyStore, KEY);
        assert!(ledger.take_write_error().is_none());

        ledger.append(entry(1.0, Operation::Add, 1.0));
        let err = ledger.take_write_error().unwrap();
        assert!(matches!(err, StoreError::Unavailable { .. }));
        assert!(ledger.take_write_error().is_none());
    }

    #[test]
    fn test_ledger_successful_writes_leave_no_error() {
        let mut ledger = empty_ledger();
        ledger.append(entry(2.0, Operation::Multiply, 3.0));
        ledger.clear();
        assert!(ledger.take_write_error().is_none());
    }

    #[test]
    fn test_ledger_reload_round_trip() {
        let mut ledger = empty_ledger();
        ledger.append(entry(0.5, Operation::Multiply, 4.0));
        ledger.append(entry(10.0, Operation::Divide, 4.0));

        let reloaded = Ledger::load(ledger.store().clone(), KEY);
        assert_eq!(reloaded.lines(), ledger.lines());
    }
}
