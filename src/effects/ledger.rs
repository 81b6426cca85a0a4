//! Static effects present on a card or player.
//!
//! Applying a static effect records its value here under the instance
//! that applied it; unapplying removes exactly that record. Host code
//! holding only a card can ask "does this card have `blank`?" without
//! going through the engine.

use super::definition::{EffectKey, EffectValue};
use super::instance::EffectInstanceId;

/// One applied static effect.
#[derive(Clone, Debug)]
pub struct LedgerEntry {
    pub instance: EffectInstanceId,
    pub key: EffectKey,
    pub value: EffectValue,
}

/// Applied static effects, in application order.
#[derive(Clone, Debug, Default)]
pub struct EffectLedger {
    entries: Vec<LedgerEntry>,
}

impl EffectLedger {
    /// Record a value applied by `instance`.
    pub fn push(&mut self, instance: EffectInstanceId, key: EffectKey, value: EffectValue) {
        self.entries.push(LedgerEntry { instance, key, value });
    }

    /// Remove the record of `instance`. Returns false if there was none.
    pub fn remove(&mut self, instance: EffectInstanceId) -> bool {
        match self.entries.iter().position(|e| e.instance == instance) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Values recorded under `key`.
    pub fn values(&self, key: EffectKey) -> impl Iterator<Item = &EffectValue> {
        self.entries
            .iter()
            .filter(move |e| e.key == key)
            .map(|e| &e.value)
    }

    /// Is any effect with `key` present?
    #[must_use]
    pub fn has(&self, key: EffectKey) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// All records, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_query() {
        let mut ledger = EffectLedger::default();
        ledger.push(EffectInstanceId(1), EffectKey::AddKeyword, EffectValue::Text("taunt".into()));
        ledger.push(EffectInstanceId(2), EffectKey::AddKeyword, EffectValue::Text("elusive".into()));
        ledger.push(EffectInstanceId(3), EffectKey::Blank, EffectValue::Flag);

        let keywords: Vec<_> = ledger
            .values(EffectKey::AddKeyword)
            .filter_map(|v| v.as_text())
            .collect();
        assert_eq!(keywords, vec!["taunt", "elusive"]);
        assert!(ledger.has(EffectKey::Blank));
        assert!(!ledger.has(EffectKey::AddHouse));
    }

    #[test]
    fn test_remove_only_own_record() {
        let mut ledger = EffectLedger::default();
        ledger.push(EffectInstanceId(1), EffectKey::AddHouse, EffectValue::Text("mars".into()));
        ledger.push(EffectInstanceId(2), EffectKey::AddHouse, EffectValue::Text("mars".into()));

        assert!(ledger.remove(EffectInstanceId(1)));
        assert!(!ledger.remove(EffectInstanceId(1)));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.iter().next().map(|e| e.instance), Some(EffectInstanceId(2)));
    }
}
