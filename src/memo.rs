//! Single-slot parse memo.
//!
//! During fit, adjacent URL pairs are processed in sorted order, so each
//! page is the "later" member of one pair and the "earlier" member of the
//! next. A cache holding just the most recently parsed page is therefore
//! enough to avoid parsing every page twice. The memo is scoped to one
//! worker's chunk of pairs; pages at chunk boundaries are parsed once extra,
//! which is an accepted trade-off, not a bug.
//!
//! The memo is correctness-neutral: a miss just means a re-parse.

use std::borrow::Borrow;

/// A bounded most-recently-used cache with capacity 1.
#[derive(Debug, Default)]
pub struct MemoSlot<K, V> {
    slot: Option<(K, V)>,
}

impl<K: Eq, V> MemoSlot<K, V> {
    /// Creates an empty memo.
    #[must_use]
    pub fn new() -> Self {
        Self { slot: None }
    }

    /// Removes and returns the cached value if it is keyed by `key`.
    pub fn take<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        if self.slot.as_ref().is_some_and(|(k, _)| k.borrow() == key) {
            self.slot.take().map(|(_, v)| v)
        } else {
            None
        }
    }

    /// Stores `value` under `key`, evicting whatever was held before.
    pub fn insert(&mut self, key: K, value: V) {
        self.slot = Some((key, value));
    }

    /// Drops the cached entry, if any.
    pub fn invalidate(&mut self) {
        self.slot = None;
    }
}
