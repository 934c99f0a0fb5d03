use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

/// Memoizes values by key for a fixed time-to-live. Expired entries are
/// replaced on the next insert; nothing is invalidated early.
#[derive(Clone, Debug)]
pub struct TtlCache<V> {
    ttl: Duration,
    entries: HashMap<String, (Instant, V)>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let (stored_at, value) = self.entries.get(key)?;
        if now.saturating_duration_since(*stored_at) < self.ttl {
            Some(value.clone())
        } else {
            None
        }
    }

    pub fn insert(&mut self, key: &str, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    pub fn insert_at(&mut self, key: &str, value: V, now: Instant) {
        self.entries.insert(key.to_string(), (now, value));
    }

    /// Drops expired entries, returning how many were removed.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|_, (stored_at, _)| now.saturating_duration_since(*stored_at) < ttl);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
