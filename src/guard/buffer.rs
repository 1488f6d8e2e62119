use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;

use crate::cookies::record::CookieRecord;

/// A cookie held back from the raw store while its category is blocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferedCookie {
    pub name: String,
    pub value: String,
    pub expiration_time: Option<OffsetDateTime>,
    /// Replayed verbatim against the raw store when the category is unblocked.
    pub raw_set_string: String,
    /// The category whose matcher claimed `name` when it was buffered.
    pub category: String,
}

impl BufferedCookie {
    pub fn from_record(record: CookieRecord, category: impl Into<String>) -> Self {
        Self {
            name: record.name,
            value: record.value,
            expiration_time: record.expiration_time,
            raw_set_string: record.raw,
            category: category.into(),
        }
    }

    pub fn is_expired(&self, current_time: OffsetDateTime) -> bool {
        if let Some(expiry) = self.expiration_time {
            expiry < current_time
        } else {
            false
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    sequence: u64,
    cookie: BufferedCookie,
}

/// Name-keyed store of buffered cookies. The last write for a name wins.
///
/// Expired cookies stay in the store; readers filter them with
/// [`BufferStore::live_cookies`].
#[derive(Debug, Default)]
pub struct BufferStore {
    entries: DashMap<String, Entry>,
    next_sequence: AtomicU64,
}

impl BufferStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. An overwritten cookie keeps its read position.
    pub fn insert(&self, cookie: BufferedCookie) {
        let sequence = match self.entries.get(&cookie.name) {
            Some(existing) => existing.sequence,
            None => self.next_sequence.fetch_add(1, Ordering::Relaxed),
        };

        self.entries
            .insert(cookie.name.clone(), Entry { sequence, cookie });
    }

    pub fn get(&self, name: &str) -> Option<BufferedCookie> {
        self.entries.get(name).map(|e| e.value().cookie.clone())
    }

    pub fn remove(&self, name: &str) -> Option<BufferedCookie> {
        self.entries.remove(name).map(|(_, e)| e.cookie)
    }

    /// Non-expired cookies in insertion order.
    pub fn live_cookies(&self, now: OffsetDateTime) -> Vec<BufferedCookie> {
        self.sorted(|c| !c.is_expired(now))
    }

    /// Every cookie owned by `category`, expired or not, in insertion order.
    pub fn cookies_in(&self, category: &str) -> Vec<BufferedCookie> {
        self.sorted(|c| c.category == category)
    }

    fn sorted(&self, keep: impl Fn(&BufferedCookie) -> bool) -> Vec<BufferedCookie> {
        let mut entries: Vec<Entry> = self
            .entries
            .iter()
            .filter(|e| keep(&e.value().cookie))
            .map(|e| e.value().clone())
            .collect();

        entries.sort_by_key(|e| e.sequence);
        entries.into_iter().map(|e| e.cookie).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every buffered cookie, returning how many were dropped.
    pub fn clear(&self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }
}
