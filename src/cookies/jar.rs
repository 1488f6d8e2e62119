use crate::base::guarderror::GuardError;
use crate::cookies::accessor::CookieAccessor;
use crate::cookies::codec;
use crate::cookies::record::CookieRecord;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use time::OffsetDateTime;

/// Maximum size of a single `name=value` pair (browser default).
pub const MAX_COOKIE_SIZE: usize = 4096;

/// Maximum cookies held by one jar before the oldest is evicted.
pub const MAX_COOKIES: usize = 180;

#[derive(Debug, Clone)]
struct StoredCookie {
    sequence: u64,
    record: CookieRecord,
}

/// In-memory raw cookie store with the semantics of a browser's
/// `document.cookie` for a single origin.
///
/// Cookies are keyed by name and read back in the order they were first
/// set. A set-string whose expiration is in the past deletes the cookie.
/// Clones share the same underlying store.
#[derive(Clone)]
pub struct MemoryCookieJar {
    store: Arc<DashMap<String, StoredCookie>>,
    next_sequence: Arc<AtomicU64>,
}

impl Default for MemoryCookieJar {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            next_sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Parse a set-string and apply it to the jar.
    ///
    /// Unparseable set-strings are ignored like browsers do.
    pub fn set_cookie(&self, set_string: &str) -> Result<(), GuardError> {
        let record = match CookieRecord::parse(set_string) {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!(error = %e, "ignoring unparseable set-string");
                return Ok(());
            }
        };

        let size = record.name.len() + record.value.len();
        if size > MAX_COOKIE_SIZE {
            return Err(GuardError::CookieTooLarge {
                name: record.name,
                size,
                limit: MAX_COOKIE_SIZE,
            });
        }

        if record.is_expired(OffsetDateTime::now_utc()) {
            self.store.remove(&record.name);
            return Ok(());
        }

        self.set_record(record);
        Ok(())
    }

    /// Store a record, replacing any cookie with the same name.
    ///
    /// A replaced cookie keeps its position in the read order.
    pub fn set_record(&self, record: CookieRecord) {
        let sequence = match self.store.get(&record.name) {
            Some(existing) => existing.sequence,
            None => self.next_sequence.fetch_add(1, Ordering::Relaxed),
        };

        self.store
            .insert(record.name.clone(), StoredCookie { sequence, record });

        self.enforce_limit();
    }

    /// Evict the oldest cookies until the jar is within [`MAX_COOKIES`].
    fn enforce_limit(&self) {
        while self.store.len() > MAX_COOKIES {
            let oldest = self
                .store
                .iter()
                .min_by_key(|entry| entry.value().sequence)
                .map(|entry| entry.key().clone());

            match oldest {
                Some(name) => {
                    tracing::debug!(name = %name, "evicting oldest cookie");
                    self.store.remove(&name);
                }
                None => break,
            }
        }
    }

    /// Live cookies in read order. Expired cookies are skipped.
    pub fn cookies(&self) -> Vec<CookieRecord> {
        let now = OffsetDateTime::now_utc();
        let mut live: Vec<StoredCookie> = self
            .store
            .iter()
            .filter(|entry| !entry.value().record.is_expired(now))
            .map(|entry| entry.value().clone())
            .collect();

        live.sort_by_key(|c| c.sequence);
        live.into_iter().map(|c| c.record).collect()
    }

    pub fn get_cookie(&self, name: &str) -> Option<CookieRecord> {
        let now = OffsetDateTime::now_utc();
        self.store
            .get(name)
            .map(|entry| entry.value().record.clone())
            .filter(|record| !record.is_expired(now))
    }

    /// Get total cookie count, including expired cookies not yet overwritten.
    pub fn total_cookie_count(&self) -> usize {
        self.store.len()
    }
}

impl CookieAccessor for MemoryCookieJar {
    fn get(&self) -> String {
        let cookies = self.cookies();
        codec::encode_cookies(
            cookies
                .iter()
                .map(|c| (c.name.as_str(), c.value.as_str())),
        )
    }

    fn set(&self, set_string: &str) -> Result<(), GuardError> {
        self.set_cookie(set_string)
    }
}
