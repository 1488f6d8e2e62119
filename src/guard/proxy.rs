use std::sync::Arc;
use time::{Duration, OffsetDateTime};

use crate::base::guarderror::GuardError;
use crate::cookies::accessor::CookieAccessor;
use crate::cookies::codec;
use crate::cookies::record::CookieRecord;
use crate::guard::buffer::{BufferStore, BufferedCookie};
use crate::guard::category::CategoryRegistry;

/// The accessor installed in place of the native one.
///
/// Reads merge the raw store with the buffer. Writes for cookies of a
/// blocked category go to the buffer; everything else passes through.
pub struct CookieProxy {
    pub(crate) native: Arc<dyn CookieAccessor>,
    pub(crate) registry: CategoryRegistry,
    pub(crate) buffer: BufferStore,
    pub(crate) default_expiration: Duration,
}

impl CookieProxy {
    pub fn new(
        native: Arc<dyn CookieAccessor>,
        registry: CategoryRegistry,
        default_expiration: Duration,
    ) -> Self {
        Self {
            native,
            registry,
            buffer: BufferStore::new(),
            default_expiration,
        }
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub fn buffer(&self) -> &BufferStore {
        &self.buffer
    }

    /// The raw store read directly, without the buffer overlay.
    pub fn native_cookies(&self) -> String {
        self.native.get()
    }
}

/// Insert or overwrite `name` in an ordered name/value list.
fn upsert(merged: &mut Vec<(String, String)>, name: String, value: String) {
    match merged.iter_mut().find(|(n, _)| *n == name) {
        Some(entry) => entry.1 = value,
        None => merged.push((name, value)),
    }
}

impl CookieAccessor for CookieProxy {
    fn get(&self) -> String {
        if self.buffer.is_empty() {
            return self.native.get();
        }

        let mut merged: Vec<(String, String)> = Vec::new();
        for (name, value) in codec::decode_cookies(&self.native.get()) {
            upsert(&mut merged, name, value);
        }

        for cookie in self.buffer.live_cookies(OffsetDateTime::now_utc()) {
            upsert(&mut merged, cookie.name, cookie.value);
        }

        codec::encode_cookies(merged.iter().map(|(n, v)| (n.as_str(), v.as_str())))
    }

    fn set(&self, set_string: &str) -> Result<(), GuardError> {
        let record = match CookieRecord::parse(set_string) {
            Ok(record) => record,
            Err(e) => {
                // No category can claim a cookie without a name.
                tracing::debug!(error = %e, "passing unparseable set-string through");
                return self.native.set(set_string);
            }
        };

        match self.registry.find_for_cookie(&record.name) {
            Some(category) if category.is_blocked() => {
                tracing::debug!(
                    name = %record.name,
                    category = %category.name(),
                    "diverting cookie write to buffer"
                );
                let category = category.name().to_string();
                self.buffer.insert(BufferedCookie::from_record(record, category));
                Ok(())
            }
            _ => {
                tracing::debug!(name = %record.name, "passing cookie write through");
                self.native.set(set_string)?;
                // Left over from a failed unblock; the raw store now wins.
                if self.buffer.remove(&record.name).is_some() {
                    tracing::debug!(name = %record.name, "dropped stale buffered cookie");
                }
                Ok(())
            }
        }
    }
}
