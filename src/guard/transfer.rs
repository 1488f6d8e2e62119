//! Moving cookies between the raw store and the buffer when a category's
//! blocked flag changes.

use time::OffsetDateTime;

use crate::base::guarderror::GuardError;
use crate::cookies::codec;
use crate::cookies::record::{removal_set_string, set_string_with_expiry};
use crate::guard::buffer::BufferedCookie;
use crate::guard::category::Category;
use crate::guard::proxy::CookieProxy;

impl CookieProxy {
    /// Set the blocked flag of `category_name` and relocate its cookies.
    ///
    /// Setting the flag to its current value does nothing, unless an earlier
    /// transfer left cookies of the category behind in the wrong store. Those
    /// are moved again, so retrying a failed toggle completes it.
    pub fn toggle(&self, category_name: &str, blocked: bool) -> Result<(), GuardError> {
        let category = self.registry.get(category_name)?;

        if category.set_blocked(blocked) == blocked {
            if !self.has_stranded(category, blocked) {
                tracing::debug!(category = %category_name, blocked, "category already in requested state");
                return Ok(());
            }
            tracing::info!(category = %category_name, blocked, "retrying incomplete cookie transfer");
        } else {
            tracing::info!(category = %category_name, blocked, "cookie category toggled");
        }

        if blocked {
            self.move_store_to_buffer(category)
        } else {
            self.move_buffer_to_store(category)
        }
    }

    /// Buffer every raw-store cookie owned by `category`, then expire it in
    /// the raw store.
    ///
    /// A cookie whose expiring write fails is taken back out of the buffer
    /// so it stays visible from the raw store.
    pub(crate) fn move_store_to_buffer(&self, category: &Category) -> Result<(), GuardError> {
        let expires = OffsetDateTime::now_utc() + self.default_expiration;
        let mut failed = Vec::new();
        let mut moved = 0usize;

        for (name, value) in codec::decode_cookies(&self.native.get()) {
            // Nameless cookies cannot be addressed by a set-string.
            if name.is_empty() {
                continue;
            }

            let owner = self.registry.find_for_cookie(&name);
            if owner.map(Category::name) != Some(category.name()) {
                continue;
            }

            let raw_set_string = set_string_with_expiry(&name, &value, expires);
            self.buffer.insert(BufferedCookie {
                name: name.clone(),
                value,
                expiration_time: Some(expires),
                raw_set_string,
                category: category.name().to_string(),
            });

            match self.native.set(&removal_set_string(&name)) {
                Ok(()) => moved += 1,
                Err(e) => {
                    tracing::warn!(name = %name, error = %e, "failed to expire cookie in raw store");
                    self.buffer.remove(&name);
                    failed.push(name);
                }
            }
        }

        tracing::debug!(category = %category.name(), moved, "moved cookies into buffer");
        incomplete(category, failed)
    }

    /// Replay every buffered cookie owned by `category` against the raw
    /// store and drop it from the buffer.
    ///
    /// A cookie whose replay fails stays buffered.
    pub(crate) fn move_buffer_to_store(&self, category: &Category) -> Result<(), GuardError> {
        let mut failed = Vec::new();
        let mut moved = 0usize;

        for cookie in self.buffer.cookies_in(category.name()) {
            match self.native.set(&cookie.raw_set_string) {
                Ok(()) => {
                    self.buffer.remove(&cookie.name);
                    moved += 1;
                }
                Err(e) => {
                    tracing::warn!(name = %cookie.name, error = %e, "failed to restore cookie to raw store");
                    failed.push(cookie.name);
                }
            }
        }

        tracing::debug!(category = %category.name(), moved, "moved cookies into raw store");
        incomplete(category, failed)
    }

    /// Whether cookies of `category` sit in the store its flag says they
    /// should have left.
    fn has_stranded(&self, category: &Category, blocked: bool) -> bool {
        if blocked {
            codec::decode_cookies(&self.native.get())
                .iter()
                .filter(|(name, _)| !name.is_empty())
                .any(|(name, _)| {
                    self.registry.find_for_cookie(name).map(Category::name) == Some(category.name())
                })
        } else {
            !self.buffer.cookies_in(category.name()).is_empty()
        }
    }

    /// Replay the whole buffer regardless of category flags.
    pub(crate) fn flush_all(&self) -> Result<(), GuardError> {
        let mut first_error = None;
        for category in self.registry.iter() {
            if let Err(e) = self.move_buffer_to_store(category) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

fn incomplete(category: &Category, failed: Vec<String>) -> Result<(), GuardError> {
    if failed.is_empty() {
        Ok(())
    } else {
        Err(GuardError::TransferIncomplete {
            category: category.name().to_string(),
            failed,
        })
    }
}
