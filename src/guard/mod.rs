//! Category-based cookie blocking.
//!
//! A [`CookieGuard`] replaces a host's native cookie accessor with a
//! [`CookieProxy`](proxy::CookieProxy). Writes for cookies whose category is
//! blocked are held in an in-memory [`BufferStore`](buffer::BufferStore)
//! instead of reaching the raw store, and reads merge both so page code sees
//! every cookie it wrote.
//!
//! # Architecture
//!
//! | Type | Responsibility |
//! |------|----------------|
//! | [`CategoryRegistry`](category::CategoryRegistry) | Ordered categories, first match owns a name |
//! | [`BufferStore`](buffer::BufferStore) | Cookies held back from the raw store |
//! | [`CookieProxy`](proxy::CookieProxy) | Merged reads, diverted writes |
//! | [`transfer`] | Relocation of cookies when a flag flips |
//! | [`GuardConfig`](config::GuardConfig) | Categories and buffer expiration |
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use cookieguard::guard::{config::GuardConfig, CookieGuard};
//! use cookieguard::host::document::Document;
//!
//! let document = Arc::new(Document::new());
//! let config = GuardConfig::new()
//!     .category_pattern("analytics", "^analytics", true)?
//!     .category_pattern("ads", "^ads", true)?;
//! let guard = CookieGuard::install(document.clone(), config)?;
//!
//! document.set_cookie("analytics_x=1")?;
//! assert_eq!(document.cookie(), "analytics_x=1");
//! assert_eq!(document.jar().unwrap().total_cookie_count(), 0);
//!
//! guard.set_blocked("analytics", false)?;
//! assert_eq!(document.jar().unwrap().total_cookie_count(), 1);
//! # Ok::<(), cookieguard::base::guarderror::GuardError>(())
//! ```
//!
//! # Limitations
//!
//! The buffer lives only in memory. Cookies still buffered when the guard is
//! uninstalled or the process exits are lost.

pub mod buffer;
pub mod category;
pub mod config;
pub mod proxy;
pub mod transfer;

use std::sync::Arc;

use crate::base::guarderror::GuardError;
use crate::cookies::accessor::CookieAccessor;
use crate::guard::buffer::BufferedCookie;
use crate::guard::category::Category;
use crate::guard::config::{GuardConfig, ALL_COOKIES_CATEGORY};
use crate::guard::proxy::CookieProxy;
use crate::host::{validate_environment, CookieHost};

/// An installed cookie guard and its administrative surface.
///
/// At most one guard can be installed on a host at a time. Dropping the
/// handle without calling [`uninstall`](Self::uninstall) leaves the proxy
/// in place.
pub struct CookieGuard {
    host: Arc<dyn CookieHost>,
    proxy: Arc<CookieProxy>,
}

impl CookieGuard {
    /// Install a guard on `host`.
    ///
    /// Fails with a configuration error when the host has no cookie surface,
    /// blocks cookies, or already has an accessor installed, or when
    /// `config` has no categories. Cookies already in the raw store that
    /// belong to initially blocked categories are moved into the buffer.
    pub fn install<H: CookieHost + 'static>(
        host: Arc<H>,
        config: GuardConfig,
    ) -> Result<Self, GuardError> {
        let host: Arc<dyn CookieHost> = host;
        let native = validate_environment(host.as_ref())?;
        let (registry, default_expiration) = config.into_parts()?;

        let proxy = Arc::new(CookieProxy::new(native, registry, default_expiration));
        host.override_accessor(proxy.clone() as Arc<dyn CookieAccessor>)?;

        let guard = Self { host, proxy };
        if let Err(e) = guard.apply_initial_blocks() {
            tracing::warn!(error = %e, "initial block failed, uninstalling cookie guard");
            if let Err(err) = guard.host.restore_native() {
                tracing::warn!(error = %err, "failed to restore native cookie accessor");
            }
            if let Err(err) = guard.proxy.flush_all() {
                tracing::warn!(error = %err, "failed to flush cookie buffer");
            }
            return Err(e);
        }

        tracing::info!(
            categories = guard.proxy.registry().len(),
            "cookie guard installed"
        );
        Ok(guard)
    }

    fn apply_initial_blocks(&self) -> Result<(), GuardError> {
        for category in self.proxy.registry().iter() {
            if category.is_blocked() {
                self.proxy.move_store_to_buffer(category)?;
            }
        }
        Ok(())
    }

    /// Restore the native accessor. Buffered cookies are discarded and their
    /// count returned.
    pub fn uninstall(self) -> Result<usize, GuardError> {
        self.host.restore_native()?;

        let dropped = self.proxy.buffer().clear();
        if dropped > 0 {
            tracing::warn!(dropped, "discarding buffered cookies on uninstall");
        }
        tracing::info!("cookie guard uninstalled");
        Ok(dropped)
    }

    /// Block or unblock a category, relocating its cookies.
    pub fn set_blocked(&self, category: &str, blocked: bool) -> Result<(), GuardError> {
        self.proxy.toggle(category, blocked)
    }

    pub fn is_blocked(&self, category: &str) -> Result<bool, GuardError> {
        Ok(self.proxy.registry().get(category)?.is_blocked())
    }

    /// Blocked state of the implicit category of [`GuardConfig::all_cookies`].
    pub fn block_enabled(&self) -> Result<bool, GuardError> {
        self.is_blocked(ALL_COOKIES_CATEGORY)
    }

    /// Block or unblock the implicit category of [`GuardConfig::all_cookies`].
    pub fn set_block_enabled(&self, blocked: bool) -> Result<(), GuardError> {
        self.set_blocked(ALL_COOKIES_CATEGORY, blocked)
    }

    /// Read through the proxy.
    pub fn read(&self) -> String {
        self.proxy.get()
    }

    /// Write through the proxy.
    pub fn write(&self, set_string: &str) -> Result<(), GuardError> {
        self.proxy.set(set_string)
    }

    /// The raw store read directly.
    pub fn native_cookies(&self) -> String {
        self.proxy.native_cookies()
    }

    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.proxy.registry().iter()
    }

    pub fn buffered(&self, name: &str) -> Option<BufferedCookie> {
        self.proxy.buffer().get(name)
    }

    /// Number of buffered cookies, including expired ones.
    pub fn buffered_len(&self) -> usize {
        self.proxy.buffer().len()
    }
}
