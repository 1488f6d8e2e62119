//! The host environment a guard installs into.
//!
//! A host owns the cookie surface and the single extension point where the
//! native accessor can be swapped for a proxy. [`Document`](document::Document)
//! is an in-process host backed by a [`MemoryCookieJar`](crate::cookies::jar::MemoryCookieJar).

pub mod document;

use std::sync::Arc;

use crate::base::guarderror::GuardError;
use crate::cookies::accessor::CookieAccessor;

/// A host environment exposing an overridable cookie surface.
pub trait CookieHost: Send + Sync {
    /// The native accessor, or `None` if the host has no cookie surface.
    fn native_accessor(&self) -> Option<Arc<dyn CookieAccessor>>;

    /// Whether the host lets cookies be set at all.
    fn cookies_enabled(&self) -> bool;

    /// Whether the surface can still be overridden.
    fn is_overridable(&self) -> bool;

    /// Substitute `accessor` for the native one. The surface is locked afterwards.
    fn override_accessor(&self, accessor: Arc<dyn CookieAccessor>) -> Result<(), GuardError>;

    /// Put the native accessor back and unlock the surface.
    fn restore_native(&self) -> Result<(), GuardError>;
}

/// Check that `host` can take a guard and hand back its native accessor.
pub fn validate_environment(host: &dyn CookieHost) -> Result<Arc<dyn CookieAccessor>, GuardError> {
    let native = host.native_accessor().ok_or(GuardError::CookiesUnsupported)?;

    if !host.cookies_enabled() {
        return Err(GuardError::CookiesDisabled);
    }

    if !host.is_overridable() {
        return Err(GuardError::SurfaceLocked);
    }

    Ok(native)
}
