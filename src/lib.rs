//! # cookieguard
//!
//! Category-based cookie blocking for a page's cookie surface.
//!
//! `cookieguard` installs a proxy in place of a host's native cookie
//! accessor. Cookies belonging to blocked categories (analytics, ads, ...)
//! are kept in an in-memory buffer instead of the real cookie store, while
//! every reader of the surface still sees one merged view. Unblocking a
//! category writes its buffered cookies to the real store exactly as they
//! were originally set.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use cookieguard::guard::{config::GuardConfig, CookieGuard};
//! use cookieguard::host::document::Document;
//!
//! let document = Arc::new(Document::new());
//! let guard = CookieGuard::install(document.clone(), GuardConfig::all_cookies(true))?;
//!
//! document.set_cookie("consent_pending=1")?;
//! assert_eq!(document.cookie(), "consent_pending=1");
//!
//! // user consented
//! guard.set_block_enabled(false)?;
//! assert_eq!(document.jar().unwrap().get_cookie("consent_pending").unwrap().value, "1");
//! # Ok::<(), cookieguard::base::guarderror::GuardError>(())
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error definitions
//! - [`cookies`] - Cookie records, cookie-string codec, raw cookie stores
//! - [`host`] - Host environments and the accessor extension point
//! - [`guard`] - Categories, buffer, proxy and the installed guard
//!
//! ## Threading
//!
//! All operations run to completion on the calling thread. Calling back into
//! the surface from inside a matcher is not supported.

pub mod base;
pub mod cookies;
pub mod guard;
pub mod host;
