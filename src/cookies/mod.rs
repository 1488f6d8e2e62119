//! Cookie records, cookie-string codec and raw cookie stores.
//!
//! | Type | Responsibility |
//! |------|----------------|
//! | [`CookieAccessor`](accessor::CookieAccessor) | Two-operation get/set cookie surface |
//! | [`CookieRecord`](record::CookieRecord) | One cookie decoded from a set-string |
//! | [`MemoryCookieJar`](jar::MemoryCookieJar) | In-memory raw store with browser semantics |
//! | [`codec`] | `a=1; b=2` decoding and encoding |
//!
//! # Example
//!
//! ```rust
//! use cookieguard::cookies::accessor::CookieAccessor;
//! use cookieguard::cookies::jar::MemoryCookieJar;
//!
//! let jar = MemoryCookieJar::new();
//! jar.set("session=abc; Path=/")?;
//! jar.set("theme=dark")?;
//! assert_eq!(jar.get(), "session=abc; theme=dark");
//! # Ok::<(), cookieguard::base::guarderror::GuardError>(())
//! ```

pub mod accessor;
pub mod codec;
pub mod jar;
pub mod record;
