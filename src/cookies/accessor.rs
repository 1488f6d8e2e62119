use std::sync::Arc;

use crate::base::guarderror::GuardError;

/// The two-operation cookie surface.
///
/// `get` returns every visible cookie as one `name=value; ...` string and
/// `set` applies a single set-string. The native store and the guard's
/// proxy both implement this, so one can be substituted for the other.
pub trait CookieAccessor: Send + Sync {
    fn get(&self) -> String;

    fn set(&self, set_string: &str) -> Result<(), GuardError>;
}

impl<T: CookieAccessor + ?Sized> CookieAccessor for Arc<T> {
    fn get(&self) -> String {
        (**self).get()
    }

    fn set(&self, set_string: &str) -> Result<(), GuardError> {
        (**self).set(set_string)
    }
}
