use std::sync::{Arc, RwLock};

use crate::base::guarderror::GuardError;
use crate::cookies::accessor::CookieAccessor;
use crate::cookies::jar::MemoryCookieJar;
use crate::host::CookieHost;

/// An in-process page host.
///
/// `cookie()` and `set_cookie()` are the page-visible surface. They go to
/// the installed accessor when there is one and to the native jar otherwise.
pub struct Document {
    jar: Option<MemoryCookieJar>,
    cookies_enabled: bool,
    installed: RwLock<Option<Arc<dyn CookieAccessor>>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A document with an empty cookie jar and cookies enabled.
    pub fn new() -> Self {
        Self::with_jar(MemoryCookieJar::new())
    }

    /// A document over an existing jar. The jar handle stays usable to
    /// inspect the raw store directly.
    pub fn with_jar(jar: MemoryCookieJar) -> Self {
        Self {
            jar: Some(jar),
            cookies_enabled: true,
            installed: RwLock::new(None),
        }
    }

    /// A document with no cookie surface at all.
    pub fn without_cookies() -> Self {
        Self {
            jar: None,
            cookies_enabled: false,
            installed: RwLock::new(None),
        }
    }

    /// Set whether the host allows cookies.
    pub fn with_cookies_enabled(mut self, enabled: bool) -> Self {
        self.cookies_enabled = enabled;
        self
    }

    /// Read the cookie surface.
    pub fn cookie(&self) -> String {
        match self.installed_accessor() {
            Some(accessor) => accessor.get(),
            None => self.jar.as_ref().map(|j| j.get()).unwrap_or_default(),
        }
    }

    /// Write one set-string to the cookie surface.
    pub fn set_cookie(&self, set_string: &str) -> Result<(), GuardError> {
        match self.installed_accessor() {
            Some(accessor) => accessor.set(set_string),
            None => match &self.jar {
                Some(jar) => jar.set(set_string),
                None => Err(GuardError::CookiesUnsupported),
            },
        }
    }

    /// The native jar behind the surface.
    pub fn jar(&self) -> Option<&MemoryCookieJar> {
        self.jar.as_ref()
    }

    fn installed_accessor(&self) -> Option<Arc<dyn CookieAccessor>> {
        self.installed
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl CookieHost for Document {
    fn native_accessor(&self) -> Option<Arc<dyn CookieAccessor>> {
        self.jar
            .clone()
            .map(|jar| Arc::new(jar) as Arc<dyn CookieAccessor>)
    }

    fn cookies_enabled(&self) -> bool {
        self.cookies_enabled
    }

    fn is_overridable(&self) -> bool {
        self.installed
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_none()
    }

    fn override_accessor(&self, accessor: Arc<dyn CookieAccessor>) -> Result<(), GuardError> {
        let mut installed = self.installed.write().unwrap_or_else(|e| e.into_inner());
        if installed.is_some() {
            return Err(GuardError::SurfaceLocked);
        }
        *installed = Some(accessor);
        Ok(())
    }

    fn restore_native(&self) -> Result<(), GuardError> {
        let mut installed = self.installed.write().unwrap_or_else(|e| e.into_inner());
        match installed.take() {
            Some(_) => Ok(()),
            None => Err(GuardError::NotInstalled),
        }
    }
}
