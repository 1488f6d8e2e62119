use cookieguard::base::guarderror::GuardError;
use cookieguard::cookies::accessor::CookieAccessor;
use cookieguard::cookies::jar::MemoryCookieJar;
use cookieguard::guard::config::GuardConfig;
use cookieguard::guard::CookieGuard;
use cookieguard::host::document::Document;
use cookieguard::host::CookieHost;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

fn analytics_config(blocked: bool) -> GuardConfig {
    GuardConfig::new()
        .category_pattern("analytics", "^analytics", blocked)
        .unwrap()
}

#[test]
fn test_install_requires_cookie_surface() {
    let err = CookieGuard::install(Arc::new(Document::without_cookies()), analytics_config(true))
        .err()
        .unwrap();
    assert_eq!(err, GuardError::CookiesUnsupported);
    assert!(err.is_configuration_error());
}

#[test]
fn test_install_requires_cookies_enabled() {
    let document = Document::new().with_cookies_enabled(false);
    let err = CookieGuard::install(Arc::new(document), analytics_config(true))
        .err()
        .unwrap();
    assert_eq!(err, GuardError::CookiesDisabled);
}

#[test]
fn test_install_rejects_empty_config() {
    let document = Arc::new(Document::new());
    let err = CookieGuard::install(document.clone(), GuardConfig::new())
        .err()
        .unwrap();
    assert_eq!(err, GuardError::NoCategories);

    // the surface was not touched
    assert!(document.is_overridable());
}

#[test]
fn test_double_install_rejected() {
    let document = Arc::new(Document::new());
    let _guard = CookieGuard::install(document.clone(), analytics_config(true)).unwrap();

    let err = CookieGuard::install(document.clone(), GuardConfig::all_cookies(false))
        .err()
        .unwrap();
    assert_eq!(err, GuardError::SurfaceLocked);
}

#[test]
fn test_uninstall_restores_native_surface() {
    let document = Arc::new(Document::new());
    let guard = CookieGuard::install(document.clone(), analytics_config(true)).unwrap();
    document.set_cookie("analytics_x=1").unwrap();
    document.set_cookie("session=abc").unwrap();

    assert_eq!(guard.uninstall().unwrap(), 1);
    assert_eq!(document.cookie(), "session=abc");

    // a new guard can be installed afterwards
    let guard = CookieGuard::install(document.clone(), analytics_config(false)).unwrap();
    document.set_cookie("analytics_x=2").unwrap();
    assert_eq!(document.cookie(), "session=abc; analytics_x=2");
    assert_eq!(guard.uninstall().unwrap(), 0);
}

#[test]
fn test_initially_blocked_category_moves_existing_cookies() {
    let jar = MemoryCookieJar::new();
    jar.set("analytics_x=1").unwrap();
    jar.set("session=abc").unwrap();
    let document = Arc::new(Document::with_jar(jar.clone()));

    let guard = CookieGuard::install(document.clone(), analytics_config(true)).unwrap();

    assert_eq!(jar.get(), "session=abc");
    assert_eq!(document.cookie(), "session=abc; analytics_x=1");
    assert_eq!(guard.buffered("analytics_x").unwrap().value, "1");
}

/// Raw store whose writes can be made to fail.
#[derive(Clone, Default)]
struct FlakyStore {
    jar: MemoryCookieJar,
    failing: Arc<AtomicBool>,
}

impl CookieAccessor for FlakyStore {
    fn get(&self) -> String {
        self.jar.get()
    }

    fn set(&self, set_string: &str) -> Result<(), GuardError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(GuardError::raw_store_write(set_string, "store unavailable"));
        }
        self.jar.set(set_string)
    }
}

#[derive(Default)]
struct FlakyHost {
    store: FlakyStore,
    installed: Mutex<Option<Arc<dyn CookieAccessor>>>,
    restore_locked: AtomicBool,
}

impl CookieHost for FlakyHost {
    fn native_accessor(&self) -> Option<Arc<dyn CookieAccessor>> {
        Some(Arc::new(self.store.clone()))
    }

    fn cookies_enabled(&self) -> bool {
        true
    }

    fn is_overridable(&self) -> bool {
        self.installed.lock().unwrap().is_none()
    }

    fn override_accessor(&self, accessor: Arc<dyn CookieAccessor>) -> Result<(), GuardError> {
        *self.installed.lock().unwrap() = Some(accessor);
        Ok(())
    }

    fn restore_native(&self) -> Result<(), GuardError> {
        if self.restore_locked.load(Ordering::SeqCst) {
            return Err(GuardError::SurfaceLocked);
        }
        self.installed.lock().unwrap().take();
        Ok(())
    }
}

#[test]
fn test_passthrough_write_failure_is_reported() {
    let host = Arc::new(FlakyHost::default());
    let guard = CookieGuard::install(host.clone(), analytics_config(false)).unwrap();

    host.store.failing.store(true, Ordering::SeqCst);
    let err = guard.write("session=abc").unwrap_err();
    assert!(matches!(err, GuardError::RawStoreWrite { .. }));

    // diverted writes never touch the store
    guard.set_blocked("analytics", true).unwrap();
    guard.write("analytics_x=1").unwrap();
}

#[test]
fn test_failed_block_keeps_cookie_visible() {
    let host = Arc::new(FlakyHost::default());
    host.store.jar.set("analytics_x=1").unwrap();
    let guard = CookieGuard::install(host.clone(), analytics_config(false)).unwrap();

    host.store.failing.store(true, Ordering::SeqCst);
    let err = guard.set_blocked("analytics", true).unwrap_err();

    assert_eq!(
        err,
        GuardError::TransferIncomplete {
            category: "analytics".to_string(),
            failed: vec!["analytics_x".to_string()],
        }
    );
    assert!(guard.buffered("analytics_x").is_none());
    assert_eq!(guard.read(), "analytics_x=1");
}

#[test]
fn test_block_retry_after_failure_empties_raw_store() {
    let host = Arc::new(FlakyHost::default());
    host.store.jar.set("analytics_x=1").unwrap();
    let guard = CookieGuard::install(host.clone(), analytics_config(false)).unwrap();

    host.store.failing.store(true, Ordering::SeqCst);
    assert!(guard.set_blocked("analytics", true).is_err());

    host.store.failing.store(false, Ordering::SeqCst);
    guard.set_blocked("analytics", true).unwrap();

    assert_eq!(host.store.get(), "");
    assert_eq!(guard.buffered("analytics_x").unwrap().value, "1");
    assert_eq!(guard.read(), "analytics_x=1");
}

#[test]
fn test_failed_unblock_keeps_cookie_buffered() {
    let host = Arc::new(FlakyHost::default());
    let guard = CookieGuard::install(host.clone(), analytics_config(true)).unwrap();
    guard.write("analytics_x=1").unwrap();

    host.store.failing.store(true, Ordering::SeqCst);
    let err = guard.set_blocked("analytics", false).unwrap_err();

    assert!(matches!(err, GuardError::TransferIncomplete { .. }));
    assert!(guard.buffered("analytics_x").is_some());
    assert_eq!(guard.read(), "analytics_x=1");
    assert!(!guard.is_blocked("analytics").unwrap());
}

#[test]
fn test_unblock_retry_after_failure_lets_new_writes_through() {
    let host = Arc::new(FlakyHost::default());
    let guard = CookieGuard::install(host.clone(), analytics_config(true)).unwrap();
    guard.write("analytics_x=1").unwrap();

    host.store.failing.store(true, Ordering::SeqCst);
    assert!(guard.set_blocked("analytics", false).is_err());

    host.store.failing.store(false, Ordering::SeqCst);
    guard.set_blocked("analytics", false).unwrap();
    assert!(guard.buffered("analytics_x").is_none());
    assert_eq!(host.store.get(), "analytics_x=1");

    guard.write("analytics_x=2").unwrap();
    assert_eq!(host.store.get(), "analytics_x=2");
    assert_eq!(guard.read(), "analytics_x=2");
}

#[test]
fn test_write_after_failed_unblock_replaces_buffered_value() {
    let host = Arc::new(FlakyHost::default());
    let guard = CookieGuard::install(host.clone(), analytics_config(true)).unwrap();
    guard.write("analytics_x=1").unwrap();

    host.store.failing.store(true, Ordering::SeqCst);
    assert!(guard.set_blocked("analytics", false).is_err());
    host.store.failing.store(false, Ordering::SeqCst);

    guard.write("analytics_x=2").unwrap();
    assert!(guard.buffered("analytics_x").is_none());
    assert_eq!(guard.read(), "analytics_x=2");
}

#[test]
fn test_failed_initial_block_uninstalls() {
    let host = Arc::new(FlakyHost::default());
    host.store.jar.set("analytics_x=1").unwrap();
    host.store.failing.store(true, Ordering::SeqCst);

    let err = CookieGuard::install(host.clone(), analytics_config(true))
        .err()
        .unwrap();

    assert!(matches!(err, GuardError::TransferIncomplete { .. }));
    assert!(host.is_overridable());
    assert_eq!(host.store.get(), "analytics_x=1");
}

#[test]
fn test_failed_rollback_still_reports_transfer_error() {
    let host = Arc::new(FlakyHost::default());
    host.store.jar.set("analytics_x=1").unwrap();
    host.store.failing.store(true, Ordering::SeqCst);
    host.restore_locked.store(true, Ordering::SeqCst);

    let err = CookieGuard::install(host.clone(), analytics_config(true))
        .err()
        .unwrap();

    assert_eq!(
        err,
        GuardError::TransferIncomplete {
            category: "analytics".to_string(),
            failed: vec!["analytics_x".to_string()],
        }
    );
}
