use weave_log::{Config, LogError};

// One test function per binary: the subscriber is process-global.
#[test]
fn first_install_wins_and_later_calls_are_tolerated() {
    let guard = weave_log::init_with(Config::test()).unwrap();
    assert!(guard.installed());
    tracing::info!(target: "weave_log_test", "installed");

    let err = weave_log::init().unwrap_err();
    assert!(matches!(err, LogError::AlreadyInitialized(_)));
    assert_eq!(err.code(), "LOG_ALREADY_INITIALIZED");

    let again = weave_log::auto_init().unwrap();
    assert!(!again.installed());
}
