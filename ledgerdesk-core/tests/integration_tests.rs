//! Integration tests for ledgerdesk-core infrastructure

use ledgerdesk_core::{
    config_error, storage_error, validation_error, ConsoleConfig, ErrorContext, LedgerError,
    LogFormat, LoggingConfig, NETWORK_ERROR_MESSAGE,
};

#[test]
fn test_error_context_builder() {
    let context = ErrorContext::new("gateway")
        .with_operation("get")
        .with_metadata("path", "admin/u-1/users")
        .with_suggestion("Check network connectivity");

    assert_eq!(context.component, "gateway");
    assert_eq!(context.operation.as_deref(), Some("get"));
    assert_eq!(
        context.metadata.get("path").map(String::as_str),
        Some("admin/u-1/users")
    );
    assert_eq!(context.recovery_suggestions.len(), 1);
    assert!(!context.error_id.is_empty());
}

#[test]
fn test_error_macros() {
    let error = validation_error!("Passwords do not match!", "confirm_password", "auth_page");
    match &error {
        LedgerError::Validation {
            message,
            field,
            context,
        } => {
            assert_eq!(message, "Passwords do not match!");
            assert_eq!(field.as_deref(), Some("confirm_password"));
            assert_eq!(context.component, "auth_page");
        }
        other => panic!("Expected Validation error, got {other:?}"),
    }

    let error = config_error!("Invalid config", "test");
    assert!(matches!(error, LedgerError::Config { .. }));
    assert!(!error.context().unwrap().recovery_suggestions.is_empty());

    let error = storage_error!("disk full", "file_store");
    assert!(matches!(error, LedgerError::Storage { .. }));

    // Should not panic
    error.log();
}

#[test]
fn test_user_message_taxonomy() {
    let rejected = LedgerError::Api {
        status: 400,
        detail: Some("Mobile number must be exactly 10 digits".to_string()),
        context: ErrorContext::new("test"),
    };
    assert_eq!(
        rejected.user_message("Failed to add user").as_deref(),
        Some("Mobile number must be exactly 10 digits")
    );
    assert_eq!(rejected.status(), Some(400));

    let no_detail = LedgerError::Api {
        status: 500,
        detail: None,
        context: ErrorContext::new("test"),
    };
    assert_eq!(
        no_detail.user_message("Failed to add user").as_deref(),
        Some("Failed to add user")
    );

    let network = LedgerError::Network {
        message: "connection refused".to_string(),
        source: None,
        context: ErrorContext::new("test"),
    };
    assert_eq!(
        network.user_message("Failed to add user").as_deref(),
        Some(NETWORK_ERROR_MESSAGE)
    );

    let unauthorized = LedgerError::Authentication {
        message: "Could not validate credentials".to_string(),
        context: ErrorContext::new("test"),
    };
    assert!(unauthorized.is_auth_failure());
    assert_eq!(unauthorized.user_message("Failed to add user"), None);
    assert_eq!(unauthorized.status(), Some(401));
}

#[test]
fn test_config_roundtrip_and_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = ConsoleConfig::default();
    config.api.base_url = "https://ledger.example.com/api".to_string();
    config.api.timeout_seconds = Some(15);
    config.logging.format = LogFormat::Json;
    config.save_to_file(&path).unwrap();

    let loaded = ConsoleConfig::from_file(&path).unwrap();
    assert_eq!(loaded.api.base_url, "https://ledger.example.com/api");
    assert_eq!(loaded.api.timeout_seconds, Some(15));
    assert_eq!(loaded.logging.format, LogFormat::Json);
    assert_eq!(loaded.dashboard.refresh_interval_secs, 30);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_partial_config_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[api]\nbase_url = \"http://10.0.0.5:8000/api\"\n").unwrap();

    let loaded = ConsoleConfig::from_file(&path).unwrap();
    assert_eq!(loaded.api.base_url, "http://10.0.0.5:8000/api");
    assert_eq!(loaded.api.timeout_seconds, None);
    assert_eq!(loaded.storage.session_file, "~/.ledgerdesk/session.json");
}

#[test]
fn test_config_validation() {
    let mut config = ConsoleConfig::default();
    assert!(config.validate().is_ok());

    config.api.base_url = "ftp://ledger.example.com".to_string();
    assert!(config.validate().is_err());

    config.api.base_url = "not a url".to_string();
    assert!(config.validate().is_err());

    let mut config = ConsoleConfig::default();
    config.api.timeout_seconds = Some(0);
    assert!(config.validate().is_err());

    let mut config = ConsoleConfig::default();
    config.dashboard.refresh_interval_secs = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_missing_config_file_is_config_error() {
    let result = ConsoleConfig::from_file("/definitely/not/here/ledgerdesk.toml");
    assert!(matches!(result, Err(LedgerError::Config { .. })));
}

#[test]
fn test_verbose_logging_preset() {
    let config = LoggingConfig::default().verbose();
    assert_eq!(config.level, "debug");
    assert!(config
        .filter_directives
        .iter()
        .any(|d| d == "ledgerdesk_client=debug"));
}
