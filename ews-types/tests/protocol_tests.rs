use ews_types::{
    Autodiscover, Credentials, Discovery, Error, FailFast, ProtocolConfig, Result, RetryPolicy, Version, EXCHANGE_2013_SP1,
};
use std::sync::Arc;
use std::time::Duration;

struct StaticDiscovery;

impl Autodiscover for StaticDiscovery {
    fn discover(&self, email: &str, _credentials: &Credentials) -> Result<Discovery> {
        if !email.ends_with("@example.com") {
            return Err(Error::Discovery(format!("no endpoint for {email}")));
        }
        Ok(Discovery {
            endpoint: "https://mail.example.com/EWS/Exchange.asmx".to_string(),
            version: Version::from_build(EXCHANGE_2013_SP1),
        })
    }
}

// ── Credentials ──────────────────────────────────────────────────

#[test]
fn credentials_debug_hides_password() {
    let credentials = Credentials::new("jane", "hunter2");
    let debug = format!("{credentials:?}");
    assert!(debug.contains("jane"));
    assert!(!debug.contains("hunter2"));
    assert_eq!(credentials.password(), "hunter2");
}

// ── Autodiscovery ────────────────────────────────────────────────

#[test]
fn discover_builds_config() {
    let config = ProtocolConfig::discover(
        &StaticDiscovery,
        "jane@example.com",
        &Credentials::new("jane", "pw"),
        Arc::new(FailFast),
    )
    .unwrap();
    assert_eq!(config.endpoint, "https://mail.example.com/EWS/Exchange.asmx");
    assert_eq!(config.version.api_version(), "Exchange2013_SP1");
    assert!(config.retry_policy.fail_fast());
}

#[test]
fn discover_propagates_failure() {
    let err = ProtocolConfig::discover(
        &StaticDiscovery,
        "jane@elsewhere.org",
        &Credentials::new("jane", "pw"),
        Arc::new(FailFast),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Discovery(_)));
}

// ── Config files ─────────────────────────────────────────────────

#[test]
fn config_with_api_version_and_retry() {
    let config = ProtocolConfig::from_toml_str(
        r#"
        endpoint = "https://mail.example.com/EWS/Exchange.asmx"
        version = "Exchange2016"

        [retry]
        fail_fast = false
        max_wait_secs = 600
        "#,
    )
    .unwrap();
    assert_eq!(config.version.api_version(), "Exchange2016");
    assert!(!config.retry_policy.fail_fast());
    assert_eq!(config.retry_policy.max_wait(), Some(Duration::from_secs(600)));
}

#[test]
fn config_with_build_number_defaults_to_fail_fast() {
    let config = ProtocolConfig::from_toml_str(
        r#"
        endpoint = "https://mail.example.com/EWS/Exchange.asmx"
        version = "15.0.1497.2"
        "#,
    )
    .unwrap();
    assert_eq!(config.version.api_version(), "Exchange2013_SP1");
    assert!(config.retry_policy.fail_fast());
    assert_eq!(config.retry_policy.max_wait(), None);
}

#[test]
fn config_rejects_unknown_version() {
    let err = ProtocolConfig::from_toml_str(
        r#"
        endpoint = "https://mail.example.com/EWS/Exchange.asmx"
        version = "Exchange1999"
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidBuild(_)));
}

#[test]
fn config_requires_endpoint() {
    let err = ProtocolConfig::from_toml_str(r#"version = "Exchange2016""#).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}
