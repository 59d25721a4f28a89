//! Helpers shared by the protocol entity tests.

#![allow(dead_code)]

use ews_types::{Version, XmlElement, EXCHANGE_2010, EXCHANGE_2013, MNS, TNS};
use tracing_subscriber::EnvFilter;

/// Routes `tracing` output through the test harness. Set `RUST_LOG=debug`
/// to see schema and timezone decisions.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .with_target(false)
        .compact()
        .try_init();
}

pub fn v2010() -> Version {
    Version::from_build(EXCHANGE_2010)
}

pub fn v2013() -> Version {
    Version::from_build(EXCHANGE_2013)
}

/// Parses `body` wrapped in a `root` element that declares both namespaces,
/// so fragments can use `t:` and `m:` freely.
pub fn parse_fragment(root: &str, body: &str) -> XmlElement {
    XmlElement::parse(&format!(r#"<{root} xmlns:t="{TNS}" xmlns:m="{MNS}">{body}</{root}>"#)).unwrap()
}
