//! Wire primitives for the EWS schema engine.
//!
//! This crate defines the protocol-agnostic building blocks that the field
//! catalog and entity engine sit on:
//! - Server build numbers and protocol versions ([`Build`], [`Version`])
//! - The two XML namespaces entities live in ([`Namespace`])
//! - An owned XML element tree with a quick-xml reader/writer ([`XmlElement`])
//! - Scalar text conversions used on the wire ([`wire`])
//! - Contracts for the collaborators this core never implements: autodiscovery
//!   and retry policies ([`protocol`])
//!
//! Nothing here performs network I/O.

mod namespace;
pub mod protocol;
mod version;
pub mod wire;
mod xml;

pub use namespace::{Namespace, MNS, TNS};
pub use protocol::{Autodiscover, Credentials, Discovery, FailFast, FaultTolerance, ProtocolConfig, RetryPolicy};
pub use version::{
    Build, Version, EXCHANGE_2007, EXCHANGE_2007_SP1, EXCHANGE_2010, EXCHANGE_2010_SP1, EXCHANGE_2010_SP2,
    EXCHANGE_2013, EXCHANGE_2013_SP1, EXCHANGE_2016, EXCHANGE_2019,
};
pub use xml::{QName, XmlElement};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while handling wire primitives.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed XML: {0}")]
    MalformedXml(String),

    #[error("invalid {kind} value on the wire: {value:?}")]
    InvalidWireValue { kind: &'static str, value: String },

    #[error("invalid build number: {0:?}")]
    InvalidBuild(String),

    #[error("unknown API version: {0:?}")]
    UnknownApiVersion(String),

    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("autodiscovery failed: {0}")]
    Discovery(String),
}
