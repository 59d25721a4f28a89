use serde::{Deserialize, Serialize};

/// URI of the "types" namespace.
pub const TNS: &str = "http://schemas.microsoft.com/exchange/services/2006/types";

/// URI of the "messages" namespace.
pub const MNS: &str = "http://schemas.microsoft.com/exchange/services/2006/messages";

/// The namespace an entity's element is emitted in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    #[default]
    Types,
    Messages,
}

impl Namespace {
    /// Returns the namespace URI.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::Types => TNS,
            Self::Messages => MNS,
        }
    }

    /// Returns the prefix used in request tags (`t` or `m`).
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Types => "t",
            Self::Messages => "m",
        }
    }

    /// Maps a namespace URI back to a known namespace.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            TNS => Some(Self::Types),
            MNS => Some(Self::Messages),
            _ => None,
        }
    }
}
