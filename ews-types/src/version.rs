//! Server build numbers and protocol versions.
//!
//! Every field carries a half-open `[supported_from, deprecated_from)` range of
//! builds. Comparisons are lexicographic over `(major, minor, build, revision)`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A server build number, e.g. `15.0.847.32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Build {
    pub major: u16,
    pub minor: u16,
    pub build: u16,
    pub revision: u16,
}

impl Build {
    /// Creates a build from all four components.
    #[must_use]
    pub const fn new(major: u16, minor: u16, build: u16, revision: u16) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }

    /// Creates a build with zero build and revision components.
    #[must_use]
    pub const fn release(major: u16, minor: u16) -> Self {
        Self::new(major, minor, 0, 0)
    }

    /// Returns the API version string the server advertises for this build.
    ///
    /// Picks the newest known release that is not newer than `self`.
    #[must_use]
    pub fn api_version(&self) -> &'static str {
        API_VERSIONS
            .iter()
            .rev()
            .find(|(build, _)| build <= self)
            .map_or(API_VERSIONS[0].1, |(_, name)| name)
    }
}

impl fmt::Display for Build {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}.{}", self.major, self.minor, self.build, self.revision)
    }
}

impl FromStr for Build {
    type Err = Error;

    /// Parses `major.minor[.build[.revision]]`.
    fn from_str(s: &str) -> Result<Self> {
        let parts = s
            .split('.')
            .map(|p| p.trim().parse::<u16>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| Error::InvalidBuild(s.to_string()))?;
        match parts.as_slice() {
            [major, minor] => Ok(Self::new(*major, *minor, 0, 0)),
            [major, minor, build] => Ok(Self::new(*major, *minor, *build, 0)),
            [major, minor, build, revision] => Ok(Self::new(*major, *minor, *build, *revision)),
            _ => Err(Error::InvalidBuild(s.to_string())),
        }
    }
}

pub const EXCHANGE_2007: Build = Build::release(8, 0);
pub const EXCHANGE_2007_SP1: Build = Build::release(8, 1);
pub const EXCHANGE_2010: Build = Build::release(14, 0);
pub const EXCHANGE_2010_SP1: Build = Build::release(14, 1);
pub const EXCHANGE_2010_SP2: Build = Build::release(14, 2);
pub const EXCHANGE_2013: Build = Build::release(15, 0);
pub const EXCHANGE_2013_SP1: Build = Build::new(15, 0, 847, 0);
pub const EXCHANGE_2016: Build = Build::release(15, 1);
pub const EXCHANGE_2019: Build = Build::release(15, 2);

// Ordered oldest first.
const API_VERSIONS: [(Build, &str); 9] = [
    (EXCHANGE_2007, "Exchange2007"),
    (EXCHANGE_2007_SP1, "Exchange2007_SP1"),
    (EXCHANGE_2010, "Exchange2010"),
    (EXCHANGE_2010_SP1, "Exchange2010_SP1"),
    (EXCHANGE_2010_SP2, "Exchange2010_SP2"),
    (EXCHANGE_2013, "Exchange2013"),
    (EXCHANGE_2013_SP1, "Exchange2013_SP1"),
    (EXCHANGE_2016, "Exchange2016"),
    (EXCHANGE_2019, "Exchange2019"),
];

/// The protocol version negotiated with a server: its build plus the API
/// version string sent in request headers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
    build: Build,
    api_version: String,
}

impl Version {
    /// Creates a version with an explicit API version string.
    #[must_use]
    pub fn new(build: Build, api_version: impl Into<String>) -> Self {
        Self {
            build,
            api_version: api_version.into(),
        }
    }

    /// Creates a version whose API version string is derived from the build.
    #[must_use]
    pub fn from_build(build: Build) -> Self {
        Self::new(build, build.api_version())
    }

    /// Looks up a version by its API version string, e.g. `Exchange2013_SP1`.
    pub fn from_api_version(name: &str) -> Result<Self> {
        API_VERSIONS
            .iter()
            .find(|(_, api)| *api == name)
            .map(|(build, api)| Self::new(*build, *api))
            .ok_or_else(|| Error::UnknownApiVersion(name.to_string()))
    }

    /// Returns the server build.
    #[must_use]
    pub const fn build(&self) -> Build {
        self.build
    }

    /// Returns the API version string.
    #[must_use]
    pub fn api_version(&self) -> &str {
        &self.api_version
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Build={}, API={}", self.build, self.api_version)
    }
}
