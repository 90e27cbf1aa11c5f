//! Resolution status vocabulary and annotation attribute names
//!
//! Every reference-bearing node is annotated after resolution: the status
//! drives broken-link highlighting in the editor, the editability flag
//! marks the derived content as not directly author-editable. Both are
//! stripped again on save (see [`crate::eject`]); only the reference
//! attribute is authoritative.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Attribute holding the raw reference; authored, never touched by passes
pub const REFERENCE_ATTR: &str = "data-configurationlink";

/// Derived attribute holding the resolution status
pub const STATUS_ATTR: &str = "data-resolve-status";

/// Derived attribute marking the node as not author-editable
pub const EDITABLE_ATTR: &str = "data-editable";

/// Outcome of resolving one reference-bearing node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionStatus {
    /// Reference resolved to a value
    #[default]
    Ok,
    /// Reference string had no `#` or an empty keyword/path segment
    WrongFormat,
    /// Keyword is not in the routing registry
    KeywordNotAvailable,
    /// Routed base node does not exist in the configuration tree
    BaseNodeNotAvailable,
    /// Operation named a formatter the registry does not know
    MethodNotAvailable,
}

impl ResolutionStatus {
    /// Wire string attached to the status attribute
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::WrongFormat => "wrong-format",
            Self::KeywordNotAvailable => "target-configkeyword-not-available",
            Self::BaseNodeNotAvailable => "target-configbasenode-not-available",
            Self::MethodNotAvailable => "target-methodkeyword-not-available",
        }
    }

    /// Whether this status marks a successfully resolved node
    #[inline]
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl Display for ResolutionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResolutionStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ok" => Ok(Self::Ok),
            "wrong-format" => Ok(Self::WrongFormat),
            "target-configkeyword-not-available" => Ok(Self::KeywordNotAvailable),
            "target-configbasenode-not-available" => Ok(Self::BaseNodeNotAvailable),
            "target-methodkeyword-not-available" => Ok(Self::MethodNotAvailable),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A status attribute value outside the known vocabulary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resolution status: {0}")]
pub struct UnknownStatus(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ResolutionStatus; 5] = [
        ResolutionStatus::Ok,
        ResolutionStatus::WrongFormat,
        ResolutionStatus::KeywordNotAvailable,
        ResolutionStatus::BaseNodeNotAvailable,
        ResolutionStatus::MethodNotAvailable,
    ];

    #[test]
    fn wire_strings_are_exact() {
        assert_eq!(ResolutionStatus::Ok.as_str(), "ok");
        assert_eq!(ResolutionStatus::WrongFormat.as_str(), "wrong-format");
        assert_eq!(
            ResolutionStatus::KeywordNotAvailable.as_str(),
            "target-configkeyword-not-available"
        );
        assert_eq!(
            ResolutionStatus::BaseNodeNotAvailable.as_str(),
            "target-configbasenode-not-available"
        );
        assert_eq!(
            ResolutionStatus::MethodNotAvailable.as_str(),
            "target-methodkeyword-not-available"
        );
    }

    #[test]
    fn from_str_roundtrips_every_variant() {
        for status in ALL {
            assert_eq!(status.as_str().parse::<ResolutionStatus>(), Ok(status));
        }
    }

    #[test]
    fn from_str_rejects_unknown() {
        let err = "not-a-status".parse::<ResolutionStatus>().unwrap_err();
        assert_eq!(err, UnknownStatus("not-a-status".to_string()));
        assert_eq!(err.to_string(), "unknown resolution status: not-a-status");
    }

    #[test]
    fn only_ok_is_ok() {
        for status in ALL {
            assert_eq!(status.is_ok(), status == ResolutionStatus::Ok);
        }
    }
}
