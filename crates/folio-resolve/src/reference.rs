//! The configuration-link reference grammar
//!
//! A reference is stored inline as an attribute value:
//! `<keyword>#<xpath>[#<operation>]`, where `<operation>` is itself
//! `<methodName>[:<methodArgument>]`. There is no escaping of `#` within
//! segments - a grammar limitation, not a bug to fix silently.

/// A parsed reference triple.
///
/// `keyword` and `config_path` are non-empty only if the raw string
/// contained a `#` separator; `operation` is empty unless a second
/// `#`-delimited segment followed. Segments beyond the third are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reference {
    /// Configuration keyword routing the lookup (e.g. `cms_project`)
    pub keyword: String,
    /// Path evaluated against the routed base node
    pub config_path: String,
    /// Optional formatting operation (`method[:argument]`)
    pub operation: String,
}

impl Reference {
    /// Parse a raw reference string.
    ///
    /// A string without `#` yields the empty triple; the caller must
    /// interpret that as a format error.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if !raw.contains('#') {
            return Self::default();
        }
        let mut segments = raw.split('#');
        Self {
            keyword: segments.next().unwrap_or_default().to_string(),
            config_path: segments.next().unwrap_or_default().to_string(),
            operation: segments.next().unwrap_or_default().to_string(),
        }
    }

    /// Whether keyword and path are both present
    #[inline]
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.keyword.is_empty() && !self.config_path.is_empty()
    }

    /// Whether a formatting operation was given
    #[inline]
    #[must_use]
    pub fn has_operation(&self) -> bool {
        !self.operation.is_empty()
    }
}

/// A parsed operation segment: `<methodName>[:<methodArgument>]`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Operation {
    /// Formatter method name
    pub method: String,
    /// Formatter argument; empty when no `:` was present
    pub argument: String,
}

impl Operation {
    /// Split an operation on the first `:`
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((method, argument)) => Self {
                method: method.to_string(),
                argument: argument.to_string(),
            },
            None => Self {
                method: raw.to_string(),
                argument: String::new(),
            },
        }
    }
}
