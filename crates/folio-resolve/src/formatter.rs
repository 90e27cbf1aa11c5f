//! Formatter registry
//!
//! Pluggable value-formatting functions keyed by operation name. The
//! registry ships two built-in date formatters (`dateformat`,
//! `writtendateformat`); hosting applications register project-specific
//! formatters under additional names at startup. A name the registry does
//! not know is mapped to `target-methodkeyword-not-available` by the
//! resolver.
//!
//! The built-in date formatters are deliberately best-effort: a value
//! that does not parse as a date is logged and passed through unchanged,
//! reported as success. Callers relying on the status attribute cannot
//! distinguish this from a clean format.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use once_cell::sync::Lazy;

/// Result of applying one formatter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOutcome {
    /// Whether formatting succeeded
    pub success: bool,
    /// The (possibly rewritten) value
    pub payload: String,
    /// Human-readable failure message, empty on success
    pub message: String,
    /// Machine-debug context, never shown to end users
    pub debug: String,
}

impl FormatOutcome {
    /// Successful formatting
    #[inline]
    #[must_use]
    pub fn ok(payload: impl Into<String>) -> Self {
        Self {
            success: true,
            payload: payload.into(),
            message: String::new(),
            debug: String::new(),
        }
    }

    /// Failed formatting; `payload` carries the unformatted value
    #[inline]
    #[must_use]
    pub fn failure(
        payload: impl Into<String>,
        message: impl Into<String>,
        debug: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            payload: payload.into(),
            message: message.into(),
            debug: debug.into(),
        }
    }
}

type FormatterFn = Box<dyn Fn(&str, &str) -> FormatOutcome + Send + Sync>;

/// Registry of value formatters keyed by method name
#[derive(Default)]
pub struct FormatterRegistry {
    formatters: IndexMap<String, FormatterFn>,
}

impl std::fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatterRegistry")
            .field("methods", &self.names())
            .finish()
    }
}

impl FormatterRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            formatters: IndexMap::new(),
        }
    }

    /// Create registry with the built-in date formatters
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("dateformat", |value, pattern| dateformat(value, pattern));
        registry.register("writtendateformat", |value, _| writtendateformat(value));
        registry
    }

    /// Register a formatter under a method name
    pub fn register(
        &mut self,
        method: impl Into<String>,
        f: impl Fn(&str, &str) -> FormatOutcome + Send + Sync + 'static,
    ) {
        self.formatters.insert(method.into(), Box::new(f));
    }

    /// Apply the formatter registered under `method`.
    ///
    /// `None` means the method name is not registered.
    #[must_use]
    pub fn apply(&self, value: &str, method: &str, argument: &str) -> Option<FormatOutcome> {
        self.formatters.get(method).map(|f| f(value, argument))
    }

    /// Check if a method is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, method: &str) -> bool {
        self.formatters.contains_key(method)
    }

    /// Registered method names, in registration order
    #[inline]
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.formatters.keys().map(String::as_str).collect()
    }

    /// Number of registered formatters
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }
}

/// Stored date values, as written by the authoring tools
const INPUT_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

fn parse_date_value(value: &str) -> Option<NaiveDateTime> {
    for format in INPUT_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Output-pattern tokens, longest first so `yyyy` wins over `yy`
static PATTERN_TOKENS: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    vec![
        ("yyyy", "%Y"),
        ("yy", "%y"),
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("M", "%-m"),
        ("dd", "%d"),
        ("d", "%-d"),
        ("HH", "%H"),
        ("H", "%-H"),
        ("mm", "%M"),
        ("m", "%-M"),
        ("ss", "%S"),
        ("s", "%-S"),
    ]
});

/// Translate a `yyyy-MM-dd`-style output pattern into a chrono format
/// string. Unrecognized characters pass through as literals.
fn translate_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut rest = pattern;
    'outer: while !rest.is_empty() {
        for (token, replacement) in PATTERN_TOKENS.iter() {
            if let Some(stripped) = rest.strip_prefix(token) {
                out.push_str(replacement);
                rest = stripped;
                continue 'outer;
            }
        }
        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            if ch == '%' {
                out.push_str("%%");
            } else {
                out.push(ch);
            }
        }
        rest = chars.as_str();
    }
    out
}

fn dateformat(value: &str, pattern: &str) -> FormatOutcome {
    match parse_date_value(value) {
        Some(parsed) => FormatOutcome::ok(parsed.format(&translate_pattern(pattern)).to_string()),
        None => {
            // Best-effort: a value that is not a date passes through
            // unchanged and still reports success.
            tracing::warn!(value, pattern, "dateformat: value did not parse as a date");
            FormatOutcome::ok(value)
        }
    }
}

fn writtendateformat(value: &str) -> FormatOutcome {
    match parse_date_value(value) {
        Some(parsed) => {
            let day = parsed.day();
            FormatOutcome::ok(format!(
                "{day}{} day of {} {}",
                ordinal_suffix(day),
                parsed.format("%B"),
                parsed.year()
            ))
        }
        None => {
            tracing::warn!(value, "writtendateformat: value did not parse as a date");
            FormatOutcome::ok(value)
        }
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    match day {
        11..=13 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    }
}
