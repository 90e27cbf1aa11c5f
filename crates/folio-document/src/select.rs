//! Node selectors
//!
//! Provides [`Selector`]: a small path grammar (a subset of XPath) used to
//! scope pipeline passes and to evaluate configuration lookups:
//!
//! - steps separated by `/`; a leading `/` anchors at the document root
//! - `//` selects descendants instead of direct children
//! - a name test is an element name or `*`
//! - predicates: `[@attr='value']` and `[@attr]`
//! - an optional final `@attr` step reads an attribute instead of text
//!
//! Evaluation yields index paths (see [`Node::node_at`]) rather than node
//! references, so callers can select first and mutate afterwards.

use crate::node::Node;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A parsed selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    raw: String,
    absolute: bool,
    steps: Vec<Step>,
    attribute: Option<String>,
}

/// One location step
#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    axis: Axis,
    test: NameTest,
    predicates: Vec<Predicate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NameTest {
    Any,
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    AttrPresent(String),
    AttrEquals(String, String),
}

impl Step {
    fn matches(&self, node: &Node) -> bool {
        let name_ok = match &self.test {
            NameTest::Any => true,
            NameTest::Name(name) => node.name() == name,
        };
        name_ok
            && self.predicates.iter().all(|p| match p {
                Predicate::AttrPresent(key) => node.has_attr(key),
                Predicate::AttrEquals(key, value) => node.attr(key) == Some(value.as_str()),
            })
    }
}

impl Selector {
    /// Whether the final step reads an attribute
    #[inline]
    #[must_use]
    pub fn is_attribute(&self) -> bool {
        self.attribute.is_some()
    }

    /// Attribute name of the final step, if any
    #[inline]
    #[must_use]
    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    /// Locate every matching node under `context`, in document order.
    ///
    /// Absolute selectors treat `context` as the document root; relative
    /// selectors start their first step at the children of `context`.
    #[must_use]
    pub fn locate(&self, context: &Node) -> Vec<Vec<usize>> {
        let mut current: Vec<Vec<usize>> = Vec::new();
        let mut steps = self.steps.iter();

        if self.absolute {
            match steps.next() {
                Some(first) => match first.axis {
                    Axis::Child => {
                        if first.matches(context) {
                            current.push(Vec::new());
                        }
                    }
                    Axis::Descendant => {
                        collect_descendants(context, &[], true, first, &mut current);
                    }
                },
                None => current.push(Vec::new()),
            }
        } else {
            current.push(Vec::new());
        }

        for step in steps {
            let mut next = Vec::new();
            for path in &current {
                let Some(node) = context.node_at(path) else {
                    continue;
                };
                match step.axis {
                    Axis::Child => {
                        for (index, child) in node.children().iter().enumerate() {
                            if let Some(element) = child.as_element() {
                                if step.matches(element) {
                                    let mut child_path = path.clone();
                                    child_path.push(index);
                                    next.push(child_path);
                                }
                            }
                        }
                    }
                    Axis::Descendant => {
                        collect_descendants(node, path, false, step, &mut next);
                    }
                }
            }
            next.sort();
            next.dedup();
            current = next;
        }

        current
    }

    /// Locate the first matching node under `context`
    #[inline]
    #[must_use]
    pub fn locate_first(&self, context: &Node) -> Option<Vec<usize>> {
        self.locate(context).into_iter().next()
    }

    /// Evaluate the selector to a string value.
    ///
    /// Attribute selectors read the attribute's raw value; element
    /// selectors read the matched node's text content. `None` means no
    /// node matched (or the attribute was absent).
    #[must_use]
    pub fn value(&self, context: &Node) -> Option<String> {
        let path = self.locate_first(context)?;
        let node = context.node_at(&path)?;
        match &self.attribute {
            Some(attr) => node.attr(attr).map(ToOwned::to_owned),
            None => Some(node.text()),
        }
    }
}

fn collect_descendants(
    node: &Node,
    base: &[usize],
    include_self: bool,
    step: &Step,
    out: &mut Vec<Vec<usize>>,
) {
    if include_self && step.matches(node) {
        out.push(base.to_vec());
    }
    for (index, child) in node.children().iter().enumerate() {
        if let Some(element) = child.as_element() {
            let mut path = base.to_vec();
            path.push(index);
            collect_descendants(element, &path, true, step, out);
        }
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(SelectorError::Empty);
        }

        let absolute = raw.starts_with('/');
        let mut rest = raw;
        let mut steps = Vec::new();
        let mut attribute = None;
        let mut first = true;

        while !rest.is_empty() {
            let axis = if let Some(stripped) = rest.strip_prefix("//") {
                rest = stripped;
                Axis::Descendant
            } else if let Some(stripped) = rest.strip_prefix('/') {
                rest = stripped;
                Axis::Child
            } else if first {
                Axis::Child
            } else {
                // A slash was consumed by the previous segment split.
                Axis::Child
            };
            first = false;

            if rest.is_empty() {
                return Err(SelectorError::EmptySegment(raw.to_string()));
            }

            let (segment, remainder) = split_segment(rest)?;
            rest = remainder;

            if let Some(attr) = segment.strip_prefix('@') {
                validate_name(attr)?;
                if !rest.is_empty() {
                    return Err(SelectorError::AttributeNotLast(raw.to_string()));
                }
                attribute = Some(attr.to_string());
            } else {
                steps.push(parse_step(segment, axis)?);
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            absolute,
            steps,
            attribute,
        })
    }
}

/// Split off one segment, honoring `/` inside predicate brackets/quotes
fn split_segment(input: &str) -> Result<(&str, &str), SelectorError> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (pos, ch) in input.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(ch),
            (None, '[') => depth += 1,
            (None, ']') => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| SelectorError::UnclosedPredicate(input.to_string()))?;
            }
            (None, '/') if depth == 0 => return Ok((&input[..pos], &input[pos..])),
            _ => {}
        }
    }
    if depth != 0 || quote.is_some() {
        return Err(SelectorError::UnclosedPredicate(input.to_string()));
    }
    Ok((input, ""))
}

fn parse_step(segment: &str, axis: Axis) -> Result<Step, SelectorError> {
    let (name_part, mut predicate_part) = match segment.find('[') {
        Some(pos) => (&segment[..pos], &segment[pos..]),
        None => (segment, ""),
    };

    let test = if name_part == "*" {
        NameTest::Any
    } else {
        validate_name(name_part)?;
        NameTest::Name(name_part.to_string())
    };

    let mut predicates = Vec::new();
    while !predicate_part.is_empty() {
        let inner_start = predicate_part
            .strip_prefix('[')
            .ok_or_else(|| SelectorError::InvalidPredicate(predicate_part.to_string()))?;
        let close = find_predicate_end(inner_start)
            .ok_or_else(|| SelectorError::UnclosedPredicate(segment.to_string()))?;
        predicates.push(parse_predicate(&inner_start[..close])?);
        predicate_part = &inner_start[close + 1..];
    }

    Ok(Step {
        axis,
        test,
        predicates,
    })
}

fn find_predicate_end(input: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (pos, ch) in input.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(ch),
            (None, ']') => return Some(pos),
            _ => {}
        }
    }
    None
}

fn parse_predicate(inner: &str) -> Result<Predicate, SelectorError> {
    let body = inner
        .strip_prefix('@')
        .ok_or_else(|| SelectorError::InvalidPredicate(inner.to_string()))?;

    match body.find('=') {
        None => {
            validate_name(body)?;
            Ok(Predicate::AttrPresent(body.to_string()))
        }
        Some(eq) => {
            let name = &body[..eq];
            validate_name(name)?;
            let value = &body[eq + 1..];
            let unquoted = value
                .strip_prefix('\'')
                .and_then(|v| v.strip_suffix('\''))
                .or_else(|| value.strip_prefix('"').and_then(|v| v.strip_suffix('"')))
                .ok_or_else(|| SelectorError::InvalidPredicate(inner.to_string()))?;
            Ok(Predicate::AttrEquals(name.to_string(), unquoted.to_string()))
        }
    }
}

fn validate_name(name: &str) -> Result<(), SelectorError> {
    if name.is_empty() {
        return Err(SelectorError::EmptySegment(name.to_string()));
    }
    if name
        .chars()
        .any(|c| !c.is_alphanumeric() && !matches!(c, '_' | '-' | '.' | ':'))
    {
        return Err(SelectorError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Errors raised while parsing a selector
#[derive(Debug, thiserror::Error)]
pub enum SelectorError {
    /// Selector string was empty
    #[error("selector is empty")]
    Empty,

    /// A step between slashes was empty
    #[error("selector contains an empty step: {0}")]
    EmptySegment(String),

    /// Name test contains characters outside the XML-name subset
    #[error("invalid name in selector: {0}")]
    InvalidName(String),

    /// Predicate was not `[@attr]` or `[@attr='value']`
    #[error("invalid predicate: [{0}]")]
    InvalidPredicate(String),

    /// Bracket or quote never closed
    #[error("unclosed predicate in selector: {0}")]
    UnclosedPredicate(String),

    /// `@attr` must be the final step
    #[error("attribute step must be last: {0}")]
    AttributeNotLast(String),
}
