//! XML parse and serialize
//!
//! Parsing goes through `quick-xml`; serialization is a small hand-rolled
//! escaped writer. Empty elements are always written with an explicit end
//! tag - the stored format defines content elements, and a self-closing
//! form must never reach downstream consumers.

use crate::node::{Document, Node, NodeChild};
use quick_xml::events::attributes::AttrError;
use quick_xml::events::Event;
use quick_xml::Reader;

/// Errors raised while reading stored XML fragments
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// Underlying reader error (malformed markup, bad escapes)
    #[error("malformed xml: {0}")]
    Malformed(#[from] quick_xml::Error),

    /// Attribute syntax error
    #[error("malformed attribute: {0}")]
    Attribute(#[from] AttrError),

    /// Names must be valid UTF-8
    #[error("non-utf8 name in xml")]
    NonUtf8Name,

    /// Document had no root element
    #[error("xml fragment has no root element")]
    NoRootElement,

    /// Document had more than one root element
    #[error("xml fragment has multiple root elements")]
    MultipleRootElements,

    /// End tag without a matching start tag
    #[error("unbalanced end tag in xml")]
    UnbalancedEndTag,
}

/// Parse a stored XML fragment into a [`Document`].
///
/// Elements, attributes, text, CDATA (as text) and comments are kept;
/// whitespace-only text between elements is dropped. Processing
/// instructions and doctypes are skipped; an XML declaration is recorded
/// so serialization can reproduce it.
pub fn parse(input: &str) -> Result<Document, XmlError> {
    let mut reader = Reader::from_str(input);

    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;
    let mut has_declaration = false;

    loop {
        match reader.read_event()? {
            Event::Decl(_) => has_declaration = true,
            Event::Start(start) => {
                let mut node = Node::new(name_of(start.name().as_ref())?);
                for attr in start.attributes() {
                    let attr = attr?;
                    let key = name_of(attr.key.as_ref())?;
                    let value = attr.unescape_value()?.into_owned();
                    node.set_attr(key, value);
                }
                stack.push(node);
            }
            Event::Empty(start) => {
                let mut node = Node::new(name_of(start.name().as_ref())?);
                for attr in start.attributes() {
                    let attr = attr?;
                    let key = name_of(attr.key.as_ref())?;
                    let value = attr.unescape_value()?.into_owned();
                    node.set_attr(key, value);
                }
                attach(&mut stack, &mut root, NodeChild::Element(node))?;
            }
            Event::End(_) => {
                let node = stack.pop().ok_or(XmlError::UnbalancedEndTag)?;
                attach(&mut stack, &mut root, NodeChild::Element(node))?;
            }
            Event::Text(text) => {
                let value = text.unescape()?.into_owned();
                // Formatting whitespace between elements is dropped;
                // interior whitespace of mixed content is authored text
                // and must survive a load/save cycle untouched.
                if !value.trim().is_empty() {
                    attach(&mut stack, &mut root, NodeChild::Text(value))?;
                }
            }
            Event::CData(cdata) => {
                let value =
                    String::from_utf8(cdata.into_inner().into_owned())
                        .map_err(|_| XmlError::NonUtf8Name)?;
                if !value.is_empty() {
                    attach(&mut stack, &mut root, NodeChild::Text(value))?;
                }
            }
            Event::Comment(comment) => {
                let value = comment.unescape()?.into_owned();
                attach(&mut stack, &mut root, NodeChild::Comment(value))?;
            }
            Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    let root = root.ok_or(XmlError::NoRootElement)?;
    let doc = Document::new(root);
    Ok(if has_declaration {
        doc.with_declaration()
    } else {
        doc
    })
}

fn name_of(bytes: &[u8]) -> Result<String, XmlError> {
    std::str::from_utf8(bytes)
        .map(ToOwned::to_owned)
        .map_err(|_| XmlError::NonUtf8Name)
}

fn attach(
    stack: &mut Vec<Node>,
    root: &mut Option<Node>,
    child: NodeChild,
) -> Result<(), XmlError> {
    if let Some(parent) = stack.last_mut() {
        parent.push_child(child);
        return Ok(());
    }
    match child {
        NodeChild::Element(node) => {
            if root.is_some() {
                return Err(XmlError::MultipleRootElements);
            }
            *root = Some(node);
            Ok(())
        }
        // Stray text/comments outside the root are dropped.
        NodeChild::Text(_) | NodeChild::Comment(_) => Ok(()),
    }
}

/// Serialize a [`Document`] back to XML text.
#[must_use]
pub fn serialize(doc: &Document) -> String {
    let mut out = String::new();
    if doc.has_declaration() {
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    }
    write_node(&mut out, doc.root());
    out
}

fn write_node(out: &mut String, node: &Node) {
    out.push('<');
    out.push_str(node.name());
    for (key, value) in node.attrs() {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
    out.push('>');
    for child in node.children() {
        match child {
            NodeChild::Element(element) => write_node(out, element),
            NodeChild::Text(text) => out.push_str(&escape_text(text)),
            NodeChild::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
        }
    }
    out.push_str("</");
    out.push_str(node.name());
    out.push('>');
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_simple_fragment() {
        let doc = parse(r#"<content lang="en"><p>Hello</p></content>"#).unwrap();
        assert_eq!(doc.root().name(), "content");
        assert_eq!(doc.root().attr("lang"), Some("en"));
        assert_eq!(doc.root().text(), "Hello");
    }

    #[test]
    fn parse_records_declaration() {
        let doc = parse("<?xml version=\"1.0\"?><a></a>").unwrap();
        assert!(doc.has_declaration());
    }

    #[test]
    fn parse_self_closing_becomes_empty_element() {
        let doc = parse(r#"<a><b id="1"/></a>"#).unwrap();
        let b = doc.root().node_at(&[0]).unwrap();
        assert_eq!(b.name(), "b");
        assert_eq!(b.attr("id"), Some("1"));
        assert!(b.children().is_empty());
    }

    #[test]
    fn parse_keeps_comments() {
        let doc = parse("<a><!----></a>").unwrap();
        assert_eq!(doc.root().children(), &[NodeChild::Comment(String::new())]);
    }

    #[test]
    fn parse_unescapes_entities() {
        let doc = parse(r#"<a t="x &amp; y">1 &lt; 2</a>"#).unwrap();
        assert_eq!(doc.root().attr("t"), Some("x & y"));
        assert_eq!(doc.root().text(), "1 < 2");
    }

    #[test]
    fn parse_preserves_interior_whitespace_in_mixed_content() {
        let source = r#"<p>Published <span data-configurationlink="cms_project#@date-publication">15 March 2023</span> by Acme</p>"#;
        let doc = parse(source).unwrap();
        assert_eq!(
            doc.root().children()[0],
            NodeChild::Text("Published ".to_string())
        );
        assert_eq!(doc.root().text(), "Published 15 March 2023 by Acme");
        assert_eq!(serialize(&doc), source);
    }

    #[test]
    fn parse_drops_whitespace_only_text_between_elements() {
        let doc = parse("<a>\n    <b></b>\n    <c></c>\n</a>").unwrap();
        assert_eq!(doc.root().children().len(), 2);
        assert_eq!(doc.root().node_at(&[0]).unwrap().name(), "b");
        assert_eq!(doc.root().node_at(&[1]).unwrap().name(), "c");
    }

    #[test]
    fn parse_rejects_empty_input() {
        assert!(matches!(parse(""), Err(XmlError::NoRootElement)));
    }

    #[test]
    fn parse_rejects_multiple_roots() {
        assert!(matches!(
            parse("<a></a><b></b>"),
            Err(XmlError::MultipleRootElements)
        ));
    }

    #[test]
    fn parse_rejects_malformed_markup() {
        assert!(parse("<a><b></a>").is_err());
    }

    #[test]
    fn serialize_never_self_closes() {
        let doc = Document::new(Node::new("placeholder"));
        assert_eq!(serialize(&doc), "<placeholder></placeholder>");
    }

    #[test]
    fn serialize_escapes_attributes_and_text() {
        let doc = Document::new(
            Node::new("a")
                .with_attr("t", r#"x "&" y"#)
                .with_text("1 < 2"),
        );
        assert_eq!(
            serialize(&doc),
            r#"<a t="x &quot;&amp;&quot; y">1 &lt; 2</a>"#
        );
    }

    #[test]
    fn serialize_writes_comment_placeholder() {
        let mut node = Node::new("span").with_attr("data-configurationlink", "cms_project#@name");
        node.push_child(NodeChild::Comment(String::new()));
        assert_eq!(
            serialize(&Document::new(node)),
            r#"<span data-configurationlink="cms_project#@name"><!----></span>"#
        );
    }

    #[test]
    fn serialize_includes_declaration() {
        let doc = Document::new(Node::new("a")).with_declaration();
        assert!(serialize(&doc).starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
    }

    #[test]
    fn parse_serialize_roundtrip_is_stable() {
        let source =
            r#"<content lang="en"><section><span data-configurationlink="cms_project#@name"><!----></span></section></content>"#;
        let doc = parse(source).unwrap();
        let written = serialize(&doc);
        assert_eq!(written, source);
        assert_eq!(parse(&written).unwrap(), doc);
    }
}
