//! Testing utilities for the Folio workspace
//!
//! Shared fixtures: a canned configuration tree, reference-bearing sample
//! documents, and context builders.

#![allow(missing_docs)]

use folio_config::ConfigTree;
use folio_document::{Document, Node};
use folio_pipeline::ResolveContext;
use folio_resolve::REFERENCE_ATTR;
use std::sync::Arc;

/// Project id the canned configuration routes to
pub const TEST_PROJECT_ID: &str = "P1";

/// Language used by the canned content fixtures
pub const TEST_LANGUAGE: &str = "en";

const TEST_CONFIG: &str = r#"<configuration>
    <cms_projects>
        <cms_project id="P1" name="Acme FY23" date-publication="2023-03-15T00:00:00">
            <metadata_location>projects/p1/meta</metadata_location>
        </cms_project>
        <cms_project id="P2" name="Globex FY24" date-publication="2024-07-01T00:00:00">
            <metadata_location>projects/p2/meta</metadata_location>
        </cms_project>
    </cms_projects>
    <general>
        <support-email>help@example.com</support-email>
    </general>
</configuration>"#;

pub fn test_config() -> ConfigTree {
    ConfigTree::from_xml(TEST_CONFIG).unwrap()
}

pub fn test_context() -> ResolveContext {
    ResolveContext::new(TEST_PROJECT_ID, TEST_LANGUAGE, Arc::new(test_config()))
}

pub fn test_context_for(project_id: &str) -> ResolveContext {
    ResolveContext::new(project_id, TEST_LANGUAGE, Arc::new(test_config()))
}

/// A minimal content document holding one reference-bearing span
pub fn document_with_reference(reference: &str) -> Document {
    Document::new(
        Node::new("content")
            .with_attr("lang", TEST_LANGUAGE)
            .with_child(Node::new("span").with_attr(REFERENCE_ATTR, reference)),
    )
}

/// A content document mixing authored prose with several references
pub fn sample_report_document() -> Document {
    Document::new(
        Node::new("content")
            .with_attr("lang", TEST_LANGUAGE)
            .with_child(
                Node::new("h1").with_attr(REFERENCE_ATTR, "cms_project#@name"),
            )
            .with_child(
                Node::new("p")
                    .with_text("Published ")
                    .with_child(Node::new("span").with_attr(
                        REFERENCE_ATTR,
                        "cms_project#@date-publication#dateformat:d MMMM yyyy",
                    )),
            )
            .with_child(Node::new("p").with_text("Hand-written prose stays untouched."))
            .with_child(
                Node::new("footer").with_attr(REFERENCE_ATTR, "cms_general#support-email"),
            ),
    )
}
