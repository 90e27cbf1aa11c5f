//! Injection/Ejection Symmetry Tests
//!
//! End-to-end checks over realistic documents: resolving, ejecting, and
//! resolving again must reproduce the same composed document, and
//! ejection must return exactly the authored state.

use folio_document::serialize;
use folio_pipeline::Pass;
use folio_resolve::{ConfigLinkResolver, Ejector, EDITABLE_ATTR, REFERENCE_ATTR, STATUS_ATTR};
use folio_test_utils::{
    document_with_reference, sample_report_document, test_context, test_context_for,
};

#[test]
fn resolve_annotates_every_reference_node() {
    let resolver = ConfigLinkResolver::with_defaults();
    let doc = resolver
        .apply(sample_report_document(), &test_context())
        .unwrap();

    let mut annotated = 0;
    let mut root = doc.root().clone();
    root.for_each_mut(&mut |node| {
        if node.has_attr(REFERENCE_ATTR) {
            assert!(node.has_attr(STATUS_ATTR));
            assert_eq!(node.attr(EDITABLE_ATTR), Some("false"));
            annotated += 1;
        }
    });
    assert_eq!(annotated, 3);
}

#[test]
fn resolve_fills_in_configuration_values() {
    let resolver = ConfigLinkResolver::with_defaults();
    let doc = resolver
        .apply(sample_report_document(), &test_context())
        .unwrap();

    assert_eq!(doc.root().node_at(&[0]).unwrap().text(), "Acme FY23");
    assert_eq!(
        doc.root().node_at(&[1]).unwrap().text(),
        "Published 15 March 2023"
    );
    assert_eq!(
        doc.root().node_at(&[3]).unwrap().text(),
        "help@example.com"
    );
}

#[test]
fn project_id_selects_the_config_branch() {
    let resolver = ConfigLinkResolver::with_defaults();
    let doc = resolver
        .apply(sample_report_document(), &test_context_for("P2"))
        .unwrap();

    assert_eq!(doc.root().node_at(&[0]).unwrap().text(), "Globex FY24");
    assert_eq!(
        doc.root().node_at(&[1]).unwrap().text(),
        "Published 1 July 2024"
    );
}

#[test]
fn eject_restores_authored_state() {
    let resolver = ConfigLinkResolver::with_defaults();
    let mut doc = resolver
        .apply(sample_report_document(), &test_context())
        .unwrap();
    Ejector::new().eject(&mut doc);

    let xml = serialize(&doc);
    assert!(xml.contains(REFERENCE_ATTR));
    assert!(!xml.contains(STATUS_ATTR));
    assert!(!xml.contains(EDITABLE_ATTR));
    assert!(!xml.contains("Acme FY23"));
    // Authored prose survives ejection untouched.
    assert!(xml.contains("Hand-written prose stays untouched."));
}

#[test]
fn resolve_eject_resolve_reaches_a_fixed_point() {
    let resolver = ConfigLinkResolver::with_defaults();
    let ctx = test_context();

    let first = resolver.apply(sample_report_document(), &ctx).unwrap();
    let mut ejected = first.clone();
    Ejector::new().eject(&mut ejected);
    let second = resolver.apply(ejected, &ctx).unwrap();

    assert_eq!(serialize(&first), serialize(&second));
}

#[test]
fn broken_references_round_trip_without_loss() {
    let resolver = ConfigLinkResolver::with_defaults();
    let ctx = test_context();

    for reference in ["badformat", "cms_unknown#@name", "cms_project#no-such-child"] {
        let resolved = resolver
            .apply(document_with_reference(reference), &ctx)
            .unwrap();
        let mut ejected = resolved.clone();
        Ejector::new().eject(&mut ejected);

        let node = ejected.root().node_at(&[0]).unwrap();
        assert_eq!(node.attr(REFERENCE_ATTR), Some(reference));
        assert_eq!(node.attr(STATUS_ATTR), None);
    }
}
