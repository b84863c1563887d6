//! End-to-end workflows through the public surface: build, traverse
//! history, persist, reload, keep editing.

use limn_core::{store, Diagram, Direction, Editor, MemoryReporter, RelationKind};

fn editor() -> Editor<MemoryReporter> {
    Editor::new(MemoryReporter::default())
}

fn params(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

#[test]
fn relationship_checks_are_symmetric_but_kind_lookup_is_ordered() {
    let mut ed = editor();
    assert!(ed.add_class("Foo"));
    assert!(ed.add_class("Bar"));
    assert!(ed.add_relationship("Foo", "Bar", "aggregate"));

    assert!(ed.diagram().has_relationship("Foo", "Bar"));
    assert!(ed.diagram().has_relationship("Bar", "Foo"));
    assert_eq!(
        ed.diagram().relationship_kind("Foo", "Bar"),
        Some(RelationKind::Aggregate)
    );
    assert_eq!(ed.diagram().relationship_kind("Bar", "Foo"), None);
}

#[test]
fn removing_a_parameter_is_reversible() {
    let mut ed = editor();
    ed.add_class("Foo");
    ed.add_method("Foo", "run", params(&["a", "b", "c"]));

    assert!(ed.remove_parameter("Foo", "run", "b"));
    let current = &ed.diagram().class("Foo").unwrap().method("run").unwrap().params;
    assert_eq!(*current, params(&["a", "c"]));

    assert!(ed.undo());
    let restored = &ed.diagram().class("Foo").unwrap().method("run").unwrap().params;
    assert_eq!(*restored, params(&["a", "b", "c"]));
}

#[test]
fn deleting_a_class_cascades_its_relationships() {
    let mut ed = editor();
    ed.add_class("Foo");
    ed.add_class("Bar");
    ed.add_relationship("Foo", "Bar", "composition");

    assert!(ed.delete_class("Foo"));
    assert_eq!(ed.diagram().relationships().count(), 0);
    assert!(ed.diagram().has_class("Bar"));
}

#[test]
fn one_undo_steps_back_exactly_one_operation() {
    let mut ed = editor();
    ed.add_class("Foo");
    ed.add_class("Bar");
    ed.add_field("Foo", "id");
    let before_last = ed.diagram().clone();

    ed.add_relationship("Foo", "Bar", "inheritance");
    let after_last = ed.diagram().clone();

    assert!(ed.undo());
    assert_eq!(*ed.diagram(), before_last);

    assert!(ed.redo());
    assert_eq!(*ed.diagram(), after_last);
}

#[test]
fn a_new_command_after_undo_closes_the_redo_branch() {
    let mut ed = editor();
    ed.add_class("A");
    ed.add_class("B");

    assert!(ed.undo());
    assert!(ed.can_redo());

    ed.add_class("C");
    assert!(!ed.can_redo());
    assert!(!ed.redo());
    assert!(!ed.diagram().has_class("B"));
}

#[test]
fn listing_relationships_from_either_endpoint() {
    let mut ed = editor();
    ed.add_class("Order");
    ed.add_class("Item");
    ed.add_class("Customer");
    ed.add_relationship("Order", "Item", "aggregate");
    ed.add_relationship("Customer", "Order", "composition");

    let links = ed.diagram().find_relationships("Order");
    assert_eq!(links.len(), 2);
    let outgoing = links
        .iter()
        .find(|l| l.direction == Direction::Outgoing)
        .unwrap();
    assert_eq!(outgoing.other, "Item");
    assert_eq!(outgoing.kind, RelationKind::Aggregate);
    let incoming = links
        .iter()
        .find(|l| l.direction == Direction::Incoming)
        .unwrap();
    assert_eq!(incoming.other, "Customer");
}

#[test]
fn save_reload_and_keep_editing() {
    let mut ed = editor();
    ed.add_class("Foo");
    ed.add_class("Bar");
    ed.add_field("Foo", "id");
    ed.add_method("Foo", "run", params(&["a", "b"]));
    ed.add_relationship("Foo", "Bar", "realization");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.limn");
    store::write_diagram_file(&path, ed.diagram()).unwrap();

    let loaded = store::read_diagram_file(&path).unwrap();
    assert_eq!(loaded, *ed.diagram());

    // A fresh session over the loaded document starts with empty history.
    let mut ed2 = Editor::with_diagram(loaded, MemoryReporter::default());
    assert!(!ed2.can_undo());

    assert!(ed2.delete_class("Bar"));
    assert_eq!(ed2.diagram().relationships().count(), 0);
    assert!(ed2.undo());
    assert_eq!(*ed2.diagram(), *ed.diagram());
}

#[test]
fn feedback_and_errors_flow_through_the_supplied_sink() {
    let mut ed = editor();
    ed.add_class("Foo");
    assert!(!ed.add_class("Foo"));

    assert_eq!(ed.reporter().feedback, ["Added class `Foo`!"]);
    assert_eq!(ed.reporter().errors, ["Class `Foo` already exists"]);
}

#[test]
fn exhausted_undo_and_redo_are_reported_no_ops() {
    let mut ed = editor();
    assert!(!ed.undo());
    assert!(!ed.redo());
    assert_eq!(
        ed.reporter().errors,
        ["Nothing to undo", "Nothing to redo"]
    );
    assert_eq!(*ed.diagram(), Diagram::new());

    ed.add_class("Foo");
    assert!(ed.undo());
    assert!(!ed.undo());
    assert_eq!(ed.reporter().errors.last().unwrap(), "Nothing to undo");
}
