//! The editing entry point: validate, mutate, record, replay.

use crate::command::Command;
use crate::error::EditError;
use crate::history::History;
use crate::model::{Diagram, RelationKind};
use crate::session::{Reporter, Session};

/// Owns one diagram for the lifetime of an editing session.
///
/// Every operation validates against the diagram, mutates it only when all
/// preconditions hold, reports the outcome through the supplied sink, and
/// returns whether the mutation happened. Only successful mutations enter
/// the undo history. `undo`/`redo` replay recorded commands
/// through the same operation bodies, so a redo re-validates exactly like
/// a fresh execute.
pub struct Editor<R: Reporter> {
    session: Session<R>,
    history: History,
}

impl<R: Reporter> Editor<R> {
    pub fn new(reporter: R) -> Self {
        Self::with_diagram(Diagram::new(), reporter)
    }

    /// Start a session over an existing diagram, e.g. one loaded from disk.
    pub fn with_diagram(diagram: Diagram, reporter: R) -> Self {
        Editor {
            session: Session::new(diagram, reporter),
            history: History::new(),
        }
    }

    pub fn diagram(&self) -> &Diagram {
        &self.session.diagram
    }

    pub fn reporter(&self) -> &R {
        &self.session.reporter
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn apply(&mut self, mut command: Command) -> bool {
        let ok = command.execute(&mut self.session);
        if ok {
            tracing::debug!(op = command.label(), "recorded");
            self.history.record(command);
        }
        ok
    }

    // --- Operations ---

    pub fn add_class(&mut self, name: &str) -> bool {
        self.apply(Command::AddClass {
            name: name.to_owned(),
        })
    }

    pub fn delete_class(&mut self, name: &str) -> bool {
        self.apply(Command::DeleteClass {
            name: name.to_owned(),
            snapshot: None,
        })
    }

    pub fn rename_class(&mut self, from: &str, to: &str) -> bool {
        self.apply(Command::RenameClass {
            from: from.to_owned(),
            to: to.to_owned(),
        })
    }

    /// `kind` is a relationship tag such as `"aggregate"` or
    /// `"Inheritance"`; unrecognized tags are rejected without touching the
    /// diagram.
    pub fn add_relationship(&mut self, src: &str, dst: &str, kind: &str) -> bool {
        let Some(kind) = RelationKind::parse(kind) else {
            return self.session.reject(EditError::invalid_argument(format!(
                "`{kind}` is not a relationship type"
            )));
        };
        self.apply(Command::AddRelationship {
            src: src.to_owned(),
            dst: dst.to_owned(),
            kind,
        })
    }

    pub fn delete_relationship(&mut self, a: &str, b: &str) -> bool {
        self.apply(Command::DeleteRelationship {
            a: a.to_owned(),
            b: b.to_owned(),
            removed: None,
        })
    }

    pub fn edit_relationship(&mut self, a: &str, b: &str, kind: &str) -> bool {
        let Some(kind) = RelationKind::parse(kind) else {
            return self.session.reject(EditError::invalid_argument(format!(
                "`{kind}` is not a relationship type"
            )));
        };
        self.apply(Command::EditRelationship {
            a: a.to_owned(),
            b: b.to_owned(),
            kind,
            prior: None,
        })
    }

    pub fn add_field(&mut self, class: &str, name: &str) -> bool {
        self.apply(Command::AddField {
            class: class.to_owned(),
            field: name.to_owned(),
        })
    }

    pub fn delete_field(&mut self, class: &str, name: &str) -> bool {
        self.apply(Command::DeleteField {
            class: class.to_owned(),
            field: name.to_owned(),
        })
    }

    pub fn rename_field(&mut self, class: &str, from: &str, to: &str) -> bool {
        self.apply(Command::RenameField {
            class: class.to_owned(),
            from: from.to_owned(),
            to: to.to_owned(),
        })
    }

    pub fn add_method(&mut self, class: &str, name: &str, params: Vec<String>) -> bool {
        self.apply(Command::AddMethod {
            class: class.to_owned(),
            method: name.to_owned(),
            params,
        })
    }

    pub fn delete_method(&mut self, class: &str, name: &str) -> bool {
        self.apply(Command::DeleteMethod {
            class: class.to_owned(),
            method: name.to_owned(),
            params: None,
        })
    }

    pub fn rename_method(&mut self, class: &str, from: &str, to: &str) -> bool {
        self.apply(Command::RenameMethod {
            class: class.to_owned(),
            from: from.to_owned(),
            to: to.to_owned(),
        })
    }

    pub fn remove_parameter(&mut self, class: &str, method: &str, param: &str) -> bool {
        self.apply(Command::RemoveParameter {
            class: class.to_owned(),
            method: method.to_owned(),
            param: param.to_owned(),
            prior: None,
        })
    }

    pub fn clear_parameters(&mut self, class: &str, method: &str) -> bool {
        self.apply(Command::ClearParameters {
            class: class.to_owned(),
            method: method.to_owned(),
            prior: None,
        })
    }

    pub fn rename_parameter(&mut self, class: &str, method: &str, from: &str, to: &str) -> bool {
        self.apply(Command::RenameParameter {
            class: class.to_owned(),
            method: method.to_owned(),
            from: from.to_owned(),
            to: to.to_owned(),
        })
    }

    pub fn replace_parameters(&mut self, class: &str, method: &str, params: Vec<String>) -> bool {
        self.apply(Command::ReplaceParameters {
            class: class.to_owned(),
            method: method.to_owned(),
            params,
            prior: None,
        })
    }

    // --- Traversal ---

    /// Reverse the command at the cursor. Exhausted history is a reported
    /// no-op; a failed reversal leaves the cursor where it was.
    pub fn undo(&mut self) -> bool {
        let Some(command) = self.history.undo_target() else {
            return self.session.reject(EditError::no_op("Nothing to undo"));
        };
        tracing::debug!(op = command.label(), "undo");
        let ok = command.undo(&mut self.session);
        if ok {
            self.history.retreat();
        }
        ok
    }

    /// Re-execute the command just past the cursor. Exhausted history is a
    /// reported no-op; a failed re-execute leaves the cursor where it was.
    pub fn redo(&mut self) -> bool {
        let Some(command) = self.history.redo_target() else {
            return self.session.reject(EditError::no_op("Nothing to redo"));
        };
        tracing::debug!(op = command.label(), "redo");
        let ok = command.execute(&mut self.session);
        if ok {
            self.history.advance();
        }
        ok
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::session::MemoryReporter;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        AddClass(String),
        DeleteClass(String),
        RenameClass(String, String),
        AddRelationship(String, String, String),
        DeleteRelationship(String, String),
        AddField(String, String),
        AddMethod(String, String, Vec<String>),
        RemoveParameter(String, String, String),
    }

    fn class_name() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["A", "B", "C", "D"]).prop_map(str::to_owned)
    }

    fn member_name() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["id", "run", "next", "name"]).prop_map(str::to_owned)
    }

    fn kind_tag() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["aggregate", "composition", "inheritance", "realization"])
            .prop_map(str::to_owned)
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            class_name().prop_map(Op::AddClass),
            class_name().prop_map(Op::DeleteClass),
            (class_name(), class_name()).prop_map(|(a, b)| Op::RenameClass(a, b)),
            (class_name(), class_name(), kind_tag())
                .prop_map(|(a, b, k)| Op::AddRelationship(a, b, k)),
            (class_name(), class_name()).prop_map(|(a, b)| Op::DeleteRelationship(a, b)),
            (class_name(), member_name()).prop_map(|(c, f)| Op::AddField(c, f)),
            (class_name(), member_name(), prop::collection::vec(member_name(), 0..3))
                .prop_map(|(c, m, p)| Op::AddMethod(c, m, p)),
            (class_name(), member_name(), member_name())
                .prop_map(|(c, m, p)| Op::RemoveParameter(c, m, p)),
        ]
    }

    fn run(ed: &mut Editor<MemoryReporter>, op: &Op) {
        match op {
            Op::AddClass(n) => ed.add_class(n),
            Op::DeleteClass(n) => ed.delete_class(n),
            Op::RenameClass(a, b) => ed.rename_class(a, b),
            Op::AddRelationship(a, b, k) => ed.add_relationship(a, b, k),
            Op::DeleteRelationship(a, b) => ed.delete_relationship(a, b),
            Op::AddField(c, f) => ed.add_field(c, f),
            Op::AddMethod(c, m, p) => ed.add_method(c, m, p.clone()),
            Op::RemoveParameter(c, m, p) => ed.remove_parameter(c, m, p),
        };
    }

    proptest! {
        /// After any operation sequence, at most one relationship exists
        /// per unordered pair, and every endpoint names a present class.
        #[test]
        fn invariants_hold_under_any_operation_sequence(
            ops in prop::collection::vec(op(), 1..40),
        ) {
            let mut ed = Editor::new(MemoryReporter::default());
            for op in &ops {
                run(&mut ed, op);
            }

            let rels: Vec<_> = ed.diagram().relationships().collect();
            for rel in &rels {
                prop_assert!(ed.diagram().has_class(&rel.src));
                prop_assert!(ed.diagram().has_class(&rel.dst));
                if rel.src != rel.dst {
                    prop_assert!(
                        ed.diagram().relationship_kind(&rel.dst, &rel.src).is_none(),
                        "both orientations stored for `{}`/`{}`",
                        rel.src,
                        rel.dst
                    );
                }
            }
        }

        /// Undoing everything returns to the empty diagram; redoing
        /// everything returns to the final state.
        #[test]
        fn full_undo_and_redo_replay_the_session(
            ops in prop::collection::vec(op(), 1..40),
        ) {
            let mut ed = Editor::new(MemoryReporter::default());
            for op in &ops {
                run(&mut ed, op);
            }
            let final_state = ed.diagram().clone();

            while ed.can_undo() {
                prop_assert!(ed.undo());
            }
            prop_assert_eq!(ed.diagram(), &Diagram::new());

            while ed.can_redo() {
                prop_assert!(ed.redo());
            }
            prop_assert_eq!(ed.diagram(), &final_state);
        }
    }
}
