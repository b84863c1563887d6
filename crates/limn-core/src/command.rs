//! The command catalog: one variant per reversible operation.

use crate::model::{ClassSnapshot, RelationKind, Relationship};
use crate::session::{Reporter, Session};

/// A recorded mutation: enough state to perform it and to reverse it.
///
/// Stateless variants derive their inverse from the original arguments.
/// Stateful variants capture the pre-mutation value during `execute`,
/// before mutating, since the inverse is not derivable from the arguments
/// alone. A capture that is still `None` at undo time is reported as an
/// undo failure.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    AddClass {
        name: String,
    },
    DeleteClass {
        name: String,
        snapshot: Option<ClassSnapshot>,
    },
    RenameClass {
        from: String,
        to: String,
    },
    AddRelationship {
        src: String,
        dst: String,
        kind: RelationKind,
    },
    DeleteRelationship {
        a: String,
        b: String,
        removed: Option<Relationship>,
    },
    EditRelationship {
        a: String,
        b: String,
        kind: RelationKind,
        prior: Option<RelationKind>,
    },
    AddField {
        class: String,
        field: String,
    },
    DeleteField {
        class: String,
        field: String,
    },
    RenameField {
        class: String,
        from: String,
        to: String,
    },
    AddMethod {
        class: String,
        method: String,
        params: Vec<String>,
    },
    DeleteMethod {
        class: String,
        method: String,
        params: Option<Vec<String>>,
    },
    RenameMethod {
        class: String,
        from: String,
        to: String,
    },
    RemoveParameter {
        class: String,
        method: String,
        param: String,
        prior: Option<Vec<String>>,
    },
    ClearParameters {
        class: String,
        method: String,
        prior: Option<Vec<String>>,
    },
    RenameParameter {
        class: String,
        method: String,
        from: String,
        to: String,
    },
    ReplaceParameters {
        class: String,
        method: String,
        params: Vec<String>,
        prior: Option<Vec<String>>,
    },
}

impl Command {
    /// Run the operation forward. Stateful variants capture whatever undo
    /// will need first, then re-enter the session operation, so a redo
    /// re-validates exactly like a fresh execute.
    pub(crate) fn execute<R: Reporter>(&mut self, session: &mut Session<R>) -> bool {
        match self {
            Command::AddClass { name } => session.add_class(name),
            Command::DeleteClass { name, snapshot } => {
                *snapshot = session.diagram.snapshot_class(name);
                session.delete_class(name)
            }
            Command::RenameClass { from, to } => session.rename_class(from, to),
            Command::AddRelationship { src, dst, kind } => {
                session.add_relationship(src, dst, *kind)
            }
            Command::DeleteRelationship { a, b, removed } => {
                *removed = session.diagram.stored_relationship(a, b);
                session.delete_relationship(a, b)
            }
            Command::EditRelationship { a, b, kind, prior } => {
                *prior = session.diagram.stored_relationship(a, b).map(|r| r.kind);
                session.edit_relationship(a, b, *kind)
            }
            Command::AddField { class, field } => session.add_field(class, field),
            Command::DeleteField { class, field } => session.delete_field(class, field),
            Command::RenameField { class, from, to } => session.rename_field(class, from, to),
            Command::AddMethod {
                class,
                method,
                params,
            } => session.add_method(class, method, params),
            Command::DeleteMethod {
                class,
                method,
                params,
            } => {
                *params = session.diagram.method_params(class, method);
                session.delete_method(class, method)
            }
            Command::RenameMethod { class, from, to } => session.rename_method(class, from, to),
            Command::RemoveParameter {
                class,
                method,
                param,
                prior,
            } => {
                *prior = session.diagram.method_params(class, method);
                session.remove_parameter(class, method, param)
            }
            Command::ClearParameters {
                class,
                method,
                prior,
            } => {
                *prior = session.diagram.method_params(class, method);
                session.clear_parameters(class, method)
            }
            Command::RenameParameter {
                class,
                method,
                from,
                to,
            } => session.rename_parameter(class, method, from, to),
            Command::ReplaceParameters {
                class,
                method,
                params,
                prior,
            } => {
                *prior = session.diagram.method_params(class, method);
                session.replace_parameters(class, method, params)
            }
        }
    }

    /// Run the semantic inverse of the operation.
    pub(crate) fn undo<R: Reporter>(&self, session: &mut Session<R>) -> bool {
        match self {
            Command::AddClass { name } => session.delete_class(name),
            Command::DeleteClass { name, snapshot } => match snapshot {
                Some(snap) => session.restore_class(snap),
                None => session.missing_capture(format!("class `{name}`")),
            },
            Command::RenameClass { from, to } => session.rename_class(to, from),
            Command::AddRelationship { src, dst, .. } => session.delete_relationship(src, dst),
            Command::DeleteRelationship { a, b, removed } => match removed {
                Some(rel) => session.add_relationship(&rel.src, &rel.dst, rel.kind),
                None => session.missing_capture(format!(
                    "the relationship between `{a}` and `{b}`"
                )),
            },
            Command::EditRelationship { a, b, prior, .. } => match prior {
                Some(kind) => session.edit_relationship(a, b, *kind),
                None => session.missing_capture(format!(
                    "the relationship between `{a}` and `{b}`"
                )),
            },
            Command::AddField { class, field } => session.delete_field(class, field),
            Command::DeleteField { class, field } => session.add_field(class, field),
            Command::RenameField { class, from, to } => session.rename_field(class, to, from),
            Command::AddMethod { class, method, .. } => session.delete_method(class, method),
            Command::DeleteMethod {
                class,
                method,
                params,
            } => match params {
                Some(p) => session.add_method(class, method, p),
                None => session.missing_capture(format!("method `{method}` of `{class}`")),
            },
            Command::RenameMethod { class, from, to } => session.rename_method(class, to, from),
            Command::RemoveParameter {
                class,
                method,
                prior,
                ..
            }
            | Command::ClearParameters {
                class,
                method,
                prior,
            }
            | Command::ReplaceParameters {
                class,
                method,
                prior,
                ..
            } => match prior {
                Some(p) => session.replace_parameters(class, method, p),
                None => session.missing_capture(format!(
                    "the parameters of method `{method}` of `{class}`"
                )),
            },
            Command::RenameParameter {
                class,
                method,
                from,
                to,
            } => session.rename_parameter(class, method, to, from),
        }
    }

    /// Short operation name for log lines.
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Command::AddClass { .. } => "add_class",
            Command::DeleteClass { .. } => "delete_class",
            Command::RenameClass { .. } => "rename_class",
            Command::AddRelationship { .. } => "add_relationship",
            Command::DeleteRelationship { .. } => "delete_relationship",
            Command::EditRelationship { .. } => "edit_relationship",
            Command::AddField { .. } => "add_field",
            Command::DeleteField { .. } => "delete_field",
            Command::RenameField { .. } => "rename_field",
            Command::AddMethod { .. } => "add_method",
            Command::DeleteMethod { .. } => "delete_method",
            Command::RenameMethod { .. } => "rename_method",
            Command::RemoveParameter { .. } => "remove_parameter",
            Command::ClearParameters { .. } => "clear_parameters",
            Command::RenameParameter { .. } => "rename_parameter",
            Command::ReplaceParameters { .. } => "replace_parameters",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Diagram;
    use crate::session::MemoryReporter;

    fn session() -> Session<MemoryReporter> {
        Session::new(Diagram::new(), MemoryReporter::default())
    }

    #[test]
    fn delete_method_captures_params_for_undo() {
        let mut s = session();
        s.add_class("Foo");
        s.add_method("Foo", "run", &["a".to_owned(), "b".to_owned()]);

        let mut cmd = Command::DeleteMethod {
            class: "Foo".to_owned(),
            method: "run".to_owned(),
            params: None,
        };
        assert!(cmd.execute(&mut s));
        assert!(s.diagram.class("Foo").unwrap().methods.is_empty());

        assert!(cmd.undo(&mut s));
        assert_eq!(
            s.diagram.method_params("Foo", "run").unwrap(),
            ["a", "b"]
        );
    }

    #[test]
    fn delete_relationship_undo_restores_stored_orientation() {
        let mut s = session();
        s.add_class("Foo");
        s.add_class("Bar");
        s.add_relationship("Foo", "Bar", RelationKind::Inheritance);

        // Delete issued with the endpoints reversed relative to storage.
        let mut cmd = Command::DeleteRelationship {
            a: "Bar".to_owned(),
            b: "Foo".to_owned(),
            removed: None,
        };
        assert!(cmd.execute(&mut s));
        assert!(!s.diagram.has_relationship("Foo", "Bar"));

        assert!(cmd.undo(&mut s));
        assert_eq!(
            s.diagram.relationship_kind("Foo", "Bar"),
            Some(RelationKind::Inheritance)
        );
        assert_eq!(s.diagram.relationship_kind("Bar", "Foo"), None);
    }

    #[test]
    fn undo_without_a_capture_fails_gracefully() {
        let mut s = session();
        s.add_class("Foo");

        let cmd = Command::DeleteMethod {
            class: "Foo".to_owned(),
            method: "run".to_owned(),
            params: None,
        };
        assert!(!cmd.undo(&mut s));
        assert!(s
            .reporter
            .errors
            .last()
            .unwrap()
            .starts_with("No captured state to restore"));
    }

    #[test]
    fn failed_execute_leaves_no_partial_capture_effects() {
        let mut s = session();
        let mut cmd = Command::DeleteClass {
            name: "Ghost".to_owned(),
            snapshot: None,
        };
        assert!(!cmd.execute(&mut s));
        assert!(matches!(cmd, Command::DeleteClass { snapshot: None, .. }));
    }

    #[test]
    fn edit_relationship_undo_restores_the_prior_kind() {
        let mut s = session();
        s.add_class("Foo");
        s.add_class("Bar");
        s.add_relationship("Foo", "Bar", RelationKind::Aggregate);

        let mut cmd = Command::EditRelationship {
            a: "Bar".to_owned(),
            b: "Foo".to_owned(),
            kind: RelationKind::Composition,
            prior: None,
        };
        assert!(cmd.execute(&mut s));
        assert_eq!(
            s.diagram.relationship_kind("Foo", "Bar"),
            Some(RelationKind::Composition)
        );

        assert!(cmd.undo(&mut s));
        assert_eq!(
            s.diagram.relationship_kind("Foo", "Bar"),
            Some(RelationKind::Aggregate)
        );
    }
}
