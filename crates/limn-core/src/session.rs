//! The validated mutation layer: one method per operation contract.

use crate::error::EditError;
use crate::model::{ClassSnapshot, Diagram, Field, Method, RelationKind, UmlClass};

/// Where operation outcomes go. Collaborators (prompt loop, canvas) decide
/// how the text is shown; the core only ever hands them strings.
pub trait Reporter {
    fn feedback(&mut self, text: &str);
    fn error(&mut self, text: &str);
}

/// A reporter that keeps everything it is told, for tests and for headless
/// callers that inspect outcomes after the fact.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    pub feedback: Vec<String>,
    pub errors: Vec<String>,
}

impl Reporter for MemoryReporter {
    fn feedback(&mut self, text: &str) {
        self.feedback.push(text.to_owned());
    }

    fn error(&mut self, text: &str) {
        self.errors.push(text.to_owned());
    }
}

/// Validated operations over the diagram. Every method checks its
/// preconditions, mutates only when they all hold, reports the outcome,
/// and returns whether the mutation happened. History is not involved at
/// this level, which lets command execute/undo re-enter these methods.
pub(crate) struct Session<R: Reporter> {
    pub(crate) diagram: Diagram,
    pub(crate) reporter: R,
}

impl<R: Reporter> Session<R> {
    pub(crate) fn new(diagram: Diagram, reporter: R) -> Self {
        Session { diagram, reporter }
    }

    fn report(&mut self, result: Result<String, EditError>) -> bool {
        match result {
            Ok(msg) => {
                tracing::debug!("{msg}");
                self.reporter.feedback(&msg);
                true
            }
            Err(err) => {
                let msg = err.to_string();
                tracing::debug!("rejected: {msg}");
                self.reporter.error(&msg);
                false
            }
        }
    }

    pub(crate) fn reject(&mut self, err: EditError) -> bool {
        self.report(Err(err))
    }

    /// A stateful undo found no captured value to restore.
    pub(crate) fn missing_capture(&mut self, what: String) -> bool {
        self.reject(EditError::not_found(format!(
            "No captured state to restore {what}"
        )))
    }

    // --- Classes ---

    pub(crate) fn add_class(&mut self, name: &str) -> bool {
        let result = if self.diagram.has_class(name) {
            Err(EditError::duplicate(format!("Class `{name}` already exists")))
        } else {
            self.diagram.insert_class(UmlClass::new(name));
            Ok(format!("Added class `{name}`!"))
        };
        self.report(result)
    }

    pub(crate) fn delete_class(&mut self, name: &str) -> bool {
        let result = if self.diagram.remove_class(name).is_some() {
            Ok(format!("Deleted class `{name}`!"))
        } else {
            Err(EditError::not_found(format!(
                "No class exists with the name `{name}`"
            )))
        };
        self.report(result)
    }

    /// Put back a deleted class exactly as captured: fields, methods, and
    /// the incident relationships whose far endpoints still hold.
    pub(crate) fn restore_class(&mut self, snapshot: &ClassSnapshot) -> bool {
        let name = snapshot.class.name.clone();
        let result = if self.diagram.has_class(&name) {
            Err(EditError::duplicate(format!("Class `{name}` already exists")))
        } else {
            self.diagram.insert_class(snapshot.class.clone());
            for rel in &snapshot.relationships {
                if self.diagram.has_class(&rel.src)
                    && self.diagram.has_class(&rel.dst)
                    && !self.diagram.has_relationship(&rel.src, &rel.dst)
                {
                    self.diagram.insert_relationship(&rel.src, &rel.dst, rel.kind);
                }
            }
            Ok(format!("Restored class `{name}`!"))
        };
        self.report(result)
    }

    pub(crate) fn rename_class(&mut self, from: &str, to: &str) -> bool {
        let result = if self.diagram.has_class(to) {
            Err(EditError::duplicate(format!(
                "`{to}` is an already existing class. Cannot rename."
            )))
        } else if !self.diagram.has_class(from) {
            Err(EditError::not_found(format!(
                "`{from}` does not exist. Cannot rename."
            )))
        } else {
            self.diagram.rename_class_key(from, to);
            Ok(format!("Renamed class `{from}` to `{to}`"))
        };
        self.report(result)
    }

    // --- Relationships ---

    pub(crate) fn add_relationship(&mut self, src: &str, dst: &str, kind: RelationKind) -> bool {
        let result = if self.diagram.has_relationship(src, dst) {
            Err(EditError::duplicate(format!(
                "There is already a relationship between `{src}` and `{dst}`"
            )))
        } else if !self.diagram.has_class(src) {
            Err(EditError::not_found(format!("Class `{src}` does not exist")))
        } else if !self.diagram.has_class(dst) {
            Err(EditError::not_found(format!("Class `{dst}` does not exist")))
        } else {
            self.diagram.insert_relationship(src, dst, kind);
            Ok(format!(
                "Added {} relationship between `{src}` and `{dst}`!",
                kind.label()
            ))
        };
        self.report(result)
    }

    /// Removes the relationship between `a` and `b` in whichever
    /// orientation it is stored.
    pub(crate) fn delete_relationship(&mut self, a: &str, b: &str) -> bool {
        let result = if self.diagram.remove_relationship(a, b).is_some() {
            Ok(format!("Removed relationship between `{a}` and `{b}`!"))
        } else if self.diagram.remove_relationship(b, a).is_some() {
            Ok(format!("Removed relationship between `{b}` and `{a}`!"))
        } else if !self.diagram.has_class(a) {
            Err(EditError::not_found(format!("Class `{a}` does not exist")))
        } else if !self.diagram.has_class(b) {
            Err(EditError::not_found(format!("Class `{b}` does not exist")))
        } else {
            Err(EditError::not_found(format!(
                "There is no relationship between `{a}` and `{b}`"
            )))
        };
        self.report(result)
    }

    pub(crate) fn edit_relationship(&mut self, a: &str, b: &str, kind: RelationKind) -> bool {
        let result = match self.diagram.stored_relationship(a, b) {
            None => Err(EditError::not_found(format!(
                "There is no relationship between `{a}` and `{b}`"
            ))),
            Some(rel) if rel.kind == kind => Err(EditError::no_op(format!(
                "The relationship between `{a}` and `{b}` is already {}",
                kind.label()
            ))),
            Some(rel) => {
                self.diagram.set_relationship_kind(&rel.src, &rel.dst, kind);
                Ok(format!(
                    "Changed relationship between `{a}` and `{b}` to {}",
                    kind.label()
                ))
            }
        };
        self.report(result)
    }

    // --- Fields ---

    pub(crate) fn add_field(&mut self, class: &str, name: &str) -> bool {
        let result = match self.diagram.class_mut(class) {
            None => Err(EditError::not_found(format!("Class `{class}` does not exist"))),
            Some(item) if item.has_field(name) => Err(EditError::duplicate(format!(
                "Field `{name}` already exists in the class `{class}`"
            ))),
            Some(item) => {
                item.fields.push(Field {
                    name: name.to_owned(),
                });
                Ok(format!("Field `{name}` has been added to class `{class}`!"))
            }
        };
        self.report(result)
    }

    pub(crate) fn delete_field(&mut self, class: &str, name: &str) -> bool {
        let result = match self.diagram.class_mut(class) {
            None => Err(EditError::not_found(format!("Class `{class}` does not exist"))),
            Some(item) => match item.fields.iter().position(|f| f.name == name) {
                None => Err(EditError::not_found(format!(
                    "Field `{name}` does not exist in class `{class}`"
                ))),
                Some(idx) => {
                    item.fields.remove(idx);
                    Ok(format!(
                        "Field `{name}` has been removed from class `{class}`!"
                    ))
                }
            },
        };
        self.report(result)
    }

    /// Renames a field in place; its position in the class is preserved.
    pub(crate) fn rename_field(&mut self, class: &str, from: &str, to: &str) -> bool {
        let result = match self.diagram.class_mut(class) {
            None => Err(EditError::not_found(format!("Class `{class}` does not exist"))),
            Some(item) if item.has_field(to) => Err(EditError::duplicate(format!(
                "Field `{to}` already exists in the class `{class}`"
            ))),
            Some(item) => match item.fields.iter_mut().find(|f| f.name == from) {
                None => Err(EditError::not_found(format!(
                    "Field `{from}` does not exist in class `{class}`"
                ))),
                Some(field) => {
                    field.name = to.to_owned();
                    Ok(format!("Field `{from}` renamed to `{to}`!"))
                }
            },
        };
        self.report(result)
    }

    // --- Methods ---

    pub(crate) fn add_method(&mut self, class: &str, name: &str, params: &[String]) -> bool {
        let result = match self.diagram.class_mut(class) {
            None => Err(EditError::not_found(format!("Class `{class}` does not exist"))),
            Some(item) if item.has_method(name) => Err(EditError::duplicate(format!(
                "Method `{name}` already exists in the class `{class}`"
            ))),
            Some(item) => {
                item.methods.push(Method {
                    name: name.to_owned(),
                    params: params.to_vec(),
                });
                Ok(format!("Method `{name}` has been added to class `{class}`!"))
            }
        };
        self.report(result)
    }

    pub(crate) fn delete_method(&mut self, class: &str, name: &str) -> bool {
        let result = match self.diagram.class_mut(class) {
            None => Err(EditError::not_found(format!("Class `{class}` does not exist"))),
            Some(item) => match item.methods.iter().position(|m| m.name == name) {
                None => Err(EditError::not_found(format!(
                    "Method `{name}` does not exist in class `{class}`"
                ))),
                Some(idx) => {
                    item.methods.remove(idx);
                    Ok(format!(
                        "Method `{name}` has been removed from class `{class}`!"
                    ))
                }
            },
        };
        self.report(result)
    }

    /// Renames a method in place; its parameter list and position are
    /// preserved.
    pub(crate) fn rename_method(&mut self, class: &str, from: &str, to: &str) -> bool {
        let result = match self.diagram.class_mut(class) {
            None => Err(EditError::not_found(format!("Class `{class}` does not exist"))),
            Some(item) if item.has_method(to) => Err(EditError::duplicate(format!(
                "Method `{to}` already exists in the class `{class}`"
            ))),
            Some(item) => match item.method_mut(from) {
                None => Err(EditError::not_found(format!(
                    "Method `{from}` does not exist in class `{class}`"
                ))),
                Some(method) => {
                    method.name = to.to_owned();
                    Ok(format!("Method `{from}` renamed to `{to}`!"))
                }
            },
        };
        self.report(result)
    }

    // --- Parameters ---

    /// Removes the first parameter matching `param`; duplicates beyond the
    /// first are untouched.
    pub(crate) fn remove_parameter(&mut self, class: &str, method: &str, param: &str) -> bool {
        let result = match self.diagram.class_mut(class) {
            None => Err(EditError::not_found(format!("Class `{class}` does not exist"))),
            Some(item) => match item.method_mut(method) {
                None => Err(EditError::not_found(format!(
                    "Method `{method}` does not exist in class `{class}`"
                ))),
                Some(m) => match m.params.iter().position(|p| p.as_str() == param) {
                    None => Err(EditError::not_found(format!(
                        "Method `{method}` did not have the parameter `{param}`"
                    ))),
                    Some(idx) => {
                        m.params.remove(idx);
                        Ok(format!(
                            "Removed parameter `{param}` from method `{method}`!"
                        ))
                    }
                },
            },
        };
        self.report(result)
    }

    pub(crate) fn clear_parameters(&mut self, class: &str, method: &str) -> bool {
        let result = match self.diagram.class_mut(class) {
            None => Err(EditError::not_found(format!("Class `{class}` does not exist"))),
            Some(item) => match item.method_mut(method) {
                None => Err(EditError::not_found(format!(
                    "Method `{method}` does not exist in class `{class}`"
                ))),
                Some(m) => {
                    m.params.clear();
                    Ok(format!("Cleared parameters of method `{method}`!"))
                }
            },
        };
        self.report(result)
    }

    /// Renames the first parameter matching `from`, in place; the list
    /// order is preserved.
    pub(crate) fn rename_parameter(
        &mut self,
        class: &str,
        method: &str,
        from: &str,
        to: &str,
    ) -> bool {
        let result = match self.diagram.class_mut(class) {
            None => Err(EditError::not_found(format!("Class `{class}` does not exist"))),
            Some(item) => match item.method_mut(method) {
                None => Err(EditError::not_found(format!(
                    "Method `{method}` does not exist in class `{class}`"
                ))),
                Some(m) => match m.params.iter_mut().find(|p| p.as_str() == from) {
                    None => Err(EditError::not_found(format!(
                        "Method `{method}` does not have a parameter named `{from}`"
                    ))),
                    Some(p) => {
                        *p = to.to_owned();
                        Ok(format!("Parameter `{from}` renamed to `{to}`!"))
                    }
                },
            },
        };
        self.report(result)
    }

    pub(crate) fn replace_parameters(
        &mut self,
        class: &str,
        method: &str,
        params: &[String],
    ) -> bool {
        let result = match self.diagram.class_mut(class) {
            None => Err(EditError::not_found(format!("Class `{class}` does not exist"))),
            Some(item) => match item.method_mut(method) {
                None => Err(EditError::not_found(format!(
                    "Method `{method}` does not exist in class `{class}`"
                ))),
                Some(m) => {
                    m.params = params.to_vec();
                    Ok(format!("Replaced parameters of method `{method}`!"))
                }
            },
        };
        self.report(result)
    }
}
