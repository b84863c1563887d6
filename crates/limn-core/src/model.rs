//! Entities and the diagram document they live in.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// --- Entities ---

/// A named attribute of a class. Identity is the name alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Field {
    pub name: String,
}

/// A named operation of a class. Identity is the name alone; the parameter
/// list is ordered and may contain repeated values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub params: Vec<String>,
}

/// A class: a name plus its fields and methods, in declaration order.
/// No two fields share a name and no two methods share a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UmlClass {
    pub name: String,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
}

impl UmlClass {
    pub fn new(name: &str) -> Self {
        UmlClass {
            name: name.to_owned(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.iter().any(|m| m.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub(crate) fn method_mut(&mut self, name: &str) -> Option<&mut Method> {
        self.methods.iter_mut().find(|m| m.name == name)
    }
}

/// How two classes relate. Wire tags are the capitalized variant names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub enum RelationKind {
    Aggregate,
    Composition,
    Inheritance,
    Realization,
}

impl RelationKind {
    /// Parse a user-supplied kind tag, case-insensitively. Unrecognized
    /// tags yield `None`.
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "aggregate" => Some(RelationKind::Aggregate),
            "composition" => Some(RelationKind::Composition),
            "inheritance" => Some(RelationKind::Inheritance),
            "realization" => Some(RelationKind::Realization),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RelationKind::Aggregate => "Aggregate",
            RelationKind::Composition => "Composition",
            RelationKind::Inheritance => "Inheritance",
            RelationKind::Realization => "Realization",
        }
    }
}

/// A typed, directed edge between two classes, in stored orientation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Relationship {
    #[serde(rename = "source")]
    pub src: String,
    #[serde(rename = "destination")]
    pub dst: String,
    #[serde(rename = "type")]
    pub kind: RelationKind,
}

/// Which end of a relationship a class sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outgoing,
    Incoming,
}

/// One relationship as seen from a particular class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationLink {
    pub other: String,
    pub direction: Direction,
    pub kind: RelationKind,
}

/// Everything removed when a class is deleted: the class itself plus every
/// relationship incident to it, in stored orientation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ClassSnapshot {
    pub(crate) class: UmlClass,
    pub(crate) relationships: Vec<Relationship>,
}

// --- Document ---

/// The diagram document: a class table and a relationship table.
///
/// Relationships are keyed by the ordered `(source, destination)` pair but
/// at most one may exist per *unordered* pair of classes. Every endpoint
/// names a present class; deleting a class removes its incident
/// relationships in the same step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagram {
    classes: BTreeMap<String, UmlClass>,
    relationships: BTreeMap<(String, String), RelationKind>,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Queries ---

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn class(&self, name: &str) -> Option<&UmlClass> {
        self.classes.get(name)
    }

    pub fn classes(&self) -> impl Iterator<Item = &UmlClass> {
        self.classes.values()
    }

    /// True if a relationship exists between `a` and `b` in either
    /// orientation.
    pub fn has_relationship(&self, a: &str, b: &str) -> bool {
        self.relationships
            .contains_key(&(a.to_owned(), b.to_owned()))
            || self.relationships.contains_key(&(b.to_owned(), a.to_owned()))
    }

    /// Kind of the relationship stored under the ordered `(src, dst)` key.
    /// This consults the given orientation only; callers needing symmetry
    /// must try both orders.
    pub fn relationship_kind(&self, src: &str, dst: &str) -> Option<RelationKind> {
        self.relationships
            .get(&(src.to_owned(), dst.to_owned()))
            .copied()
    }

    pub fn relationships(&self) -> impl Iterator<Item = Relationship> + '_ {
        self.relationships.iter().map(|((src, dst), kind)| Relationship {
            src: src.clone(),
            dst: dst.clone(),
            kind: *kind,
        })
    }

    /// Every relationship touching `name`, with the far endpoint and the
    /// direction as seen from `name`.
    pub fn find_relationships(&self, name: &str) -> Vec<RelationLink> {
        let mut links = Vec::new();
        for ((src, dst), kind) in &self.relationships {
            if src.as_str() == name {
                links.push(RelationLink {
                    other: dst.clone(),
                    direction: Direction::Outgoing,
                    kind: *kind,
                });
            } else if dst.as_str() == name {
                links.push(RelationLink {
                    other: src.clone(),
                    direction: Direction::Incoming,
                    kind: *kind,
                });
            }
        }
        links
    }

    pub fn can_add_field(&self) -> bool {
        !self.classes.is_empty()
    }

    pub fn can_add_method(&self) -> bool {
        !self.classes.is_empty()
    }

    pub fn can_add_relationship(&self) -> bool {
        self.classes.len() >= 2
    }

    pub fn can_edit_params(&self) -> bool {
        self.classes.values().any(|c| !c.methods.is_empty())
    }

    /// The relationship between `a` and `b` in whichever orientation it is
    /// stored, if any.
    pub(crate) fn stored_relationship(&self, a: &str, b: &str) -> Option<Relationship> {
        if let Some(kind) = self.relationship_kind(a, b) {
            return Some(Relationship {
                src: a.to_owned(),
                dst: b.to_owned(),
                kind,
            });
        }
        self.relationship_kind(b, a).map(|kind| Relationship {
            src: b.to_owned(),
            dst: a.to_owned(),
            kind,
        })
    }

    pub(crate) fn method_params(&self, class: &str, method: &str) -> Option<Vec<String>> {
        self.class(class)?.method(method).map(|m| m.params.clone())
    }

    /// Capture a class and its incident relationships ahead of deletion.
    pub(crate) fn snapshot_class(&self, name: &str) -> Option<ClassSnapshot> {
        let class = self.class(name)?.clone();
        let relationships = self
            .relationships()
            .filter(|r| r.src == name || r.dst == name)
            .collect();
        Some(ClassSnapshot {
            class,
            relationships,
        })
    }

    // --- Raw mutators: no validation, no reporting. The session layer is
    // the only caller and is responsible for preconditions. ---

    pub(crate) fn insert_class(&mut self, class: UmlClass) {
        self.classes.insert(class.name.clone(), class);
    }

    /// Remove a class and, in the same step, every relationship incident
    /// to it.
    pub(crate) fn remove_class(&mut self, name: &str) -> Option<UmlClass> {
        let class = self.classes.remove(name)?;
        self.relationships
            .retain(|(src, dst), _| src.as_str() != name && dst.as_str() != name);
        Some(class)
    }

    /// Move a class to a new key and re-index every relationship key that
    /// names it as an endpoint.
    pub(crate) fn rename_class_key(&mut self, from: &str, to: &str) {
        let Some(mut class) = self.classes.remove(from) else {
            return;
        };
        class.name = to.to_owned();
        self.classes.insert(to.to_owned(), class);

        let stale: Vec<(String, String)> = self
            .relationships
            .keys()
            .filter(|(src, dst)| src.as_str() == from || dst.as_str() == from)
            .cloned()
            .collect();
        for key in stale {
            if let Some(kind) = self.relationships.remove(&key) {
                let src = if key.0 == from { to.to_owned() } else { key.0 };
                let dst = if key.1 == from { to.to_owned() } else { key.1 };
                self.relationships.insert((src, dst), kind);
            }
        }
    }

    pub(crate) fn class_mut(&mut self, name: &str) -> Option<&mut UmlClass> {
        self.classes.get_mut(name)
    }

    pub(crate) fn insert_relationship(&mut self, src: &str, dst: &str, kind: RelationKind) {
        self.relationships
            .insert((src.to_owned(), dst.to_owned()), kind);
    }

    pub(crate) fn remove_relationship(&mut self, src: &str, dst: &str) -> Option<RelationKind> {
        self.relationships.remove(&(src.to_owned(), dst.to_owned()))
    }

    pub(crate) fn set_relationship_kind(&mut self, src: &str, dst: &str, kind: RelationKind) {
        if let Some(entry) = self
            .relationships
            .get_mut(&(src.to_owned(), dst.to_owned()))
        {
            *entry = kind;
        }
    }
}
