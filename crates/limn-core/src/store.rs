//! Persisted document schema and the on-disk diagram store.

use crate::model::{Diagram, Field, Method, Relationship, UmlClass};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from the persistence surface.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The file parsed but violates a document invariant.
    #[error("Invalid document: {0}")]
    Invalid(String),
}

// --- Wire types (the persisted schema) ---

/// A method parameter as persisted: a bare name wrapped in an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ParamName {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct MethodData {
    pub name: String,
    #[serde(default)]
    pub params: Vec<ParamName>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ClassData {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub methods: Vec<MethodData>,
}

/// Root of the persisted document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct DiagramData {
    #[serde(default)]
    pub classes: Vec<ClassData>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl From<&Diagram> for DiagramData {
    fn from(diagram: &Diagram) -> Self {
        let classes = diagram
            .classes()
            .map(|class| ClassData {
                name: class.name.clone(),
                fields: class.fields.clone(),
                methods: class
                    .methods
                    .iter()
                    .map(|method| MethodData {
                        name: method.name.clone(),
                        params: method
                            .params
                            .iter()
                            .map(|p| ParamName { name: p.clone() })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();
        let relationships = diagram.relationships().collect();
        DiagramData {
            classes,
            relationships,
        }
    }
}

impl TryFrom<DiagramData> for Diagram {
    type Error = StoreError;

    /// Rebuild a diagram, re-checking every invariant the editor enforces:
    /// unique class/field/method names, present endpoints, one relationship
    /// per unordered pair.
    fn try_from(data: DiagramData) -> Result<Self, StoreError> {
        let mut diagram = Diagram::new();
        for class in data.classes {
            if diagram.has_class(&class.name) {
                return Err(StoreError::Invalid(format!(
                    "duplicate class `{}`",
                    class.name
                )));
            }
            let mut item = UmlClass::new(&class.name);
            for field in class.fields {
                if item.has_field(&field.name) {
                    return Err(StoreError::Invalid(format!(
                        "duplicate field `{}` in class `{}`",
                        field.name, class.name
                    )));
                }
                item.fields.push(field);
            }
            for method in class.methods {
                if item.has_method(&method.name) {
                    return Err(StoreError::Invalid(format!(
                        "duplicate method `{}` in class `{}`",
                        method.name, class.name
                    )));
                }
                item.methods.push(Method {
                    name: method.name,
                    params: method.params.into_iter().map(|p| p.name).collect(),
                });
            }
            diagram.insert_class(item);
        }
        for rel in data.relationships {
            if !diagram.has_class(&rel.src) || !diagram.has_class(&rel.dst) {
                return Err(StoreError::Invalid(format!(
                    "relationship `{}` -> `{}` references a missing class",
                    rel.src, rel.dst
                )));
            }
            if diagram.has_relationship(&rel.src, &rel.dst) {
                return Err(StoreError::Invalid(format!(
                    "more than one relationship between `{}` and `{}`",
                    rel.src, rel.dst
                )));
            }
            diagram.insert_relationship(&rel.src, &rel.dst, rel.kind);
        }
        Ok(diagram)
    }
}

// --- JSON round-trip ---

/// Serialize a diagram to the persisted JSON format.
pub fn to_json(diagram: &Diagram) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(&DiagramData::from(diagram))?)
}

/// Parse and validate a persisted document.
pub fn from_json(raw: &str) -> Result<Diagram, StoreError> {
    let data: DiagramData = serde_json::from_str(raw)?;
    Diagram::try_from(data)
}

/// JSON Schema for the persisted document format, for collaborators that
/// validate or generate documents.
pub fn document_schema() -> String {
    let schema = schemars::schema_for!(DiagramData);
    serde_json::to_string_pretty(&schema).unwrap_or_else(|e| format!("Serialization error: {}", e))
}

// --- Arbitrary-path access (the Save As flow) ---

/// Read a diagram from a caller-chosen path.
pub fn read_diagram_file(path: &Path) -> Result<Diagram, StoreError> {
    let raw = fs::read_to_string(path)?;
    from_json(&raw)
}

/// Write a diagram to a caller-chosen path.
pub fn write_diagram_file(path: &Path, diagram: &Diagram) -> Result<(), StoreError> {
    fs::write(path, to_json(diagram)?)?;
    Ok(())
}

// --- Named store ---

/// Resolve the shared diagrams directory (~/.limn/).
pub fn diagrams_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".limn")
}

/// List all stored diagram names (without the .limn extension), sorted.
pub fn list_diagrams() -> Result<Vec<String>, StoreError> {
    let dir = diagrams_dir();
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut names: Vec<String> = fs::read_dir(&dir)?
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let name = entry.file_name().to_string_lossy().to_string();
            name.strip_suffix(".limn").map(|n| n.to_string())
        })
        .collect();
    names.sort();
    Ok(names)
}

/// Read a stored diagram by name.
pub fn read_diagram(name: &str) -> Result<Diagram, StoreError> {
    tracing::debug!(name, "reading stored diagram");
    read_diagram_file(&diagrams_dir().join(format!("{name}.limn")))
}

/// Write a stored diagram by name.
///
/// Uses a temp file + rename so a watching collaborator sees one event per
/// save instead of a truncate followed by a write.
pub fn write_diagram(name: &str, diagram: &Diagram) -> Result<(), StoreError> {
    let dir = diagrams_dir();
    fs::create_dir_all(&dir)?;
    let tmp = dir.join(format!(".{name}.limn.tmp"));
    let path = dir.join(format!("{name}.limn"));
    fs::write(&tmp, to_json(diagram)?)?;
    fs::rename(&tmp, &path)?;
    tracing::debug!(name, "wrote stored diagram");
    Ok(())
}

/// Delete a stored diagram by name. A missing file is not an error.
pub fn delete_diagram(name: &str) -> Result<(), StoreError> {
    let path = diagrams_dir().join(format!("{name}.limn"));
    if path.exists() {
        fs::remove_file(&path)?;
    }
    Ok(())
}
