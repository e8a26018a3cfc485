//! Cross-file import collection.

use super::flatten::Flattener;
use super::resolver::TypeResolver;
use pduschema_model::{FieldKind, ModelError, OverrideTables, RecordDef};
use std::collections::HashSet;

/// Ordered, deduplicated set of type names a file must import.
#[derive(Debug, Default)]
pub struct ImportSet {
    names: Vec<String>,
    seen: HashSet<String>,
}

impl ImportSet {
    /// Creates an empty import set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a type name; returns false if it was already present.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.seen.contains(name) {
            return false;
        }
        self.seen.insert(name.to_string());
        self.names.push(name.to_string());
        true
    }

    /// Consumes the set, returning the names in first-seen order.
    #[must_use]
    pub fn into_names(self) -> Vec<String> {
        self.names
    }
}

/// Collects the imports of a record's file.
///
/// Fields contribute first, in declaration order: record references and
/// variable lists whose type resolved to another record that is not empty.
/// The effective parent follows unless it is aliased, then the command
/// response type.
///
/// # Errors
/// Returns `ModelError::CyclicInheritance` if resolving a referenced
/// record's emptiness hits an inheritance loop.
pub fn collect_imports(
    record: &RecordDef,
    resolver: TypeResolver<'_>,
    flattener: &mut Flattener<'_>,
    overrides: &OverrideTables,
    parent: Option<&str>,
    response: Option<&str>,
) -> Result<Vec<String>, ModelError> {
    let mut imports = ImportSet::new();

    for field in &record.fields {
        if !matches!(field.kind, FieldKind::RecordReference | FieldKind::VariableList) {
            continue;
        }
        let resolved = resolver.resolve(&record.name, field);
        if !resolved.is_record_reference() || flattener.is_empty_record(&resolved.name)? {
            continue;
        }
        imports.insert(&resolved.name);
    }

    if let Some(parent) = parent.filter(|p| !overrides.is_aliased(p)) {
        imports.insert(parent);
    }

    if let Some(response) = response {
        imports.insert(response);
    }

    Ok(imports.into_names())
}
