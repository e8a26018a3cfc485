//! Inheritance flattening.
//!
//! Records without fields carry no data of their own, so they are cut out of
//! inheritance chains: a record whose parent is empty inherits from the
//! parent's own (already flattened) parent instead. Results are memoized per
//! record name, so every ancestor is resolved once per run.

use pduschema_model::{ModelError, RecordDef, RecordSet, is_root_parent};
use std::collections::{HashMap, HashSet};

/// Memoized emptiness and effective-parent resolution over a record set.
#[derive(Debug)]
pub struct Flattener<'a> {
    records: &'a RecordSet,
    root_parents: &'a [String],
    empty: HashSet<String>,
    parents: HashMap<String, Option<String>>,
}

impl<'a> Flattener<'a> {
    /// Creates a new flattener.
    #[must_use]
    pub fn new(records: &'a RecordSet, root_parents: &'a [String]) -> Self {
        Self {
            records,
            root_parents,
            empty: HashSet::new(),
            parents: HashMap::new(),
        }
    }

    /// Resolves a record and returns true if it has no fields.
    ///
    /// # Errors
    /// Returns `ModelError::CyclicInheritance` if the record's ancestry loops.
    pub fn resolve_empty(&mut self, record: &RecordDef) -> Result<bool, ModelError> {
        self.is_empty_record(&record.name)
    }

    /// Returns true if `name` is a known record with no fields.
    ///
    /// Names outside the record set are never empty.
    ///
    /// # Errors
    /// Returns `ModelError::CyclicInheritance` if the record's ancestry loops.
    pub fn is_empty_record(&mut self, name: &str) -> Result<bool, ModelError> {
        self.resolve(name, &mut Vec::new())?;
        Ok(self.empty.contains(name))
    }

    /// Returns the parent a record inherits from once empty ancestors are
    /// spliced out, or `None` if it has no real parent.
    ///
    /// # Errors
    /// Returns `ModelError::CyclicInheritance` if the record's ancestry loops.
    pub fn effective_parent(&mut self, record: &RecordDef) -> Result<Option<String>, ModelError> {
        self.resolve(&record.name, &mut Vec::new())?;
        Ok(self.parents.get(&record.name).cloned().flatten())
    }

    fn resolve(&mut self, name: &str, visiting: &mut Vec<String>) -> Result<(), ModelError> {
        if self.parents.contains_key(name) {
            return Ok(());
        }
        let records = self.records;
        let Some(record) = records.get(name) else {
            return Ok(());
        };
        if visiting.iter().any(|v| v == name) {
            visiting.push(name.to_string());
            return Err(ModelError::cycle(visiting.as_slice()));
        }

        visiting.push(name.to_string());
        let effective = if is_root_parent(&record.parent, self.root_parents) {
            None
        } else {
            self.resolve(&record.parent, visiting)?;
            if self.empty.contains(&record.parent) {
                let spliced = self.parents.get(&record.parent).cloned().flatten();
                tracing::debug!(
                    record = %record.name,
                    empty_parent = %record.parent,
                    parent = ?spliced,
                    "splicing empty parent out of inheritance chain"
                );
                spliced
            } else {
                Some(record.parent.clone())
            }
        };
        visiting.pop();

        if record.is_empty() && self.empty.insert(record.name.clone()) {
            tracing::debug!(record = %record.name, "record has no fields");
        }
        self.parents.insert(record.name.clone(), effective);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pduschema_model::FieldDef;

    fn roots() -> Vec<String> {
        vec!["root".to_string(), "Pdu".to_string()]
    }

    fn field(name: &str) -> FieldDef {
        FieldDef::primitive(name, "int")
    }

    fn chain() -> RecordSet {
        RecordSet::try_from(vec![
            RecordDef::new("Base", "root").with_field(field("base")),
            RecordDef::new("Family", "Base"),
            RecordDef::new("SubFamily", "Family"),
            RecordDef::new("Leaf", "SubFamily").with_field(field("leaf")),
            RecordDef::new("Orphan", "root").with_field(field("orphan")),
        ])
        .expect("valid set")
    }

    #[test]
    fn test_empty_parent_is_spliced() {
        let records = chain();
        let roots = roots();
        let mut flattener = Flattener::new(&records, &roots);

        let leaf = records.get("Leaf").expect("Leaf");
        assert!(!flattener.resolve_empty(leaf).expect("resolve"));
        assert_eq!(
            flattener.effective_parent(leaf).expect("resolve").as_deref(),
            Some("Base")
        );
        assert!(flattener.is_empty_record("Family").expect("resolve"));
        assert!(flattener.is_empty_record("SubFamily").expect("resolve"));
        assert!(!flattener.is_empty_record("Base").expect("resolve"));
    }

    #[test]
    fn test_root_parent_has_no_effective_parent() {
        let records = chain();
        let roots = roots();
        let mut flattener = Flattener::new(&records, &roots);

        let orphan = records.get("Orphan").expect("Orphan");
        assert_eq!(flattener.effective_parent(orphan).expect("resolve"), None);
    }

    #[test]
    fn test_empty_chain_collapses_to_root() {
        let records = RecordSet::try_from(vec![
            RecordDef::new("Family", "Pdu"),
            RecordDef::new("Leaf", "Family").with_field(field("x")),
        ])
        .expect("valid set");
        let roots = roots();
        let mut flattener = Flattener::new(&records, &roots);

        let leaf = records.get("Leaf").expect("Leaf");
        assert_eq!(flattener.effective_parent(leaf).expect("resolve"), None);
        assert!(flattener.is_empty_record("Family").expect("resolve"));
    }

    #[test]
    fn test_repeated_queries_are_stable() {
        let records = chain();
        let roots = roots();
        let mut flattener = Flattener::new(&records, &roots);
        let leaf = records.get("Leaf").expect("Leaf");

        let first = flattener.effective_parent(leaf).expect("resolve");
        let second = flattener.effective_parent(leaf).expect("resolve");
        assert_eq!(first, second);
        assert!(flattener.is_empty_record("SubFamily").expect("resolve"));
        assert!(flattener.is_empty_record("SubFamily").expect("resolve"));
    }

    #[test]
    fn test_unknown_names_are_not_empty() {
        let records = chain();
        let roots = roots();
        let mut flattener = Flattener::new(&records, &roots);
        assert!(!flattener.is_empty_record("ExternalType").expect("resolve"));
    }

    #[test]
    fn test_external_parent_is_kept() {
        let records = RecordSet::try_from(vec![
            RecordDef::new("Leaf", "ExternalBase").with_field(field("x")),
        ])
        .expect("valid set");
        let roots = roots();
        let mut flattener = Flattener::new(&records, &roots);
        let leaf = records.get("Leaf").expect("Leaf");
        assert_eq!(
            flattener.effective_parent(leaf).expect("resolve").as_deref(),
            Some("ExternalBase")
        );
    }

    #[test]
    fn test_cycle_fails_fast() {
        let records = RecordSet::try_from(vec![
            RecordDef::new("A", "B").with_field(field("a")),
            RecordDef::new("B", "A"),
        ])
        .expect("valid set");
        let roots = roots();
        let mut flattener = Flattener::new(&records, &roots);

        let a = records.get("A").expect("A");
        match flattener.effective_parent(a) {
            Err(ModelError::CyclicInheritance { path }) => assert_eq!(path, "A -> B -> A"),
            other => panic!("expected cycle, got {other:?}"),
        }
    }
}
