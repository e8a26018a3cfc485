//! Record model validation.
//!
//! This module checks a record set for the input malformations that must
//! abort a generation run: duplicate or unnamed fields, unparsable protocol
//! identifiers, and cyclic inheritance.

use crate::error::ModelError;
use crate::records::RecordDef;
use crate::types::RecordSet;
use std::collections::HashSet;

/// Validates a record set for correctness.
///
/// # Arguments
/// * `records` - The records to validate
/// * `root_parents` - Parent names that mean "no inheritance"
///
/// # Returns
/// Ok(()) if valid, or ModelError describing the first issue.
///
/// # Errors
/// Returns `ModelError` if validation fails.
pub fn validate_records(records: &RecordSet, root_parents: &[String]) -> Result<(), ModelError> {
    for record in records {
        validate_fields(record)?;
        validate_pdu_type(record)?;
        validate_inheritance(records, record, root_parents)?;
    }
    Ok(())
}

/// Returns true if `parent` names no real parent.
#[must_use]
pub fn is_root_parent(parent: &str, root_parents: &[String]) -> bool {
    parent.is_empty() || root_parents.iter().any(|r| r.eq_ignore_ascii_case(parent))
}

/// Validates the field list of a record.
fn validate_fields(record: &RecordDef) -> Result<(), ModelError> {
    let mut seen = HashSet::new();

    for field in &record.fields {
        if field.name.is_empty() {
            return Err(ModelError::Validation {
                message: format!("unnamed field in record '{}'", record.name),
            });
        }
        if field.type_name.is_empty() {
            return Err(ModelError::Validation {
                message: format!(
                    "field '{}' in record '{}' has no type",
                    field.name, record.name
                ),
            });
        }
        if !seen.insert(field.name.as_str()) {
            return Err(ModelError::DuplicateField {
                record: record.name.clone(),
                field: field.name.clone(),
            });
        }
    }

    Ok(())
}

/// Validates that a declared pduType is an integer.
fn validate_pdu_type(record: &RecordDef) -> Result<(), ModelError> {
    match record.pdu_type() {
        Some(value) if value.trim().parse::<i64>().is_err() => {
            Err(ModelError::invalid_pdu_type(&record.name, value))
        }
        _ => Ok(()),
    }
}

/// Walks the parent chain of a record looking for a loop.
fn validate_inheritance(
    records: &RecordSet,
    record: &RecordDef,
    root_parents: &[String],
) -> Result<(), ModelError> {
    let mut chain = vec![record.name.as_str()];
    let mut current = record;

    while !is_root_parent(&current.parent, root_parents) {
        if chain.contains(&current.parent.as_str()) {
            chain.push(current.parent.as_str());
            return Err(ModelError::cycle(&chain));
        }
        match records.get(&current.parent) {
            Some(parent) => {
                chain.push(parent.name.as_str());
                current = parent;
            }
            None => break,
        }
    }

    Ok(())
}
