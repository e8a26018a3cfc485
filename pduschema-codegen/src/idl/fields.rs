//! Field declaration emission.
//!
//! Field numbers follow declaration order: the counter advances once per
//! source field whether or not the field produces a line, so hidden or
//! padding fields never shift the numbers of their neighbours.

use super::flatten::Flattener;
use super::resolver::TypeResolver;
use pduschema_model::naming::{capitalize, normalize_comment, strip_pdu_suffix, to_snake_case};
use pduschema_model::{FieldDef, ModelError, RecordDef};

/// Name of the field that stands in for the parent record.
pub const SUPER_FIELD: &str = "super";

/// One emitted field declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLine {
    /// Field number.
    pub number: u32,
    /// Normalized comment, emitted above the declaration.
    pub comment: Option<String>,
    /// Declaration text, e.g. `optional uint32 site = 1;`.
    pub declaration: String,
}

/// Wrapper type synthesized for a list of non-byte elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListWrapper {
    /// Wrapper type name.
    pub name: String,
    /// Schema type of the list elements.
    pub element_type: String,
    /// Source field the wrapper was created for.
    pub field_name: String,
}

impl ListWrapper {
    /// Returns the single repeated declaration of the wrapper.
    #[must_use]
    pub fn declaration(&self) -> String {
        format!(
            "list<{}> {} = 1;",
            self.element_type,
            to_snake_case(&self.field_name)
        )
    }
}

/// Emitted body of one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldBlock {
    /// Declarations in field-number order.
    pub lines: Vec<FieldLine>,
    /// Wrapper types in registration order.
    pub wrappers: Vec<ListWrapper>,
}

/// Emits field declarations for flattened records.
pub struct FieldEmitter<'r, 'a> {
    resolver: TypeResolver<'a>,
    flattener: &'r mut Flattener<'a>,
}

impl<'r, 'a> FieldEmitter<'r, 'a> {
    /// Creates a new field emitter.
    #[must_use]
    pub fn new(resolver: TypeResolver<'a>, flattener: &'r mut Flattener<'a>) -> Self {
        Self {
            resolver,
            flattener,
        }
    }

    /// Emits the fields of `record`, preceded by a reference to `parent`.
    ///
    /// # Errors
    /// Returns `ModelError::CyclicInheritance` if resolving a referenced
    /// record's emptiness hits an inheritance loop.
    pub fn emit(&mut self, record: &RecordDef, parent: Option<&str>) -> Result<FieldBlock, ModelError> {
        let mut block = FieldBlock::default();
        let mut number: u32 = 1;

        if let Some(parent) = parent {
            block.lines.push(FieldLine {
                number,
                comment: None,
                declaration: format!("optional {parent} {SUPER_FIELD} = {number};"),
            });
            number += 1;
        }

        for field in &record.fields {
            if let Some(line) = self.emit_field(record, field, number, &mut block.wrappers)? {
                block.lines.push(line);
            }
            number += 1;
        }

        Ok(block)
    }

    fn emit_field(
        &mut self,
        record: &RecordDef,
        field: &FieldDef,
        number: u32,
        wrappers: &mut Vec<ListWrapper>,
    ) -> Result<Option<FieldLine>, ModelError> {
        if field.is_padding() {
            return Ok(None);
        }

        let resolved = self.resolver.resolve(&record.name, field);
        if resolved.is_record_reference() && self.flattener.is_empty_record(&resolved.name)? {
            tracing::debug!(
                record = %record.name,
                field = %field.name,
                type_name = %resolved.name,
                "skipping field of empty record type"
            );
            return Ok(None);
        }

        let name = to_snake_case(&field.name);
        let declaration = if !field.kind.is_list() {
            format!("optional {} {name} = {number};", resolved.name)
        } else if resolved.is_byte() {
            let scalar = if field.could_be_string { "string" } else { "bytes" };
            format!("optional {scalar} {name} = {number};")
        } else {
            let wrapper = ListWrapper {
                name: wrapper_name(&record.name, &field.name),
                element_type: resolved.name,
                field_name: field.name.clone(),
            };
            let declaration = format!("optional {} {name}_list = {number};", wrapper.name);
            wrappers.push(wrapper);
            declaration
        };

        let comment = field
            .comment
            .as_deref()
            .map(normalize_comment)
            .filter(|c| !c.is_empty());

        Ok(Some(FieldLine {
            number,
            comment,
            declaration,
        }))
    }
}

/// Returns the wrapper type name for a list field.
#[must_use]
pub fn wrapper_name(record: &str, field: &str) -> String {
    format!("{}{}List", strip_pdu_suffix(record), capitalize(field))
}
