//! # pduschema codegen
//!
//! Schema IDL generation from PDU record models.
//!
//! This crate provides:
//! - Field type resolution through override tables and the builtin table
//! - Inheritance flattening of field-less records
//! - Component, event and command classification
//! - Field, import and wrapper type emission
//! - Atomic per-record file writing with a run report

pub mod config;
pub mod error;
pub mod generator;
pub mod idl;
pub mod writer;

pub use config::GeneratorConfig;
pub use error::CodegenError;
pub use generator::{Generator, RenderOutput, RenderedFile};
pub use writer::{GenerationReport, SchemaWriter, WriteFailure};

use pduschema_model::{OverrideTables, RecordSet};

/// Generates schema files for a record set.
///
/// # Arguments
/// * `records` - Records to generate files for
/// * `overrides` - Type, command response and alias tables
/// * `config` - Run configuration, including the output directory
///
/// # Errors
/// Returns `CodegenError` if the records are malformed or the output
/// directory cannot be created.
pub fn generate(
    records: &RecordSet,
    overrides: &OverrideTables,
    config: &GeneratorConfig,
) -> Result<GenerationReport, CodegenError> {
    Generator::new(records, overrides, config).generate()
}

/// Generates schema files from an XML record description string.
///
/// # Errors
/// Returns `CodegenError` if parsing or generation fails.
pub fn generate_from_xml(
    xml: &str,
    overrides: &OverrideTables,
    config: &GeneratorConfig,
) -> Result<GenerationReport, CodegenError> {
    let records = pduschema_model::parse_records(xml)?;
    generate(&records, overrides, config)
}

/// Generates schema files from an XML record description file.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, or generation fails.
pub fn generate_from_file(
    path: &std::path::Path,
    overrides: &OverrideTables,
    config: &GeneratorConfig,
) -> Result<GenerationReport, CodegenError> {
    let xml = std::fs::read_to_string(path)?;
    generate_from_xml(&xml, overrides, config)
}

/// Renders every file for a record set without writing anything.
///
/// # Errors
/// Returns `CodegenError` if the records are malformed.
pub fn render(
    records: &RecordSet,
    overrides: &OverrideTables,
    config: &GeneratorConfig,
) -> Result<RenderOutput, CodegenError> {
    Generator::new(records, overrides, config).render_all()
}
