//! Schema file rendering and the generation driver.
//!
//! Every file is rendered in memory before anything touches the output
//! directory, so malformed input aborts the run with no files written.

use crate::config::GeneratorConfig;
use crate::error::CodegenError;
use crate::idl::{
    Classification, Classifier, FieldBlock, FieldEmitter, Flattener, Role, TypeResolver,
    collect_imports,
};
use crate::writer::{GenerationReport, SchemaWriter, WriteFailure};
use pduschema_model::naming::{normalize_comment, to_snake_case};
use pduschema_model::{OverrideTables, PrimitiveType, RecordDef, RecordSet, validate_records};

/// First line of every generated file.
pub const GENERATED_HEADER: &str = "// Generated by pduschema from the record model. Do not edit.";

/// One rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// Record (or sentinel type) the file declares.
    pub record: String,
    /// File name inside the output directory.
    pub file_name: String,
    /// File contents.
    pub contents: String,
}

/// All files of a run, rendered but not yet written.
#[derive(Debug, Clone, Default)]
pub struct RenderOutput {
    /// Files in write order; the void type comes last.
    pub files: Vec<RenderedFile>,
    /// Records skipped because they have no fields.
    pub empty: Vec<String>,
    /// Records skipped because an override replaces them.
    pub aliased: Vec<String>,
}

impl RenderOutput {
    /// Returns the rendered file for a record.
    #[must_use]
    pub fn file(&self, record: &str) -> Option<&RenderedFile> {
        self.files.iter().find(|f| f.record == record)
    }
}

/// Schema generator.
pub struct Generator<'a> {
    records: &'a RecordSet,
    overrides: &'a OverrideTables,
    config: &'a GeneratorConfig,
    flattener: Flattener<'a>,
}

impl<'a> Generator<'a> {
    /// Creates a new generator.
    #[must_use]
    pub fn new(
        records: &'a RecordSet,
        overrides: &'a OverrideTables,
        config: &'a GeneratorConfig,
    ) -> Self {
        Self {
            records,
            overrides,
            config,
            flattener: Flattener::new(records, &config.root_parents),
        }
    }

    /// Renders and writes every file of the run.
    ///
    /// # Errors
    /// Returns an error if the input is malformed or the output directory
    /// cannot be created. Failures writing individual files are recorded in
    /// the report instead.
    pub fn generate(&mut self) -> Result<GenerationReport, CodegenError> {
        let output = self.render_all()?;

        let writer = SchemaWriter::new(self.config.output_dir());
        writer.prepare()?;

        let mut report = GenerationReport {
            empty: output.empty,
            aliased: output.aliased,
            ..GenerationReport::default()
        };

        for file in output.files {
            match writer.write(&file.file_name, &file.contents) {
                Ok(path) => report.written.push(path),
                Err(error) => {
                    tracing::error!(record = %file.record, %error, "failed to write schema file");
                    report.failures.push(WriteFailure {
                        record: file.record,
                        error,
                    });
                }
            }
        }

        tracing::info!(
            dir = %writer.dir().display(),
            written = report.written.len(),
            empty = report.empty.len(),
            aliased = report.aliased.len(),
            failed = report.failures.len(),
            "schema generation finished"
        );

        Ok(report)
    }

    /// Renders every file of the run without writing anything.
    ///
    /// # Errors
    /// Returns an error if validation fails or a record cannot be rendered.
    pub fn render_all(&mut self) -> Result<RenderOutput, CodegenError> {
        validate_records(self.records, &self.config.root_parents)?;

        let records = self.records;
        let mut output = RenderOutput::default();

        for record in records {
            if self.overrides.is_aliased(&record.name) {
                tracing::debug!(record = %record.name, "record is aliased, no file generated");
                output.aliased.push(record.name.clone());
                continue;
            }
            match self.render_record(record)? {
                Some(contents) => output.files.push(RenderedFile {
                    record: record.name.clone(),
                    file_name: self.config.file_name(&record.name),
                    contents,
                }),
                None => {
                    tracing::warn!(record = %record.name, "record has no fields, no file generated");
                    output.empty.push(record.name.clone());
                }
            }
        }

        let void_type = &self.config.void_type;
        if output.file(void_type).is_some() {
            tracing::warn!(record = %void_type, "record shadows the shared void type");
        } else {
            output.files.push(RenderedFile {
                record: void_type.clone(),
                file_name: self.config.file_name(void_type),
                contents: self.render_void(),
            });
        }

        Ok(output)
    }

    /// Renders the file of one record.
    ///
    /// Returns `None` for records that get no file: those with no fields
    /// and those replaced by an alias.
    ///
    /// # Errors
    /// Returns an error if the record's ancestry loops or its `pduType` is
    /// unusable.
    pub fn render_record(&mut self, record: &RecordDef) -> Result<Option<String>, CodegenError> {
        if self.overrides.is_aliased(&record.name) || self.flattener.resolve_empty(record)? {
            return Ok(None);
        }

        let overrides = self.overrides;
        let config = self.config;
        let resolver = TypeResolver::new(overrides);

        let parent = self.flattener.effective_parent(record)?;
        let classification = Classifier::new(resolver, overrides, config).classify(record)?;
        let response = match &classification.role {
            Role::Command { response } => Some(response.as_str()),
            _ => None,
        };

        let imports = collect_imports(
            record,
            resolver,
            &mut self.flattener,
            overrides,
            parent.as_deref(),
            response,
        )?;

        let super_type = parent.as_deref().map(|p| self.parent_type(p));
        let block = FieldEmitter::new(resolver, &mut self.flattener)
            .emit(record, super_type.as_deref())?;

        tracing::debug!(
            record = %record.name,
            role = ?classification.role,
            id = classification.id,
            parent = ?parent,
            imports = imports.len(),
            "rendered record"
        );

        let mut output = self.preamble();
        for import in &imports {
            output.push_str(&format!("{}\n", config.import_line(import)));
        }
        if !imports.is_empty() {
            output.push('\n');
        }
        if let Some(comment) = record
            .comment
            .as_deref()
            .map(normalize_comment)
            .filter(|c| !c.is_empty())
        {
            output.push_str(&format!("// {comment}\n"));
        }
        output.push_str(&render_body(&record.name, &classification, &block));

        Ok(Some(output))
    }

    /// Renders the shared empty type.
    #[must_use]
    pub fn render_void(&self) -> String {
        let mut output = self.preamble();
        output.push_str(&format!("type {} {{\n}}\n", self.config.void_type));
        output
    }

    fn preamble(&self) -> String {
        let mut output = format!("{GENERATED_HEADER}\n\n");
        if let Some(package) = self.config.package_line() {
            output.push_str(&format!("{package}\n\n"));
        }
        output
    }

    /// Parent type as written in the `super` field; aliased parents have no
    /// file of their own, so their replacement type is used.
    fn parent_type(&self, parent: &str) -> String {
        match self.overrides.type_override_for(parent) {
            Some(target) => PrimitiveType::from_source_name(target)
                .map_or_else(|| target.to_string(), |p| p.schema_name().to_string()),
            None => parent.to_string(),
        }
    }
}

fn render_body(name: &str, classification: &Classification, block: &FieldBlock) -> String {
    let id = classification.id;
    let mut output = String::new();

    match &classification.role {
        Role::Type if classification.is_unmapped_command() => {
            output.push_str(&render_type(name, Some(id), block));
        }
        Role::Type => {
            output.push_str(&render_type(name, None, block));
        }
        Role::Component => {
            output.push_str(&format!("component {name} {{\n"));
            output.push_str(&format!("  id = {id};\n"));
            if !block.lines.is_empty() {
                output.push('\n');
            }
            output.push_str(&render_fields(block));
            output.push_str("}\n");
        }
        Role::EventComponent => {
            output.push_str(&format!("component {name}Event {{\n"));
            output.push_str(&format!("  id = {id};\n"));
            output.push_str(&format!("  event {name} {};\n", to_snake_case(name)));
            output.push_str("}\n\n");
            output.push_str(&render_type(name, None, block));
        }
        Role::Command { response } => {
            output.push_str(&format!("component {name}Command {{\n"));
            output.push_str(&format!("  id = {id};\n"));
            output.push_str(&format!(
                "  command {response} {}({name});\n",
                to_snake_case(name)
            ));
            output.push_str("}\n\n");
            output.push_str(&render_type(name, Some(id), block));
        }
    }

    for wrapper in &block.wrappers {
        output.push_str(&format!("\ntype {} {{\n", wrapper.name));
        output.push_str(&format!("  {}\n", wrapper.declaration()));
        output.push_str("}\n");
    }

    output
}

fn render_type(name: &str, id_comment: Option<u32>, block: &FieldBlock) -> String {
    let mut output = format!("type {name} {{\n");
    if let Some(id) = id_comment {
        output.push_str(&format!("  // id = {id}\n"));
        if !block.lines.is_empty() {
            output.push('\n');
        }
    }
    output.push_str(&render_fields(block));
    output.push_str("}\n");
    output
}

fn render_fields(block: &FieldBlock) -> String {
    let mut output = String::new();
    for (i, line) in block.lines.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        if let Some(comment) = &line.comment {
            output.push_str(&format!("  /** {comment} */\n"));
        }
        output.push_str(&format!("  {}\n", line.declaration));
    }
    output
}
