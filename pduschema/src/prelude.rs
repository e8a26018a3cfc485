//! Prelude module for convenient imports.
//!
//! ```ignore
//! use pduschema::prelude::*;
//! ```

// Model types
pub use pduschema_model::{
    FieldDef, FieldKind, ModelError, OverrideTables, ParseError, PrimitiveType, RecordDef,
    RecordSet, load_properties, parse_records, parse_records_file,
};

// Generation
pub use pduschema_codegen::{
    CodegenError, GenerationReport, Generator, GeneratorConfig, RenderOutput, generate,
    generate_from_file, generate_from_xml, render,
};
