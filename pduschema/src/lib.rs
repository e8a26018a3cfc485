//! # pduschema
//!
//! Generates entity-component schema files from PDU record definitions.
//!
//! Records are read from the class/attribute XML dialect (or built in code),
//! flattened, classified into plain types, components, event components and
//! commands, and written one `.schema` file per record.
//!
//! ## Quick Start
//!
//! ```ignore
//! use pduschema::prelude::*;
//!
//! let records = parse_records_file(Path::new("dis.xml"))?;
//! let overrides = OverrideTables::load(Some(types), Some(commands), None)?;
//! let config = GeneratorConfig::new("schema")
//!     .with_namespace("Dis")
//!     .with_pdu_offset(100);
//!
//! let report = generate(&records, &overrides, &config)?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`model`] - Records, primitive types, XML parsing, override tables
//! - [`codegen`] - Schema generation and file writing

pub mod prelude;

/// Record model, XML parsing and override tables.
pub mod model {
    pub use pduschema_model::*;
}

/// Schema generation from record models.
pub mod codegen {
    pub use pduschema_codegen::*;
}
