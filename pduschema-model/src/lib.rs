//! # pduschema model
//!
//! Record model for PDU-style message definitions.
//!
//! This crate provides:
//! - Record, field and initial-value definitions
//! - The builtin primitive type table
//! - XML record description parsing
//! - Override tables and their property-file loader
//! - Record model validation

pub mod error;
pub mod naming;
pub mod overrides;
pub mod parser;
pub mod records;
pub mod types;
pub mod validation;

pub use error::{ModelError, ParseError};
pub use overrides::{OverrideTables, VOID_RESPONSE, load_properties, parse_properties};
pub use parser::{parse_records, parse_records_file};
pub use records::{FieldDef, FieldKind, InitialValue, PDU_TYPE_KEY, RecordDef};
pub use types::{PrimitiveType, RecordSet};
pub use validation::{is_root_parent, validate_records};
