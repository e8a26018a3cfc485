//! Error types for record parsing and validation.

use thiserror::Error;

/// Error type for record description parsing operations.
#[derive(Debug, Error)]
pub enum ParseError {
    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Missing required attribute.
    #[error("missing required attribute '{attribute}' on element '{element}'")]
    MissingAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
    },

    /// Invalid attribute value.
    #[error("invalid value '{value}' for attribute '{attribute}' on element '{element}'")]
    InvalidAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
        /// Invalid value.
        value: String,
    },

    /// Duplicate definition.
    #[error("duplicate {kind} definition: '{name}'")]
    DuplicateDefinition {
        /// Kind of definition (class, field, etc.).
        kind: String,
        /// Name of the duplicate.
        name: String,
    },

    /// Invalid document structure.
    #[error("invalid structure: {message}")]
    InvalidStructure {
        /// Error message.
        message: String,
    },

    /// Malformed line in a property file.
    #[error("invalid property on line {line}: '{content}'")]
    InvalidProperty {
        /// One-based line number.
        line: usize,
        /// Offending line content.
        content: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Error type for record model validation.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Inheritance chain loops back on itself.
    #[error("cyclic inheritance detected: {path}")]
    CyclicInheritance {
        /// Chain of record names, joined with " -> ".
        path: String,
    },

    /// The `pduType` initial value is not a usable identifier.
    #[error("invalid pduType '{value}' on record '{record}'")]
    InvalidPduType {
        /// Record name.
        record: String,
        /// Raw value.
        value: String,
    },

    /// Two fields of one record share a name.
    #[error("duplicate field '{field}' in record '{record}'")]
    DuplicateField {
        /// Record name.
        record: String,
        /// Field name.
        field: String,
    },

    /// Validation error.
    #[error("validation error: {message}")]
    Validation {
        /// Error message.
        message: String,
    },
}

impl ParseError {
    /// Creates a missing attribute error.
    pub fn missing_attr(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates an invalid attribute error.
    pub fn invalid_attr(
        element: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            element: element.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Creates a duplicate definition error.
    pub fn duplicate(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DuplicateDefinition {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Creates an invalid structure error.
    pub fn structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
        }
    }
}

impl ModelError {
    /// Creates a cyclic inheritance error from the chain of visited names.
    pub fn cycle<S: AsRef<str>>(chain: &[S]) -> Self {
        let path = chain
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" -> ");
        Self::CyclicInheritance { path }
    }

    /// Creates an invalid pduType error.
    pub fn invalid_pdu_type(record: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidPduType {
            record: record.into(),
            value: value.into(),
        }
    }
}
