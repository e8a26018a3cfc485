//! Record collection and builtin primitive types.
//!
//! [`RecordSet`] is the ordered collection every generator run iterates;
//! [`PrimitiveType`] is the fixed table of builtin source primitives and the
//! schema names they normalize to.

use crate::error::ParseError;
use crate::records::RecordDef;
use std::collections::HashMap;

/// Ordered collection of record definitions with a name index.
///
/// Iteration follows insertion order so that generated output is
/// deterministic across runs.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Vec<RecordDef>,
    index: HashMap<String, usize>,
}

impl RecordSet {
    /// Creates a new empty record set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record definition.
    ///
    /// # Errors
    /// Returns `ParseError::DuplicateDefinition` if a record with the same
    /// name already exists.
    pub fn add_record(&mut self, record: RecordDef) -> Result<(), ParseError> {
        if self.index.contains_key(&record.name) {
            return Err(ParseError::duplicate("class", record.name));
        }
        self.index.insert(record.name.clone(), self.records.len());
        self.records.push(record);
        Ok(())
    }

    /// Looks up a record by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RecordDef> {
        self.index.get(name).map(|&idx| &self.records[idx])
    }

    /// Iterates records in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, RecordDef> {
        self.records.iter()
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a RecordDef;
    type IntoIter = std::slice::Iter<'a, RecordDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl TryFrom<Vec<RecordDef>> for RecordSet {
    type Error = ParseError;

    fn try_from(records: Vec<RecordDef>) -> Result<Self, Self::Error> {
        let mut set = Self::new();
        for record in records {
            set.add_record(record)?;
        }
        Ok(set)
    }
}

/// Builtin source primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// Unsigned 8-bit integer.
    UnsignedByte,
    /// Unsigned 16-bit integer.
    UnsignedShort,
    /// Unsigned 32-bit integer.
    UnsignedInt,
    /// Unsigned 64-bit integer.
    UnsignedLong,
    /// Signed 8-bit integer.
    Byte,
    /// Signed 16-bit integer.
    Short,
    /// Signed 32-bit integer.
    Int,
    /// Signed 64-bit integer.
    Long,
    /// 32-bit floating point.
    Float,
    /// 64-bit floating point.
    Double,
}

impl PrimitiveType {
    /// Every builtin primitive, in table order.
    pub const ALL: [Self; 10] = [
        Self::UnsignedByte,
        Self::UnsignedShort,
        Self::UnsignedInt,
        Self::UnsignedLong,
        Self::Byte,
        Self::Short,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
    ];

    /// Returns the source type name as written in record descriptions.
    #[must_use]
    pub const fn source_name(&self) -> &'static str {
        match self {
            Self::UnsignedByte => "unsigned byte",
            Self::UnsignedShort => "unsigned short",
            Self::UnsignedInt => "unsigned int",
            Self::UnsignedLong => "unsigned long",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
        }
    }

    /// Returns the normalized schema type name.
    #[must_use]
    pub const fn schema_name(&self) -> &'static str {
        match self {
            Self::UnsignedByte | Self::UnsignedShort | Self::UnsignedInt => "uint32",
            Self::UnsignedLong => "uint64",
            Self::Byte | Self::Short | Self::Int => "sint32",
            Self::Long => "sint64",
            Self::Float => "float",
            Self::Double => "double",
        }
    }

    /// Parses a primitive type from its source name.
    #[must_use]
    pub fn from_source_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.source_name() == name)
    }

    /// Returns true for the single-byte integer types.
    #[must_use]
    pub const fn is_byte(&self) -> bool {
        matches!(self, Self::Byte | Self::UnsignedByte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::FieldDef;

    #[test]
    fn test_record_set_preserves_order() {
        let mut set = RecordSet::new();
        for name in ["Zeta", "Alpha", "Mid"] {
            set.add_record(RecordDef::new(name, "root")).expect("add");
        }

        let names: Vec<_> = set.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
        assert_eq!(set.len(), 3);
        assert!(set.get("Alpha").is_some());
        assert!(set.get("Missing").is_none());
    }

    #[test]
    fn test_record_set_rejects_duplicates() {
        let mut set = RecordSet::new();
        set.add_record(RecordDef::new("EntityID", "root"))
            .expect("first add");
        let err = set
            .add_record(RecordDef::new("EntityID", "root").with_field(FieldDef::primitive("x", "int")))
            .unwrap_err();
        assert!(matches!(err, ParseError::DuplicateDefinition { .. }));
    }

    #[test]
    fn test_record_set_try_from_vec() {
        let set = RecordSet::try_from(vec![
            RecordDef::new("A", "root"),
            RecordDef::new("B", "A"),
        ])
        .expect("valid");
        assert_eq!(set.get("B").map(|r| r.parent.as_str()), Some("A"));
    }

    #[test]
    fn test_primitive_schema_names() {
        assert_eq!(PrimitiveType::UnsignedByte.schema_name(), "uint32");
        assert_eq!(PrimitiveType::UnsignedShort.schema_name(), "uint32");
        assert_eq!(PrimitiveType::UnsignedInt.schema_name(), "uint32");
        assert_eq!(PrimitiveType::UnsignedLong.schema_name(), "uint64");
        assert_eq!(PrimitiveType::Byte.schema_name(), "sint32");
        assert_eq!(PrimitiveType::Short.schema_name(), "sint32");
        assert_eq!(PrimitiveType::Int.schema_name(), "sint32");
        assert_eq!(PrimitiveType::Long.schema_name(), "sint64");
        assert_eq!(PrimitiveType::Float.schema_name(), "float");
        assert_eq!(PrimitiveType::Double.schema_name(), "double");
    }

    #[test]
    fn test_primitive_source_name_roundtrip() {
        for prim in [
            PrimitiveType::UnsignedByte,
            PrimitiveType::UnsignedLong,
            PrimitiveType::Short,
            PrimitiveType::Double,
        ] {
            assert_eq!(PrimitiveType::from_source_name(prim.source_name()), Some(prim));
        }
        assert_eq!(PrimitiveType::from_source_name("EntityID"), None);
    }

    #[test]
    fn test_primitive_predicates() {
        assert!(PrimitiveType::Byte.is_byte());
        assert!(PrimitiveType::UnsignedByte.is_byte());
        assert!(!PrimitiveType::Short.is_byte());
    }
}
