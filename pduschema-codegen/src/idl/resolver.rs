//! Field type resolution.
//!
//! A field's declared type is mapped to its schema type by trying, in order,
//! a per-field override, a per-type override, and the builtin primitive
//! table. The first step that answers wins; anything left over passes
//! through unchanged as a reference to another generated record.

use pduschema_model::{FieldDef, OverrideTables, PrimitiveType};

/// Which lookup step produced a resolved type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeSource {
    /// `"<Record>.<field>"` entry in the type table.
    FieldOverride,
    /// Bare type name entry in the type or alias table.
    TypeOverride,
    /// Builtin primitive table.
    Builtin,
    /// Declared name used as-is.
    Passthrough,
}

/// Result of resolving one field type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    /// Schema type name.
    pub name: String,
    /// Step that produced the name.
    pub source: TypeSource,
    /// Builtin primitive behind the name, if any.
    pub primitive: Option<PrimitiveType>,
}

impl ResolvedType {
    /// Builds a resolution from an override value.
    ///
    /// Values naming a builtin source primitive are normalized through the
    /// builtin table so byte detection sees through aliases.
    fn from_override(value: &str, source: TypeSource) -> Self {
        match PrimitiveType::from_source_name(value) {
            Some(prim) => Self {
                name: prim.schema_name().to_string(),
                source,
                primitive: Some(prim),
            },
            None => Self {
                name: value.to_string(),
                source,
                primitive: None,
            },
        }
    }

    fn builtin(prim: PrimitiveType) -> Self {
        Self {
            name: prim.schema_name().to_string(),
            source: TypeSource::Builtin,
            primitive: Some(prim),
        }
    }

    fn passthrough(name: &str) -> Self {
        Self {
            name: name.to_string(),
            source: TypeSource::Passthrough,
            primitive: None,
        }
    }

    /// Returns true if the type is a single-byte integer.
    #[must_use]
    pub fn is_byte(&self) -> bool {
        self.primitive.is_some_and(|p| p.is_byte())
    }

    /// Returns true if the type names another generated record.
    #[must_use]
    pub fn is_record_reference(&self) -> bool {
        self.source == TypeSource::Passthrough
    }
}

/// One lookup in the resolution chain.
#[derive(Debug, Clone, Copy)]
enum Step {
    FieldOverride,
    TypeOverride,
    Builtin,
}

impl Step {
    fn lookup(self, overrides: &OverrideTables, owner: &str, field: &FieldDef) -> Option<ResolvedType> {
        match self {
            Self::FieldOverride => overrides
                .field_override(owner, &field.name)
                .map(|v| ResolvedType::from_override(v, TypeSource::FieldOverride)),
            Self::TypeOverride => overrides
                .type_override_for(&field.type_name)
                .map(|v| ResolvedType::from_override(v, TypeSource::TypeOverride)),
            Self::Builtin => {
                PrimitiveType::from_source_name(&field.type_name).map(ResolvedType::builtin)
            }
        }
    }
}

const CHAIN: [Step; 3] = [Step::FieldOverride, Step::TypeOverride, Step::Builtin];

/// Resolves declared field types to schema type names.
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'a> {
    overrides: &'a OverrideTables,
}

impl<'a> TypeResolver<'a> {
    /// Creates a new resolver over the given override tables.
    #[must_use]
    pub fn new(overrides: &'a OverrideTables) -> Self {
        Self { overrides }
    }

    /// Resolves the type of `field` declared in record `owner`.
    ///
    /// Never fails: unknown names are assumed to be record references.
    #[must_use]
    pub fn resolve(&self, owner: &str, field: &FieldDef) -> ResolvedType {
        CHAIN
            .iter()
            .find_map(|step| step.lookup(self.overrides, owner, field))
            .unwrap_or_else(|| ResolvedType::passthrough(&field.type_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> OverrideTables {
        OverrideTables::new()
            .type_override("EntityStatePdu.marking", "MarkingString")
            .type_override("ClockTime", "uint64")
            .type_override("unsigned short", "uint16")
            .alias("OneByteChunk", "byte")
            .alias("TwoByteChunk", "uint32")
    }

    #[test]
    fn test_builtin_resolution() {
        let overrides = OverrideTables::new();
        let resolver = TypeResolver::new(&overrides);

        let resolved = resolver.resolve("A", &FieldDef::primitive("site", "unsigned short"));
        assert_eq!(resolved.name, "uint32");
        assert_eq!(resolved.source, TypeSource::Builtin);
        assert!(!resolved.is_byte());

        let resolved = resolver.resolve("A", &FieldDef::primitive("flag", "byte"));
        assert_eq!(resolved.name, "sint32");
        assert!(resolved.is_byte());
    }

    #[test]
    fn test_passthrough_resolution() {
        let overrides = OverrideTables::new();
        let resolver = TypeResolver::new(&overrides);

        let resolved = resolver.resolve("A", &FieldDef::record("entityID", "EntityID"));
        assert_eq!(resolved.name, "EntityID");
        assert_eq!(resolved.source, TypeSource::Passthrough);
        assert!(resolved.is_record_reference());
        assert!(resolved.primitive.is_none());
    }

    #[test]
    fn test_field_override_wins() {
        let overrides = tables();
        let resolver = TypeResolver::new(&overrides);

        let marking = FieldDef::fixed_list("marking", "OneByteChunk", 11);
        let resolved = resolver.resolve("EntityStatePdu", &marking);
        assert_eq!(resolved.name, "MarkingString");
        assert_eq!(resolved.source, TypeSource::FieldOverride);

        let resolved = resolver.resolve("FirePdu", &marking);
        assert_eq!(resolved.source, TypeSource::TypeOverride);
        assert!(resolved.is_byte());
    }

    #[test]
    fn test_type_override_before_builtin() {
        let overrides = tables();
        let resolver = TypeResolver::new(&overrides);

        let resolved = resolver.resolve("A", &FieldDef::primitive("site", "unsigned short"));
        assert_eq!(resolved.name, "uint16");
        assert_eq!(resolved.source, TypeSource::TypeOverride);

        let resolved = resolver.resolve("A", &FieldDef::record("time", "ClockTime"));
        assert_eq!(resolved.name, "uint64");
        assert!(!resolved.is_record_reference());
    }

    #[test]
    fn test_alias_normalized_through_builtin() {
        let overrides = tables();
        let resolver = TypeResolver::new(&overrides);

        let resolved = resolver.resolve("A", &FieldDef::primitive("b", "OneByteChunk"));
        assert_eq!(resolved.name, "sint32");
        assert_eq!(resolved.primitive, Some(PrimitiveType::Byte));

        let resolved = resolver.resolve("A", &FieldDef::primitive("w", "TwoByteChunk"));
        assert_eq!(resolved.name, "uint32");
        assert!(resolved.primitive.is_none());
    }
}
