//! Record definitions.
//!
//! This module contains the data structures describing one PDU-style record
//! layout: its ordered fields, inheritance link, comment and initial values.

/// Name of the initial value carrying the protocol identifier.
pub const PDU_TYPE_KEY: &str = "pduType";

/// Record (message or embedded structure) definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDef {
    /// Record name.
    pub name: String,
    /// Parent record name, or a no-inheritance sentinel such as `root`.
    pub parent: String,
    /// Fields in declaration order.
    pub fields: Vec<FieldDef>,
    /// Free-text description.
    pub comment: Option<String>,
    /// Initial values in declaration order.
    pub initial_values: Vec<InitialValue>,
}

impl RecordDef {
    /// Creates a new record inheriting from `parent`.
    #[must_use]
    pub fn new(name: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: parent.into(),
            fields: Vec::new(),
            comment: None,
            initial_values: Vec::new(),
        }
    }

    /// Sets the record comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Appends a field, builder style.
    #[must_use]
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends an initial value, builder style.
    #[must_use]
    pub fn with_initial_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.initial_values.push(InitialValue::new(name, value));
        self
    }

    /// Adds a field to the record.
    pub fn add_field(&mut self, field: FieldDef) {
        self.fields.push(field);
    }

    /// Adds an initial value to the record.
    pub fn add_initial_value(&mut self, value: InitialValue) {
        self.initial_values.push(value);
    }

    /// Returns true if the record declares no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the raw `pduType` initial value, if declared.
    ///
    /// When the value is declared more than once the last declaration wins.
    #[must_use]
    pub fn pdu_type(&self) -> Option<&str> {
        self.initial_values
            .iter()
            .rev()
            .find(|v| v.name.eq_ignore_ascii_case(PDU_TYPE_KEY))
            .map(|v| v.value.as_str())
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Structural kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Scalar of a builtin primitive type.
    Primitive,
    /// Embedded reference to another record.
    RecordReference,
    /// List with a length fixed by the layout.
    FixedList,
    /// List whose length is carried by a count field.
    VariableList,
}

impl FieldKind {
    /// Returns true for both list kinds.
    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(self, Self::FixedList | Self::VariableList)
    }
}

/// Field definition within a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Declared type: a builtin primitive name or a record name.
    pub type_name: String,
    /// Structural kind.
    pub kind: FieldKind,
    /// Description.
    pub comment: Option<String>,
    /// Whether a byte list holds text.
    pub could_be_string: bool,
    /// Declared length of a fixed list.
    pub length: Option<usize>,
}

impl FieldDef {
    /// Creates a new field definition.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            kind,
            comment: None,
            could_be_string: false,
            length: None,
        }
    }

    /// Creates a primitive field.
    #[must_use]
    pub fn primitive(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(name, type_name, FieldKind::Primitive)
    }

    /// Creates a record reference field.
    #[must_use]
    pub fn record(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(name, type_name, FieldKind::RecordReference)
    }

    /// Creates a fixed-length list field.
    #[must_use]
    pub fn fixed_list(name: impl Into<String>, type_name: impl Into<String>, length: usize) -> Self {
        let mut field = Self::new(name, type_name, FieldKind::FixedList);
        field.length = Some(length);
        field
    }

    /// Creates a variable-length list field.
    #[must_use]
    pub fn variable_list(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(name, type_name, FieldKind::VariableList)
    }

    /// Sets the field comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Marks a byte list as text.
    #[must_use]
    pub fn as_string(mut self) -> Self {
        self.could_be_string = true;
        self
    }

    /// Returns true if the field exists only for alignment.
    #[must_use]
    pub fn is_padding(&self) -> bool {
        self.name.starts_with("pad") || self.name.ends_with("Padding")
    }
}

/// Initial value assigned to a record variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialValue {
    /// Variable name.
    pub name: String,
    /// Raw value.
    pub value: String,
}

impl InitialValue {
    /// Creates a new initial value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
