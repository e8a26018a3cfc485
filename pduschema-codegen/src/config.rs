//! Generator run configuration.

use std::path::{Path, PathBuf};

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "schema";
/// Default name of the record type that marks an event component.
pub const DEFAULT_EVENT_TYPE: &str = "EventIdentifier";
/// Default name of the shared empty type.
pub const DEFAULT_VOID_TYPE: &str = "Void";
/// File extension of generated files.
pub const SCHEMA_EXTENSION: &str = "schema";

/// Configuration for one generation run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Directory receiving the generated files.
    pub output_dir: PathBuf,
    /// Package namespace, also used as the import path prefix.
    pub namespace: Option<String>,
    /// Added to every declared `pduType` to form component ids.
    pub pdu_offset: u32,
    /// Record type whose presence makes a component an event.
    pub event_type: String,
    /// Name of the shared empty type.
    pub void_type: String,
    /// Parent names that mean "no inheritance".
    pub root_parents: Vec<String>,
}

impl GeneratorConfig {
    /// Creates a configuration writing into `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            namespace: None,
            pdu_offset: 0,
            event_type: DEFAULT_EVENT_TYPE.to_string(),
            void_type: DEFAULT_VOID_TYPE.to_string(),
            root_parents: vec!["root".to_string(), "Pdu".to_string()],
        }
    }

    /// Sets the package namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Sets the component id offset.
    #[must_use]
    pub fn with_pdu_offset(mut self, offset: u32) -> Self {
        self.pdu_offset = offset;
        self
    }

    /// Sets the event identifier type name.
    #[must_use]
    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    /// Sets the shared empty type name.
    #[must_use]
    pub fn with_void_type(mut self, void_type: impl Into<String>) -> Self {
        self.void_type = void_type.into();
        self
    }

    /// Replaces the no-inheritance parent names.
    #[must_use]
    pub fn with_root_parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.root_parents = parents.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the output directory.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns the file name generated for a type.
    #[must_use]
    pub fn file_name(&self, type_name: &str) -> String {
        format!("{type_name}.{SCHEMA_EXTENSION}")
    }

    /// Returns the `package` statement, if a namespace is set.
    #[must_use]
    pub fn package_line(&self) -> Option<String> {
        self.namespace
            .as_deref()
            .map(|ns| format!("package {};", ns.to_lowercase()))
    }

    /// Returns the import statement for a type.
    #[must_use]
    pub fn import_line(&self, type_name: &str) -> String {
        match self.namespace.as_deref() {
            Some(ns) => format!("import \"{ns}/{}\";", self.file_name(type_name)),
            None => format!("import \"{}\";", self.file_name(type_name)),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_DIR)
    }
}
