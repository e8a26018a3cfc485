//! Output file writing.
//!
//! Each file is written to a uniquely named temporary sibling and persisted
//! over the target, so a failed write never leaves a truncated schema behind.

use crate::error::CodegenError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Writes generated files into one output directory.
#[derive(Debug, Clone)]
pub struct SchemaWriter {
    dir: PathBuf,
}

impl SchemaWriter {
    /// Creates a writer for `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the output directory if it does not exist.
    ///
    /// # Errors
    /// Returns `CodegenError::Io` if the directory cannot be created.
    pub fn prepare(&self) -> Result<(), CodegenError> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Writes one file, replacing any previous version.
    ///
    /// # Errors
    /// Returns `CodegenError::Write` if the file cannot be written.
    pub fn write(&self, file_name: &str, contents: &str) -> Result<PathBuf, CodegenError> {
        let path = self.dir.join(file_name);

        let mut tmp =
            NamedTempFile::new_in(&self.dir).map_err(|e| CodegenError::write(&path, e))?;
        tmp.write_all(contents.as_bytes())
            .and_then(|()| tmp.flush())
            .map_err(|e| CodegenError::write(&path, e))?;
        tmp.persist(&path)
            .map_err(|e| CodegenError::write(&path, e.error))?;

        Ok(path)
    }
}

/// A file that could not be written.
#[derive(Debug)]
pub struct WriteFailure {
    /// Record (or sentinel type) the file belonged to.
    pub record: String,
    /// The write error.
    pub error: CodegenError,
}

/// Outcome of a generation run.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Files written, in write order.
    pub written: Vec<PathBuf>,
    /// Records skipped because they have no fields.
    pub empty: Vec<String>,
    /// Records skipped because an override replaces them.
    pub aliased: Vec<String>,
    /// Files that failed to write.
    pub failures: Vec<WriteFailure>,
}

impl GenerationReport {
    /// Returns true if every file was written.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
