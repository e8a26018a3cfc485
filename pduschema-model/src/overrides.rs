//! Override tables and the property-file format they are loaded from.
//!
//! Three tables steer generation:
//! - `types`: keyed by a bare source type name or by `"<Record>.<field>"`
//! - `command_responses`: command record name to response record name
//! - `aliases`: record names replaced by another type and never emitted
//!
//! All three are plain `key=value` property files.

use crate::error::ParseError;
use std::collections::HashMap;
use std::path::Path;

/// Response value meaning "no response payload".
pub const VOID_RESPONSE: &str = "void";

/// Immutable lookup tables consulted during one generation run.
#[derive(Debug, Clone, Default)]
pub struct OverrideTables {
    types: HashMap<String, String>,
    command_responses: HashMap<String, String>,
    aliases: HashMap<String, String>,
}

impl OverrideTables {
    /// Creates empty override tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the type override table.
    #[must_use]
    pub fn with_types(mut self, types: HashMap<String, String>) -> Self {
        self.types = types;
        self
    }

    /// Sets the command-response table.
    #[must_use]
    pub fn with_command_responses(mut self, responses: HashMap<String, String>) -> Self {
        self.command_responses = responses;
        self
    }

    /// Sets the record alias table.
    #[must_use]
    pub fn with_aliases(mut self, aliases: HashMap<String, String>) -> Self {
        self.aliases = aliases;
        self
    }

    /// Adds a single type override.
    #[must_use]
    pub fn type_override(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.types.insert(key.into(), value.into());
        self
    }

    /// Adds a single command-response mapping.
    #[must_use]
    pub fn command_response(mut self, command: impl Into<String>, response: impl Into<String>) -> Self {
        self.command_responses.insert(command.into(), response.into());
        self
    }

    /// Adds a single record alias.
    #[must_use]
    pub fn alias(mut self, record: impl Into<String>, target: impl Into<String>) -> Self {
        self.aliases.insert(record.into(), target.into());
        self
    }

    /// Loads whichever of the three tables have a file.
    ///
    /// # Errors
    /// Returns `ParseError` if any given file cannot be read or parsed.
    pub fn load(
        types: Option<&Path>,
        command_responses: Option<&Path>,
        aliases: Option<&Path>,
    ) -> Result<Self, ParseError> {
        let mut tables = Self::new();
        if let Some(path) = types {
            tables = tables.with_types(load_properties(path)?);
        }
        if let Some(path) = command_responses {
            tables = tables.with_command_responses(load_properties(path)?);
        }
        if let Some(path) = aliases {
            tables = tables.with_aliases(load_properties(path)?);
        }
        Ok(tables)
    }

    /// Looks up the override for one field of one record.
    #[must_use]
    pub fn field_override(&self, record: &str, field: &str) -> Option<&str> {
        self.types
            .get(&format!("{record}.{field}"))
            .map(String::as_str)
    }

    /// Looks up the override for a source type name, then its alias.
    #[must_use]
    pub fn type_override_for(&self, type_name: &str) -> Option<&str> {
        self.types
            .get(type_name)
            .or_else(|| self.aliases.get(type_name))
            .map(String::as_str)
    }

    /// Returns true if a record is replaced by an override and gets no file.
    #[must_use]
    pub fn is_aliased(&self, record: &str) -> bool {
        self.types.contains_key(record) || self.aliases.contains_key(record)
    }

    /// Looks up the response type registered for a command record.
    #[must_use]
    pub fn command_response_for(&self, command: &str) -> Option<&str> {
        self.command_responses.get(command).map(String::as_str)
    }
}

/// Loads a property file.
///
/// # Errors
/// Returns `ParseError` if the file cannot be read or a line is malformed.
pub fn load_properties(path: &Path) -> Result<HashMap<String, String>, ParseError> {
    let text = std::fs::read_to_string(path)?;
    parse_properties(&text)
}

/// Parses property text into a map.
///
/// Supports `key=value`, `key:value` and `key value` separators, `#` and `!`
/// comment lines, backslash escapes and trailing-backslash continuation.
/// Later keys replace earlier ones.
///
/// # Errors
/// Returns `ParseError::InvalidProperty` for a line with an empty key.
pub fn parse_properties(text: &str) -> Result<HashMap<String, String>, ParseError> {
    let mut props = HashMap::new();
    let mut lines = text.lines().enumerate();

    while let Some((idx, raw)) = lines.next() {
        let trimmed = raw.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let mut logical = trimmed.to_string();
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let (key, value) = split_property(&logical);
        if key.is_empty() {
            return Err(ParseError::InvalidProperty {
                line: idx + 1,
                content: raw.to_string(),
            });
        }
        props.insert(key, value);
    }

    Ok(props)
}

/// Returns true if the line ends in an odd number of backslashes.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Splits a logical line at the first unescaped separator and unescapes both sides.
fn split_property(line: &str) -> (String, String) {
    let mut key = String::new();
    let mut chars = line.chars().peekable();
    let mut separated_by_space = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    key.push(unescape(next));
                }
            }
            '=' | ':' => break,
            c if c.is_whitespace() => {
                separated_by_space = true;
                break;
            }
            c => key.push(c),
        }
    }

    if separated_by_space {
        while let Some(&c) = chars.peek() {
            if c.is_whitespace() {
                chars.next();
            } else {
                break;
            }
        }
        if matches!(chars.peek(), Some('=') | Some(':')) {
            chars.next();
        }
    }

    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }

    let mut value = String::new();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                value.push(unescape(next));
            }
        } else {
            value.push(c);
        }
    }

    (key, value.trim_end().to_string())
}

fn unescape(c: char) -> char {
    match c {
        't' => '\t',
        'n' => '\n',
        'r' => '\r',
        'f' => '\x0c',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_properties_separators() {
        let props = parse_properties(
            "# type overrides\n\
             OneByteChunk=byte\n\
             TwoByteChunk : uint32\n\
             EightByteChunk uint64\n\
             ! another comment\n\
             \n\
             unsigned\\ short=uint32\n",
        )
        .expect("valid properties");

        assert_eq!(props.get("OneByteChunk").map(String::as_str), Some("byte"));
        assert_eq!(props.get("TwoByteChunk").map(String::as_str), Some("uint32"));
        assert_eq!(props.get("EightByteChunk").map(String::as_str), Some("uint64"));
        assert_eq!(props.get("unsigned short").map(String::as_str), Some("uint32"));
        assert_eq!(props.len(), 4);
    }

    #[test]
    fn test_parse_properties_continuation_and_empty_value() {
        let props = parse_properties("FirePdu=Fire\\\n    Response\nEmpty=\n").expect("valid");
        assert_eq!(props.get("FirePdu").map(String::as_str), Some("FireResponse"));
        assert_eq!(props.get("Empty").map(String::as_str), Some(""));
    }

    #[test]
    fn test_parse_properties_escaped_separator_in_key() {
        let props = parse_properties("EntityStatePdu.a\\=b = x").expect("valid");
        assert_eq!(props.get("EntityStatePdu.a=b").map(String::as_str), Some("x"));
    }

    #[test]
    fn test_parse_properties_rejects_empty_key() {
        let err = parse_properties("ok=1\n=oops\n").unwrap_err();
        match err {
            ParseError::InvalidProperty { line, content } => {
                assert_eq!(line, 2);
                assert_eq!(content, "=oops");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_override_lookups() {
        let tables = OverrideTables::new()
            .type_override("EntityStatePdu.marking", "Marking")
            .type_override("FourByteChunk", "uint32")
            .alias("OneByteChunk", "byte")
            .command_response("ActionRequestPdu", "ActionResponsePdu");

        assert_eq!(
            tables.field_override("EntityStatePdu", "marking"),
            Some("Marking")
        );
        assert_eq!(tables.field_override("FirePdu", "marking"), None);
        assert_eq!(tables.type_override_for("FourByteChunk"), Some("uint32"));
        assert_eq!(tables.type_override_for("OneByteChunk"), Some("byte"));
        assert_eq!(tables.type_override_for("EntityID"), None);
        assert!(tables.is_aliased("OneByteChunk"));
        assert!(tables.is_aliased("FourByteChunk"));
        assert!(!tables.is_aliased("EntityID"));
        assert_eq!(
            tables.command_response_for("ActionRequestPdu"),
            Some("ActionResponsePdu")
        );
    }

    #[test]
    fn test_type_table_wins_over_alias() {
        let tables = OverrideTables::new()
            .type_override("Chunk", "uint64")
            .alias("Chunk", "byte");
        assert_eq!(tables.type_override_for("Chunk"), Some("uint64"));
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let types = dir.path().join("types.properties");
        let responses = dir.path().join("responses.properties");
        std::fs::write(&types, "OneByteChunk=byte\n").expect("write");
        std::fs::write(&responses, "ActionRequestPdu=void\n").expect("write");

        let tables = OverrideTables::load(Some(&types), Some(&responses), None).expect("load");
        assert_eq!(tables.type_override_for("OneByteChunk"), Some("byte"));
        assert_eq!(tables.command_response_for("ActionRequestPdu"), Some(VOID_RESPONSE));
    }
}
