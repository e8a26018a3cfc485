//! Record classification.
//!
//! Decides which schema construct a record becomes. Records without a
//! protocol id are plain types; the rest become components, event
//! components, or commands depending on their fields.

use super::resolver::TypeResolver;
use crate::config::GeneratorConfig;
use pduschema_model::{ModelError, OverrideTables, RecordDef, VOID_RESPONSE};

/// Field name marking a request/response record.
pub const REQUEST_ID_FIELD: &str = "requestID";

/// Schema construct a record is emitted as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// Plain `type` declaration.
    Type,
    /// Replicated `component` with an id.
    Component,
    /// `component <Name>Event` wrapping the record as an event.
    EventComponent,
    /// `component <Name>Command` wrapping the record as a command request.
    Command {
        /// Response type name.
        response: String,
    },
}

/// Classification result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Construct to emit.
    pub role: Role,
    /// Component id, 0 for records without a protocol id.
    pub id: u32,
}

impl Classification {
    /// Returns true for a command that fell back to a plain type because no
    /// response is registered.
    #[must_use]
    pub fn is_unmapped_command(&self) -> bool {
        self.role == Role::Type && self.id != 0
    }
}

/// Classifies records into schema roles.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    resolver: TypeResolver<'a>,
    overrides: &'a OverrideTables,
    config: &'a GeneratorConfig,
}

impl<'a> Classifier<'a> {
    /// Creates a new classifier.
    #[must_use]
    pub fn new(
        resolver: TypeResolver<'a>,
        overrides: &'a OverrideTables,
        config: &'a GeneratorConfig,
    ) -> Self {
        Self {
            resolver,
            overrides,
            config,
        }
    }

    /// Computes the component id of a record.
    ///
    /// Ids that come out zero or negative once the offset is applied mean
    /// the record has no protocol id and yield 0.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidPduType` if the declared `pduType` is not an
    /// integer or the id does not fit in a `u32` once the offset is applied.
    pub fn component_id(&self, record: &RecordDef) -> Result<u32, ModelError> {
        let Some(raw) = record.pdu_type() else {
            return Ok(0);
        };
        let id = raw
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|id| id.checked_add(i64::from(self.config.pdu_offset)))
            .ok_or_else(|| ModelError::invalid_pdu_type(&record.name, raw))?;
        if id <= 0 {
            return Ok(0);
        }
        u32::try_from(id).map_err(|_| ModelError::invalid_pdu_type(&record.name, raw))
    }

    /// Classifies a record.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidPduType` if the component id is unusable.
    pub fn classify(&self, record: &RecordDef) -> Result<Classification, ModelError> {
        let id = self.component_id(record)?;
        if id == 0 {
            return Ok(Classification {
                role: Role::Type,
                id,
            });
        }

        let role = if self.has_event_identifier(record) {
            Role::EventComponent
        } else if has_request_id(record) {
            match self.overrides.command_response_for(&record.name) {
                Some(response) => Role::Command {
                    response: self.response_type(response),
                },
                None => {
                    tracing::warn!(
                        record = %record.name,
                        id,
                        "command has no registered response, emitting a plain type"
                    );
                    Role::Type
                }
            }
        } else {
            Role::Component
        };

        Ok(Classification { role, id })
    }

    fn has_event_identifier(&self, record: &RecordDef) -> bool {
        record
            .fields
            .iter()
            .any(|f| self.resolver.resolve(&record.name, f).name == self.config.event_type)
    }

    fn response_type(&self, response: &str) -> String {
        let response = response.trim();
        if response.is_empty() || response.eq_ignore_ascii_case(VOID_RESPONSE) {
            self.config.void_type.clone()
        } else {
            response.to_string()
        }
    }
}

fn has_request_id(record: &RecordDef) -> bool {
    record
        .fields
        .iter()
        .any(|f| f.name.eq_ignore_ascii_case(REQUEST_ID_FIELD))
}
