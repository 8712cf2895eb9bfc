//! Error types for `toptalks-core`.
//!
//! Validation failures carry one entry per failing field so the HTTP layer can
//! render them without re-deriving anything. Recorder and notifier errors
//! exist so collaborators can report what went wrong; the intake service logs
//! and drops them.

use std::collections::BTreeMap;

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Submitted field name, e.g. `student_age`.
    pub field: &'static str,
    /// Human-readable reason naming the broken constraint.
    pub message: String,
}

/// The whole submission was rejected. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", self.summary())]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Wrap a list of field errors. Returns `None` when the list is empty,
    /// since an empty rejection is not a rejection.
    #[must_use]
    pub fn from_fields(errors: Vec<FieldError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    /// Callers guarantee `errors` is non-empty.
    pub(crate) fn new(errors: Vec<FieldError>) -> Self {
        debug_assert!(!errors.is_empty());
        Self { errors }
    }

    /// Field errors in rule order.
    #[must_use]
    pub fn fields(&self) -> &[FieldError] {
        &self.errors
    }

    /// Whether `field` is among the failures.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Messages for one field.
    #[must_use]
    pub fn messages_for(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    /// Messages grouped by field name, the shape returned to HTTP clients.
    #[must_use]
    pub fn by_field(&self) -> BTreeMap<&'static str, Vec<String>> {
        let mut map: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
        for e in &self.errors {
            map.entry(e.field).or_default().push(e.message.clone());
        }
        map
    }

    /// One-line summary: the first message plus a count of the rest.
    #[must_use]
    pub fn summary(&self) -> String {
        let first = self
            .errors
            .first()
            .map_or("The given data was invalid.", |e| e.message.as_str());
        match self.errors.len().saturating_sub(1) {
            0 => first.to_owned(),
            1 => format!("{first} (and 1 more error)"),
            n => format!("{first} (and {n} more errors)"),
        }
    }
}

/// Errors from signup recorders.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// The recorder's destination could not be opened.
    #[error("cannot open signup log '{path}': {reason}")]
    Open { path: String, reason: String },

    /// The recorder could not write the event.
    #[error("signup recorder '{name}' failed: {reason}")]
    BackendFailure { name: String, reason: String },

    /// The event could not be serialized.
    #[error("signup event serialization failed: {reason}")]
    Serialization { reason: String },
}

/// Errors from the signup notification hook.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The notification could not be delivered.
    #[error("signup notification failed: {reason}")]
    Delivery { reason: String },
}

/// Errors from asset manifest loading and shell rendering.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// The manifest file could not be read.
    #[error("failed to read asset manifest '{path}': {reason}")]
    Read { path: String, reason: String },

    /// The manifest is not valid JSON in the expected shape.
    #[error("invalid asset manifest '{path}': {reason}")]
    Parse { path: String, reason: String },

    /// The manifest has no chunk for the requested entry point.
    #[error("asset manifest has no entry for '{entry}'")]
    MissingEntry { entry: String },

    /// The page data could not be encoded.
    #[error("failed to encode page data: {reason}")]
    Encode { reason: String },
}
