//! Signup event recorders.
//!
//! Every accepted signup is handed to each registered [`SignupRecorder`].
//! Recording is best effort: the intake service logs a recorder failure and
//! still acknowledges the signup.

use std::sync::Mutex;

use tracing::info;

use crate::error::RecordError;
use crate::signup::SignupEvent;

/// Trait for signup event sinks.
///
/// Implementations must be safe to share across async tasks.
#[async_trait::async_trait]
pub trait SignupRecorder: Send + Sync {
    /// The recorder's name (for error reporting).
    fn name(&self) -> &str;

    /// Record one accepted signup.
    ///
    /// # Errors
    ///
    /// Returns an error if the event could not be written.
    async fn record(&self, event: &SignupEvent) -> Result<(), RecordError>;
}

/// Emits each signup as a structured `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRecorder;

#[async_trait::async_trait]
impl SignupRecorder for TracingRecorder {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "tracing"
    }

    async fn record(&self, event: &SignupEvent) -> Result<(), RecordError> {
        info!(
            name = %event.name,
            email = %event.email,
            plan = %event.plan,
            student_age = %event.student_age,
            experience_level = %event.experience_level,
            "new trial signup"
        );
        Ok(())
    }
}

/// Keeps events in memory. Used by tests and local development.
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    events: Mutex<Vec<SignupEvent>>,
}

impl MemoryRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<SignupEvent> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl SignupRecorder for MemoryRecorder {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "memory"
    }

    async fn record(&self, event: &SignupEvent) -> Result<(), RecordError> {
        let mut guard = self.events.lock().map_err(|_| RecordError::BackendFailure {
            name: "memory".to_owned(),
            reason: "event list lock poisoned".to_owned(),
        })?;
        guard.push(event.clone());
        Ok(())
    }
}
