//! Trial intake service.
//!
//! Validates a raw submission, records the accepted signup with every
//! registered recorder, fires the notification hook, and returns the
//! acknowledgment. A rejected submission has no side effects at all.
//!
//! Recorder and notifier failures are logged and swallowed: once validation
//! passes the caller always gets a success acknowledgment. Each collaborator
//! call is bounded by [`IntakeService::with_sink_timeout`], so a stuck sink
//! delays an acknowledgment by at most that long.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::ValidationErrors;
use crate::notify::{NoopNotifier, SignupNotifier};
use crate::record::SignupRecorder;
use crate::signup::{Submission, TrialSignupResult};
use crate::validation::validate_trial_signup;

/// Default bound on a single recorder or notifier call.
pub const DEFAULT_SINK_TIMEOUT: Duration = Duration::from_secs(2);

/// Stateless signup handler shared across requests.
pub struct IntakeService {
    recorders: Vec<Arc<dyn SignupRecorder>>,
    notifier: Arc<dyn SignupNotifier>,
    sink_timeout: Duration,
}

impl IntakeService {
    /// A service with no recorders and the no-op notifier.
    #[must_use]
    pub fn new() -> Self {
        Self {
            recorders: Vec::new(),
            notifier: Arc::new(NoopNotifier),
            sink_timeout: DEFAULT_SINK_TIMEOUT,
        }
    }

    /// Bound each recorder and notifier call. Calls that overrun are
    /// abandoned and logged.
    #[must_use]
    pub fn with_sink_timeout(mut self, limit: Duration) -> Self {
        self.sink_timeout = limit;
        self
    }

    /// Register a recorder. Recorders run in registration order.
    #[must_use]
    pub fn with_recorder(mut self, recorder: Arc<dyn SignupRecorder>) -> Self {
        self.recorders.push(recorder);
        self
    }

    /// Replace the notification hook.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn SignupNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Names of the registered recorders.
    #[must_use]
    pub fn recorder_names(&self) -> Vec<&str> {
        self.recorders.iter().map(|r| r.name()).collect()
    }

    /// Handle one trial signup submission.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] if any field fails validation. Nothing is
    /// recorded in that case.
    pub async fn submit(
        &self,
        input: &Submission,
    ) -> Result<TrialSignupResult, ValidationErrors> {
        let signup = match validate_trial_signup(input) {
            Ok(signup) => signup,
            Err(errors) => {
                debug!(failed = errors.fields().len(), "trial signup rejected");
                return Err(errors);
            }
        };

        let event = signup.event();
        for recorder in &self.recorders {
            match timeout(self.sink_timeout, recorder.record(&event)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(
                    recorder = recorder.name(),
                    error = %e,
                    "failed to record trial signup"
                ),
                Err(_) => warn!(
                    recorder = recorder.name(),
                    timeout = ?self.sink_timeout,
                    "trial signup recorder timed out"
                ),
            }
        }

        match timeout(self.sink_timeout, self.notifier.notify(&signup)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "trial signup notification failed"),
            Err(_) => warn!(
                timeout = ?self.sink_timeout,
                "trial signup notification timed out"
            ),
        }

        Ok(TrialSignupResult::accepted())
    }
}

impl Default for IntakeService {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for IntakeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntakeService")
            .field("recorders", &self.recorder_names())
            .field("sink_timeout", &self.sink_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;
    use crate::error::{NotifyError, RecordError};
    use crate::record::MemoryRecorder;
    use crate::signup::{ExperienceLevel, Plan, SignupEvent, TrialSignup, SUCCESS_MESSAGE};

    struct FailingRecorder;

    #[async_trait::async_trait]
    impl SignupRecorder for FailingRecorder {
        fn name(&self) -> &str {
            "failing"
        }

        async fn record(&self, _event: &SignupEvent) -> Result<(), RecordError> {
            Err(RecordError::BackendFailure {
                name: "failing".to_owned(),
                reason: "disk full".to_owned(),
            })
        }
    }

    struct StalledRecorder;

    #[async_trait::async_trait]
    impl SignupRecorder for StalledRecorder {
        fn name(&self) -> &str {
            "stalled"
        }

        async fn record(&self, _event: &SignupEvent) -> Result<(), RecordError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        }
    }

    struct StalledNotifier;

    #[async_trait::async_trait]
    impl SignupNotifier for StalledNotifier {
        async fn notify(&self, _signup: &TrialSignup) -> Result<(), NotifyError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingNotifier {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl SignupNotifier for CountingNotifier {
        async fn notify(&self, _signup: &TrialSignup) -> Result<(), NotifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(NotifyError::Delivery {
                    reason: "smtp unreachable".to_owned(),
                });
            }
            Ok(())
        }
    }

    fn minimal() -> Submission {
        json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "student_age": "8-10",
            "plan": "standard",
            "experience_level": "beginner",
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[tokio::test]
    async fn accepted_signup_records_one_event() {
        let memory = Arc::new(MemoryRecorder::new());
        let service = IntakeService::new().with_recorder(memory.clone());

        let result = service.submit(&minimal()).await.unwrap();
        assert!(result.success);
        assert_eq!(result.message, SUCCESS_MESSAGE);

        let events = memory.events();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            SignupEvent {
                name: "Jane Doe".to_owned(),
                email: "jane@example.com".to_owned(),
                plan: Plan::Standard,
                student_age: "8-10".to_owned(),
                experience_level: ExperienceLevel::Beginner,
            }
        );
    }

    #[tokio::test]
    async fn rejected_signup_has_no_side_effects() {
        let memory = Arc::new(MemoryRecorder::new());
        let notifier = Arc::new(CountingNotifier::default());
        let service = IntakeService::new()
            .with_recorder(memory.clone())
            .with_notifier(notifier.clone());

        let mut input = minimal();
        input.insert("plan".to_owned(), json!("gold"));

        let errors = service.submit(&input).await.unwrap_err();
        assert!(errors.has("plan"));
        assert!(memory.events().is_empty());
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn repeated_submissions_are_independent() {
        let memory = Arc::new(MemoryRecorder::new());
        let service = IntakeService::new().with_recorder(memory.clone());

        service.submit(&minimal()).await.unwrap();
        service.submit(&minimal()).await.unwrap();

        assert_eq!(memory.events().len(), 2);
    }

    #[tokio::test]
    async fn recorder_failure_does_not_fail_the_signup() {
        let memory = Arc::new(MemoryRecorder::new());
        let service = IntakeService::new()
            .with_recorder(Arc::new(FailingRecorder))
            .with_recorder(memory.clone());

        let result = service.submit(&minimal()).await.unwrap();
        assert!(result.success);
        assert_eq!(memory.events().len(), 1);
    }

    #[tokio::test]
    async fn notifier_runs_once_and_its_failure_is_swallowed() {
        let notifier = Arc::new(CountingNotifier {
            calls: AtomicUsize::new(0),
            fail: true,
        });
        let service = IntakeService::new().with_notifier(notifier.clone());

        let result = service.submit(&minimal()).await.unwrap();
        assert!(result.success);
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stalled_recorder_does_not_hold_the_acknowledgment() {
        let memory = Arc::new(MemoryRecorder::new());
        let service = IntakeService::new()
            .with_sink_timeout(Duration::from_millis(50))
            .with_recorder(Arc::new(StalledRecorder))
            .with_recorder(memory.clone());

        let result = tokio::time::timeout(Duration::from_secs(5), service.submit(&minimal()))
            .await
            .expect("acknowledgment waited on the stalled recorder")
            .unwrap();
        assert!(result.success);
        assert_eq!(memory.events().len(), 1);
    }

    #[tokio::test]
    async fn stalled_notifier_does_not_hold_the_acknowledgment() {
        let service = IntakeService::new()
            .with_sink_timeout(Duration::from_millis(50))
            .with_notifier(Arc::new(StalledNotifier));

        let result = tokio::time::timeout(Duration::from_secs(5), service.submit(&minimal()))
            .await
            .expect("acknowledgment waited on the stalled notifier")
            .unwrap();
        assert!(result.success);
    }

    #[test]
    fn debug_lists_recorders() {
        let service = IntakeService::new().with_recorder(Arc::new(MemoryRecorder::new()));
        assert_eq!(service.recorder_names(), ["memory"]);
        assert!(format!("{service:?}").contains("memory"));
    }
}
