//! Signup notification hook.
//!
//! The intake service calls the configured [`SignupNotifier`] after an
//! accepted signup has been recorded. Delivery is best effort and never
//! affects the response. No mail transport ships with the site, so the
//! default is [`NoopNotifier`].

use crate::error::NotifyError;
use crate::signup::TrialSignup;

/// Outbound notification for accepted signups (e.g. an email to staff).
#[async_trait::async_trait]
pub trait SignupNotifier: Send + Sync {
    /// Notify about one accepted signup.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification could not be delivered.
    async fn notify(&self, signup: &TrialSignup) -> Result<(), NotifyError>;
}

/// Does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

#[async_trait::async_trait]
impl SignupNotifier for NoopNotifier {
    async fn notify(&self, _signup: &TrialSignup) -> Result<(), NotifyError> {
        Ok(())
    }
}
