//! Trial signup data model.
//!
//! A [`Submission`] is whatever the browser posted: an untyped map of field
//! name to value. Validation turns it into a [`TrialSignup`], the only shape
//! the rest of the system sees. Nothing here is persisted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Raw form or JSON body, keyed by field name.
pub type Submission = serde_json::Map<String, serde_json::Value>;

/// Acknowledgment sent back after an accepted signup.
pub const SUCCESS_MESSAGE: &str =
    "Trial signup submitted successfully! We will contact you within 24 hours.";

/// Lesson plan the trial is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Basic,
    Standard,
    Premium,
}

impl Plan {
    /// Accepted wire values, in display order.
    pub const NAMES: &'static [&'static str] = &["basic", "standard", "premium"];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Standard => "standard",
            Self::Premium => "premium",
        }
    }
}

impl FromStr for Plan {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Self::Basic),
            "standard" => Ok(Self::Standard),
            "premium" => Ok(Self::Premium),
            other => Err(UnknownVariant(other.to_owned())),
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much English the student already has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    /// Accepted wire values, in display order.
    pub const NAMES: &'static [&'static str] = &["beginner", "intermediate", "advanced"];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(UnknownVariant(other.to_owned())),
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value outside an enum's accepted set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value '{0}'")]
pub struct UnknownVariant(pub String);

/// A fully validated trial signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialSignup {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Free-form age range token such as `8-10` or `17+`.
    pub student_age: String,
    pub plan: Plan,
    pub learning_goals: Option<String>,
    pub preferred_schedule: Option<String>,
    pub experience_level: ExperienceLevel,
}

impl TrialSignup {
    /// The record emitted for this signup. Contact phone, goals and schedule
    /// stay out of it.
    #[must_use]
    pub fn event(&self) -> SignupEvent {
        SignupEvent {
            name: self.name.clone(),
            email: self.email.clone(),
            plan: self.plan,
            student_age: self.student_age.clone(),
            experience_level: self.experience_level,
        }
    }
}

/// Structured record emitted once per accepted signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupEvent {
    pub name: String,
    pub email: String,
    pub plan: Plan,
    pub student_age: String,
    pub experience_level: ExperienceLevel,
}

/// Response body for an accepted signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialSignupResult {
    pub success: bool,
    pub message: String,
}

impl TrialSignupResult {
    #[must_use]
    pub fn accepted() -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_owned(),
        }
    }
}
