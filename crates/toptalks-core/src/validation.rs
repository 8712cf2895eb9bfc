//! Trial signup validation.
//!
//! The rules are a fixed, ordered table: one [`FieldRule`] per submitted
//! field, each with a list of pure [`Check`]s. Every field is evaluated and
//! reports its first failing check, so a rejected submission lists every
//! broken field at once. Nothing here has side effects; the same input always
//! yields the same outcome.
//!
//! Input is normalised before checking: strings are trimmed, and an empty
//! string or JSON `null` counts as absent.

use std::collections::HashMap;
use std::str::FromStr;

use serde_json::Value;
use validator::ValidateEmail;

use crate::error::{FieldError, ValidationErrors};
use crate::signup::{ExperienceLevel, Plan, Submission, TrialSignup};

/// Longest accepted `name`, in characters.
pub const NAME_MAX: usize = 255;
/// Longest accepted `email`, in characters.
pub const EMAIL_MAX: usize = 255;
/// Longest accepted `phone`, in characters.
pub const PHONE_MAX: usize = 20;
/// Longest accepted `learning_goals`, in characters.
pub const LEARNING_GOALS_MAX: usize = 1000;

/// A single constraint on a present, string-typed value.
#[derive(Debug, Clone, Copy)]
pub enum Check {
    /// At most this many characters.
    MaxChars(usize),
    /// Standard email address grammar.
    Email,
    /// Exactly one of the listed values.
    OneOf(&'static [&'static str]),
}

impl Check {
    /// Apply the check to `value`, returning the failure message on error.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message naming the broken constraint.
    pub fn apply(self, field: &str, value: &str) -> Result<(), String> {
        match self {
            Self::MaxChars(max) => {
                if value.chars().count() > max {
                    return Err(format!(
                        "The {} field must not be greater than {max} characters.",
                        label(field)
                    ));
                }
            }
            Self::Email => {
                if !value.validate_email() {
                    return Err(format!(
                        "The {} field must be a valid email address.",
                        label(field)
                    ));
                }
            }
            Self::OneOf(allowed) => {
                if !allowed.contains(&value) {
                    return Err(format!("The selected {} is invalid.", label(field)));
                }
            }
        }
        Ok(())
    }
}

/// Rules for one submitted field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub required: bool,
    pub checks: &'static [Check],
}

/// The trial signup rule table, in evaluation order.
pub const TRIAL_SIGNUP_RULES: &[FieldRule] = &[
    FieldRule {
        field: "name",
        required: true,
        checks: &[Check::MaxChars(NAME_MAX)],
    },
    FieldRule {
        field: "email",
        required: true,
        checks: &[Check::Email, Check::MaxChars(EMAIL_MAX)],
    },
    FieldRule {
        field: "phone",
        required: false,
        checks: &[Check::MaxChars(PHONE_MAX)],
    },
    FieldRule {
        field: "student_age",
        required: true,
        checks: &[],
    },
    FieldRule {
        field: "plan",
        required: true,
        checks: &[Check::OneOf(Plan::NAMES)],
    },
    FieldRule {
        field: "learning_goals",
        required: false,
        checks: &[Check::MaxChars(LEARNING_GOALS_MAX)],
    },
    FieldRule {
        field: "preferred_schedule",
        required: false,
        checks: &[],
    },
    FieldRule {
        field: "experience_level",
        required: true,
        checks: &[Check::OneOf(ExperienceLevel::NAMES)],
    },
];

/// Validate a raw submission against [`TRIAL_SIGNUP_RULES`].
///
/// # Errors
///
/// Returns [`ValidationErrors`] listing every failing field if any rule fails.
pub fn validate_trial_signup(input: &Submission) -> Result<TrialSignup, ValidationErrors> {
    let mut errors = Vec::new();
    let mut clean: HashMap<&'static str, String> = HashMap::new();

    for rule in TRIAL_SIGNUP_RULES {
        match check_field(rule, input.get(rule.field)) {
            Ok(Some(value)) => {
                clean.insert(rule.field, value);
            }
            Ok(None) => {}
            Err(message) => errors.push(FieldError {
                field: rule.field,
                message,
            }),
        }
    }

    if let Some(rejected) = ValidationErrors::from_fields(errors) {
        return Err(rejected);
    }

    build(clean)
}

/// Run one rule. `Ok(None)` means an optional field was absent.
fn check_field(rule: &FieldRule, raw: Option<&Value>) -> Result<Option<String>, String> {
    let value = match raw {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Some(_) => {
            return Err(format!("The {} field must be a string.", label(rule.field)));
        }
    };

    let Some(value) = value else {
        if rule.required {
            return Err(format!("The {} field is required.", label(rule.field)));
        }
        return Ok(None);
    };

    for check in rule.checks {
        check.apply(rule.field, &value)?;
    }

    Ok(Some(value))
}

/// Assemble the typed signup from values that already passed the rule table.
fn build(mut clean: HashMap<&'static str, String>) -> Result<TrialSignup, ValidationErrors> {
    let name = take(&mut clean, "name");
    let email = take(&mut clean, "email");
    let student_age = take(&mut clean, "student_age");
    let plan = take(&mut clean, "plan").and_then(|v| parse_choice::<Plan>("plan", &v));
    let experience_level = take(&mut clean, "experience_level")
        .and_then(|v| parse_choice::<ExperienceLevel>("experience_level", &v));

    match (name, email, student_age, plan, experience_level) {
        (Ok(name), Ok(email), Ok(student_age), Ok(plan), Ok(experience_level)) => {
            Ok(TrialSignup {
                name,
                email,
                phone: clean.remove("phone"),
                student_age,
                plan,
                learning_goals: clean.remove("learning_goals"),
                preferred_schedule: clean.remove("preferred_schedule"),
                experience_level,
            })
        }
        (name, email, student_age, plan, experience_level) => {
            let errors = [
                name.err(),
                email.err(),
                student_age.err(),
                plan.err(),
                experience_level.err(),
            ]
            .into_iter()
            .flatten()
            .collect();
            Err(ValidationErrors::new(errors))
        }
    }
}

fn take(
    clean: &mut HashMap<&'static str, String>,
    field: &'static str,
) -> Result<String, FieldError> {
    clean.remove(field).ok_or_else(|| FieldError {
        field,
        message: format!("The {} field is required.", label(field)),
    })
}

fn parse_choice<T: FromStr>(field: &'static str, value: &str) -> Result<T, FieldError> {
    value.parse().map_err(|_| FieldError {
        field,
        message: format!("The selected {} is invalid.", label(field)),
    })
}

/// Display form of a field name: `student_age` becomes `student age`.
fn label(field: &str) -> String {
    field.replace('_', " ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn submission(value: Value) -> Submission {
        value.as_object().cloned().unwrap()
    }

    fn minimal() -> Submission {
        submission(json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "student_age": "8-10",
            "plan": "standard",
            "experience_level": "beginner",
        }))
    }

    fn with(field: &str, value: Value) -> Submission {
        let mut input = minimal();
        input.insert(field.to_owned(), value);
        input
    }

    fn without(field: &str) -> Submission {
        let mut input = minimal();
        input.remove(field);
        input
    }

    #[test]
    fn minimal_payload_is_accepted() {
        let signup = validate_trial_signup(&minimal()).unwrap();
        assert_eq!(signup.name, "Jane Doe");
        assert_eq!(signup.email, "jane@example.com");
        assert_eq!(signup.student_age, "8-10");
        assert_eq!(signup.plan, Plan::Standard);
        assert_eq!(signup.experience_level, ExperienceLevel::Beginner);
        assert_eq!(signup.phone, None);
        assert_eq!(signup.learning_goals, None);
        assert_eq!(signup.preferred_schedule, None);
    }

    #[test]
    fn full_payload_keeps_optional_fields() {
        let mut input = minimal();
        input.insert("phone".to_owned(), json!("+44 20 7946 0958"));
        input.insert("learning_goals".to_owned(), json!("Pass the school exam"));
        input.insert("preferred_schedule".to_owned(), json!("evening"));

        let signup = validate_trial_signup(&input).unwrap();
        assert_eq!(signup.phone.as_deref(), Some("+44 20 7946 0958"));
        assert_eq!(signup.learning_goals.as_deref(), Some("Pass the school exam"));
        assert_eq!(signup.preferred_schedule.as_deref(), Some("evening"));
    }

    #[test]
    fn each_required_field_is_reported_when_missing() {
        for field in ["name", "email", "student_age", "plan", "experience_level"] {
            let errors = validate_trial_signup(&without(field)).unwrap_err();
            assert!(errors.has(field), "missing {field} not reported");
            assert_eq!(errors.fields().len(), 1, "only {field} should fail");
        }
    }

    #[test]
    fn blank_and_null_count_as_missing() {
        let errors = validate_trial_signup(&with("name", json!("   "))).unwrap_err();
        assert_eq!(errors.messages_for("name"), ["The name field is required."]);

        let errors = validate_trial_signup(&with("student_age", Value::Null)).unwrap_err();
        assert_eq!(
            errors.messages_for("student_age"),
            ["The student age field is required."]
        );
    }

    #[test]
    fn blank_optional_fields_are_absent() {
        let mut input = minimal();
        input.insert("phone".to_owned(), json!(""));
        input.insert("learning_goals".to_owned(), Value::Null);

        let signup = validate_trial_signup(&input).unwrap();
        assert_eq!(signup.phone, None);
        assert_eq!(signup.learning_goals, None);
    }

    #[test]
    fn unknown_plan_is_rejected() {
        let errors = validate_trial_signup(&with("plan", json!("gold"))).unwrap_err();
        assert_eq!(errors.messages_for("plan"), ["The selected plan is invalid."]);
    }

    #[test]
    fn unknown_experience_level_is_rejected() {
        let errors =
            validate_trial_signup(&with("experience_level", json!("expert"))).unwrap_err();
        assert!(errors.has("experience_level"));
        assert!(!errors.has("plan"));
    }

    #[test]
    fn malformed_email_is_rejected() {
        for bad in ["not-an-email", "jane@", "@example.com", "jane doe@example.com"] {
            let errors = validate_trial_signup(&with("email", json!(bad))).unwrap_err();
            assert_eq!(
                errors.messages_for("email"),
                ["The email field must be a valid email address."],
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn length_limits_are_enforced() {
        let cases = [
            ("name", NAME_MAX),
            ("phone", PHONE_MAX),
            ("learning_goals", LEARNING_GOALS_MAX),
        ];
        for (field, max) in cases {
            let at_limit = validate_trial_signup(&with(field, json!("a".repeat(max))));
            assert!(at_limit.is_ok(), "{field} at {max} chars should pass");

            let errors =
                validate_trial_signup(&with(field, json!("a".repeat(max + 1)))).unwrap_err();
            assert_eq!(
                errors.messages_for(field),
                [format!(
                    "The {} field must not be greater than {max} characters.",
                    field.replace('_', " ")
                )]
            );
        }
    }

    /// A well-formed address of `EMAIL_MAX + 1` characters.
    fn long_valid_email() -> String {
        format!(
            "{}@{}.{}.{}.{}.com",
            "a".repeat(64),
            "b".repeat(60),
            "c".repeat(60),
            "d".repeat(60),
            "e".repeat(4)
        )
    }

    #[test]
    fn overlong_email_is_rejected_by_length() {
        let email = long_valid_email();
        assert_eq!(email.chars().count(), EMAIL_MAX + 1);
        assert!(email.as_str().validate_email());

        let errors = validate_trial_signup(&with("email", json!(email))).unwrap_err();
        assert_eq!(
            errors.messages_for("email"),
            ["The email field must not be greater than 255 characters."]
        );
    }

    #[test]
    fn overlong_local_part_fails_the_grammar() {
        let email = format!("{}@example.com", "a".repeat(250));
        let errors = validate_trial_signup(&with("email", json!(email))).unwrap_err();
        assert_eq!(
            errors.messages_for("email"),
            ["The email field must be a valid email address."]
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let name = "é".repeat(NAME_MAX);
        assert!(name.len() > NAME_MAX);
        assert!(validate_trial_signup(&with("name", json!(name))).is_ok());
    }

    #[test]
    fn non_string_values_are_rejected() {
        let errors = validate_trial_signup(&with("student_age", json!(9))).unwrap_err();
        assert_eq!(
            errors.messages_for("student_age"),
            ["The student age field must be a string."]
        );
    }

    #[test]
    fn every_failing_field_is_listed() {
        let input = submission(json!({
            "email": "not-an-email",
            "plan": "gold",
            "phone": "1".repeat(21),
        }));
        let errors = validate_trial_signup(&input).unwrap_err();
        let fields: Vec<&str> = errors.fields().iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            ["name", "email", "phone", "student_age", "plan", "experience_level"]
        );
    }

    #[test]
    fn rejection_is_deterministic() {
        let input = with("plan", json!("gold"));
        let first = validate_trial_signup(&input).unwrap_err();
        let second = validate_trial_signup(&input).unwrap_err();
        assert_eq!(first, second);
    }

    #[test]
    fn values_are_trimmed() {
        let signup = validate_trial_signup(&with("name", json!("  Jane Doe  "))).unwrap();
        assert_eq!(signup.name, "Jane Doe");
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let signup = validate_trial_signup(&with("referrer", json!("newsletter"))).unwrap();
        assert_eq!(signup.plan, Plan::Standard);
    }
}
