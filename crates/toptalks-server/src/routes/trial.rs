//! Trial signup routes: `/api/trial/*`
//!
//! Accepts the free-trial form either as a JSON object or as a urlencoded
//! form post and hands it to the intake service.

use std::sync::Arc;

use axum::extract::{FromRequest, Request, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::routing::post;
use axum::{Form, Json, Router};
use serde_json::Value;

use toptalks_core::signup::{Submission, TrialSignupResult};

use crate::error::AppError;
use crate::state::AppState;

/// Build the `/api/trial` router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/submit", post(submit))
}

/// A signup submission decoded from either body encoding.
#[derive(Debug)]
pub struct SignupForm(pub Submission);

impl<S> FromRequest<S> for SignupForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_json(&req) {
            let Json(value) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|e| rejected(e.status(), e.body_text()))?;
            return match value {
                Value::Object(map) => Ok(Self(map)),
                _ => Err(AppError::BadRequest(
                    "request body must be a JSON object".to_owned(),
                )),
            };
        }

        let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
            .await
            .map_err(|e| rejected(e.status(), e.body_text()))?;

        // Repeated keys: the last value wins.
        let map = pairs
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();
        Ok(Self(map))
    }
}

/// Map an extractor rejection onto the server's error body.
fn rejected(status: StatusCode, message: String) -> AppError {
    match status {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(message),
        StatusCode::UNSUPPORTED_MEDIA_TYPE => AppError::UnsupportedMediaType(message),
        _ => AppError::BadRequest(message),
    }
}

fn is_json(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::trim)
        .is_some_and(|mime| {
            mime.eq_ignore_ascii_case("application/json")
                || (mime.starts_with("application/") && mime.ends_with("+json"))
        })
}

// ── Handlers ─────────────────────────────────────────────────────────

/// Validate and record a trial signup.
async fn submit(
    State(state): State<Arc<AppState>>,
    SignupForm(input): SignupForm,
) -> Result<Json<TrialSignupResult>, AppError> {
    let result = state.intake.submit(&input).await?;
    Ok(Json(result))
}
