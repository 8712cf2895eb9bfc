//! Append-only JSON-lines log of accepted signups.
//!
//! Each line holds one [`SignupEvent`] plus a `recorded_at` UTC timestamp.
//! The log file is opened when the recorder is built, so an unusable path is
//! reported at startup instead of on the first signup.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::Mutex;

use crate::error::RecordError;
use crate::record::SignupRecorder;
use crate::signup::SignupEvent;

#[derive(Serialize)]
struct Entry<'a> {
    recorded_at: String,
    #[serde(flatten)]
    event: &'a SignupEvent,
}

/// Encode one log line, newline included.
fn encode_line(event: &SignupEvent, at: DateTime<Utc>) -> Result<Vec<u8>, RecordError> {
    let entry = Entry {
        recorded_at: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        event,
    };
    let mut line = serde_json::to_vec(&entry).map_err(|e| RecordError::Serialization {
        reason: e.to_string(),
    })?;
    line.push(b'\n');
    Ok(line)
}

/// Recorder appending accepted signups to a JSON-lines file.
#[derive(Debug)]
pub struct SignupLog {
    path: PathBuf,
    sink: Mutex<BufWriter<File>>,
}

impl SignupLog {
    /// Open `path` for appending, creating the file if it does not exist.
    /// Existing lines are never touched.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Open`] if the file cannot be opened for writing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RecordError> {
        let path = path.into();
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| RecordError::Open {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            path,
            sink: Mutex::new(BufWriter::new(File::from_std(file))),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl SignupRecorder for SignupLog {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "signup_log"
    }

    async fn record(&self, event: &SignupEvent) -> Result<(), RecordError> {
        let line = encode_line(event, Utc::now())?;

        // One lock per line keeps concurrent signups from interleaving.
        let mut sink = self.sink.lock().await;
        let written = match sink.write_all(&line).await {
            Ok(()) => sink.flush().await,
            Err(e) => Err(e),
        };
        written.map_err(|e| RecordError::BackendFailure {
            name: self.name().to_owned(),
            reason: format!("append to {} failed: {e}", self.path.display()),
        })
    }
}
