//! Purpose: Structured schema for non-fatal stderr notices (per-file batch failures).
//! Exports: `Notice`, `notice_json`, `skip_notice`.
//! Role: Shared contract helper for CLI diagnostics that do not end the run.
//! Invariants: Notices never alter stdout payloads.
//! Invariants: JSON schema is additive-only; `details.kind` names the error kind.
use serde_json::{Map, Value, json};

use crate::batch::BatchFailure;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: String,
    pub time: String,
    pub cmd: String,
    pub path: String,
    pub message: String,
    pub details: Map<String, Value>,
}

pub fn notice_json(notice: &Notice) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(notice.kind));
    inner.insert("time".to_string(), json!(notice.time));
    inner.insert("cmd".to_string(), json!(notice.cmd));
    inner.insert("path".to_string(), json!(notice.path));
    inner.insert("message".to_string(), json!(notice.message));
    inner.insert("details".to_string(), Value::Object(notice.details.clone()));

    let mut outer = Map::new();
    outer.insert("notice".to_string(), Value::Object(inner));
    Value::Object(outer)
}

/// Notice for a file the batch runner skipped.
pub fn skip_notice(failure: &BatchFailure, cmd: &str, time: String) -> Notice {
    let mut details = Map::new();
    details.insert(
        "kind".to_string(),
        json!(format!("{:?}", failure.error.kind())),
    );
    if let Some(hint) = failure.error.hint() {
        details.insert("hint".to_string(), json!(hint));
    }
    Notice {
        kind: "skip".to_string(),
        time,
        cmd: cmd.to_string(),
        path: failure.input.display().to_string(),
        message: failure
            .error
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| failure.error.to_string()),
        details,
    }
}
