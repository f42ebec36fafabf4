use crate::error::CommandError;
use serde::Serialize;
use std::io::{self, Write};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateValueResult {
    pub id: String,
    pub key: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope<'a> {
    error: ErrorPayload<'a>,
}

#[derive(Debug, Serialize)]
struct ErrorPayload<'a> {
    code: &'a str,
    message: String,
}

/// Writes `value` as a single JSON line.
pub fn write_result<T: Serialize>(w: &mut dyn Write, value: &T) -> io::Result<()> {
    serde_json::to_writer(&mut *w, value)?;
    w.write_all(b"\n")?;
    w.flush()
}

pub fn write_error(w: &mut dyn Write, err: &CommandError) {
    let envelope = ErrorEnvelope {
        error: ErrorPayload {
            code: err.code(),
            message: err.to_string(),
        },
    };
    if let Err(e) = write_result(w, &envelope) {
        warn!("failed to write error output: {e}");
    }
}
