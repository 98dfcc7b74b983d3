//! Webhook payload extraction.
//!
//! Plex posts `multipart/form-data` with a `payload` text field holding JSON
//! and, for some events, a `thumb` JPEG. Only the text field is read; file
//! parts are skipped without being buffered.

use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use serde_json::Value;
use thiserror::Error;

/// Name of the form field carrying the JSON document.
pub const PAYLOAD_FIELD: &str = "payload";

/// JSON pointer to the client identifier inside the payload.
pub const CLIENT_ID_POINTER: &str = "/Player/uuid";

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Error parsing payload: {0}")]
    NotMultipart(String),

    #[error("Error parsing payload: malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Error parsing payload: form field 'payload' is missing")]
    Missing,

    #[error("Error parsing payload '{raw}': {source}")]
    Invalid {
        raw: String,
        source: serde_json::Error,
    },
}

/// A parsed webhook payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload(Value);

impl Payload {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Identifier of the player that sent the event, if present as a string.
    pub fn client_id(&self) -> Option<&str> {
        self.0.pointer(CLIENT_ID_POINTER).and_then(Value::as_str)
    }

    /// Plex event name (`media.play`, `media.stop`, ...). Only used for logging.
    pub fn event(&self) -> Option<&str> {
        self.0.get("event").and_then(Value::as_str)
    }

    /// True for JSON values that carry nothing to relay: `null`, `false`,
    /// `0` and `""`.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Number(n) => n.as_f64() == Some(0.0),
            Value::String(s) => s.is_empty(),
            Value::Array(_) | Value::Object(_) => false,
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

/// Pull the payload out of a multipart request and parse it.
pub async fn extract_payload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Payload, PayloadError> {
    let mut multipart =
        multipart.map_err(|rejection| PayloadError::NotMultipart(rejection.body_text()))?;
    let raw = read_payload_field(&mut multipart).await?;
    parse_payload(raw)
}

/// Return the text of the first non-file `payload` field.
///
/// Parts before it are skipped; `next_field` discards whatever of a
/// skipped part was not read.
async fn read_payload_field(
    multipart: &mut Multipart,
) -> Result<Option<String>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.file_name().is_some() {
            tracing::trace!(field = ?field.name(), "Skipping file part");
            continue;
        }
        if field.name() == Some(PAYLOAD_FIELD) {
            return field.text().await.map(Some);
        }
    }
    Ok(None)
}

/// Parse the raw field content.
pub fn parse_payload(raw: Option<String>) -> Result<Payload, PayloadError> {
    let raw = raw.ok_or(PayloadError::Missing)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Payload(value)),
        Err(source) => Err(PayloadError::Invalid { raw, source }),
    }
}
