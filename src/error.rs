//! Typed failures for the remote API boundary.
//!
//! Every operation against the quiz backend resolves to one of these
//! variants. The cache layer does not branch on the variant: any failure is
//! recorded in the entry's `last_error` and left for the caller to render.

use serde::Deserialize;

/// Failure of a remote API operation.
///
/// The type is `Clone` so a single in-flight outcome can be handed to every
/// de-duplicated waiter, and `PartialEq` so tests can compare outcomes
/// directly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
  /// No response reached us (DNS, connect, timeout, broken transport).
  #[error("network error: {0}")]
  Network(String),

  /// The server rejected the request (4xx other than 404). `fields` carries
  /// per-field messages when the backend returns an array.
  #[error("{message}")]
  Validation {
    message: String,
    fields: Vec<String>,
  },

  /// 404 for the requested resource.
  #[error("{message}")]
  NotFound { message: String },

  /// 5xx from the backend.
  #[error("server error ({status}): {message}")]
  Server { status: u16, message: String },

  /// The response body did not match the documented wire shape.
  #[error("unexpected response shape: {0}")]
  Decode(String),
}

impl ApiError {
  /// Build the error for a non-success HTTP status and its raw body.
  ///
  /// Failure bodies carry a `message` field, either a string or an array of
  /// field-level messages; it is surfaced verbatim. Bodies that are not
  /// JSON, or JSON without `message`, fall back to a generic description.
  pub fn from_status(status: u16, body: &str) -> Self {
    let (message, fields) = parse_failure_body(body);

    match status {
      404 => ApiError::NotFound {
        message: message.unwrap_or_else(|| "resource not found".to_string()),
      },
      400..=499 => ApiError::Validation {
        message: message.unwrap_or_else(|| format!("request rejected with status {}", status)),
        fields,
      },
      _ => ApiError::Server {
        status,
        message: message.unwrap_or_else(|| "internal server error".to_string()),
      },
    }
  }
}

impl From<reqwest::Error> for ApiError {
  fn from(err: reqwest::Error) -> Self {
    if err.is_decode() {
      ApiError::Decode(err.to_string())
    } else {
      ApiError::Network(err.to_string())
    }
  }
}

/// Shape of the backend's failure payloads.
#[derive(Debug, Deserialize)]
struct FailureBody {
  message: MessageField,
}

/// The `message` field is a plain string for most failures and an array of
/// field messages for validation failures.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MessageField {
  One(String),
  Many(Vec<String>),
}

fn parse_failure_body(body: &str) -> (Option<String>, Vec<String>) {
  match serde_json::from_str::<FailureBody>(body) {
    Ok(parsed) => match parsed.message {
      MessageField::One(message) => (Some(message), Vec::new()),
      MessageField::Many(fields) => (Some(fields.join("; ")), fields),
    },
    Err(_) => (None, Vec::new()),
  }
}
