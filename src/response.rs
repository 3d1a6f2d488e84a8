//! Response envelope and call outcome.

use http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Result, SdkError};
use crate::headers::Headers;

/// A completed HTTP response as plain data.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: Headers,
    /// Decoded body: JSON when the payload parses as such, a string
    /// otherwise, `Null` when empty.
    pub body: Value,
}

impl Response {
    /// Create a response envelope.
    pub fn new(status: StatusCode, headers: Headers, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Get a specific header value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Deserialize the body into a concrete type.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.body.clone()).map_err(|e| SdkError::Json(e.to_string()))
    }
}

/// The resolved value of one call.
///
/// Routes resolve to the full [`Response`] envelope unless the client was
/// configured with `raw_body`, in which case a successful call resolves to
/// the decoded payload alone. Failure paths always keep the envelope (the
/// raw-body unwrap applies to successes only).
#[derive(Debug, Clone)]
pub enum Reply {
    /// The full response envelope.
    Envelope(Response),
    /// Just the decoded body, per the `raw_body` option.
    Raw(Value),
}

impl Reply {
    /// The status code, absent for raw-body replies.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Envelope(response) => Some(response.status),
            Self::Raw(_) => None,
        }
    }

    /// Borrow the decoded body.
    pub fn body(&self) -> &Value {
        match self {
            Self::Envelope(response) => &response.body,
            Self::Raw(body) => body,
        }
    }

    /// Take the decoded body.
    pub fn into_body(self) -> Value {
        match self {
            Self::Envelope(response) => response.body,
            Self::Raw(body) => body,
        }
    }

    /// Deserialize the body into a concrete type.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.body().clone()).map_err(|e| SdkError::Json(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reply_accessors() {
        let envelope = Reply::Envelope(Response::new(
            StatusCode::OK,
            Headers::new(),
            json!({"payload": "OK"}),
        ));
        assert_eq!(envelope.status(), Some(StatusCode::OK));
        assert_eq!(envelope.body()["payload"], "OK");

        let raw = Reply::Raw(json!({"payload": "OK"}));
        assert_eq!(raw.status(), None);
        assert_eq!(raw.into_body()["payload"], "OK");
    }

    #[test]
    fn json_deserializes_the_body() {
        #[derive(serde::Deserialize)]
        struct Payload {
            name: String,
        }
        let response = Response::new(StatusCode::OK, Headers::new(), json!({"name": "test"}));
        let payload: Payload = response.json().unwrap();
        assert_eq!(payload.name, "test");
    }
}
