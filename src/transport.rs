//! Transport seam over the actual HTTP collaborator.
//!
//! Sockets, TLS, and wire-format concerns all live behind [`Transport`];
//! the rest of the crate only decides what to send. The default
//! implementation is [`ReqwestTransport`]; tests substitute an in-process
//! fake.

use async_trait::async_trait;
use http::Method;
use serde_json::Value;
use url::Url;

use crate::error::Result;
use crate::headers::Headers;
use crate::response::Response;

/// One fully resolved outgoing call.
#[derive(Debug, Clone)]
pub struct TransportCall {
    pub method: Method,
    /// Absolute URL with the path already rendered.
    pub url: Url,
    /// Headers to set unconditionally, overwriting any transport default.
    pub headers: Headers,
    /// Query pairs to append to whatever query the URL already carries.
    pub query: Vec<(String, String)>,
    /// JSON body, when the method sends one.
    pub body: Option<Value>,
}

/// The external HTTP collaborator.
///
/// Contract: resolves `Ok` for any call the server actually answered,
/// whatever the status; `Err` only when no response was produced (connect
/// failure, protocol error). Exactly one completion per dispatch.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn dispatch(&self, call: TransportCall) -> Result<Response>;
}

/// Default transport over a pooled [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with its own connection pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing client to share its pool and defaults.
    pub fn from_client(inner: reqwest::Client) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn dispatch(&self, call: TransportCall) -> Result<Response> {
        let mut url = call.url;
        if !call.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &call.query {
                pairs.append_pair(key, value);
            }
        }

        let mut builder = self.inner.request(call.method, url);
        if let Some(body) = &call.body {
            builder = builder.json(body);
        }
        let mut request = builder.build()?;

        // resolved headers win over anything the transport would set itself
        for (name, value) in call.headers.iter() {
            if let (Ok(name), Ok(value)) = (
                http::HeaderName::try_from(name),
                http::HeaderValue::try_from(value),
            ) {
                request.headers_mut().insert(name, value);
            }
        }

        let response = self.inner.execute(request).await?;
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let bytes = response.bytes().await?;

        Ok(Response::new(status, headers, decode_body(&bytes)))
    }
}

/// Decode a reply body: JSON when it parses, text otherwise, `Null` when
/// empty.
fn decode_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_body_handles_all_shapes() {
        assert_eq!(decode_body(b""), Value::Null);
        assert_eq!(decode_body(b"{\"ok\":true}")["ok"], true);
        assert_eq!(decode_body(b"plain text"), Value::String("plain text".to_string()));
    }
}
