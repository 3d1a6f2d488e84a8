//! The per-call request pipeline.
//!
//! One invocation flows through here: pre-send hooks, path templating,
//! parameter partitioning, the method's data policy, transport dispatch,
//! and post-response hooks.

use http::Method;
use tracing::{debug, trace};
use url::Url;

use crate::error::{Result, SdkError};
use crate::headers::Headers;
use crate::options::{CallOptions, PendingRequest};
use crate::params::Params;
use crate::response::Reply;
use crate::template::PathTemplate;
use crate::transport::{Transport, TransportCall};

/// Resolve and execute one call.
pub(crate) async fn execute(
    transport: &dyn Transport,
    method: Method,
    url_template: &str,
    headers: Headers,
    params: Params,
    options: &CallOptions,
) -> Result<Reply> {
    let pending = options.apply_pre_send(PendingRequest {
        path: url_template.to_string(),
        params,
        headers,
    });

    // Only the path component is subject to template rules; scheme, host,
    // and any query the base URI carries pass through untouched.
    let mut url = Url::parse(&pending.path)
        .map_err(|e| SdkError::InvalidUrl(format!("{}: {e}", pending.path)))?;
    let template = PathTemplate::parse(url.path(), &options.template)?;
    let rendered = template.render(&pending.params)?;
    url.set_path(&rendered.path);

    let remaining = pending.params.without(&rendered.consumed);

    let (query, body) = match method.as_str() {
        // DELETE: the leftover is computed but intentionally dropped.
        "DELETE" => {
            if !remaining.is_empty() {
                trace!(dropped = remaining.len(), "dropping non-path parameters on DELETE");
            }
            (Vec::new(), None)
        }
        "GET" => (remaining.to_query_pairs(), None),
        _ => {
            let body = if remaining.is_empty() {
                None
            } else {
                Some(remaining.to_json())
            };
            (Vec::new(), body)
        }
    };

    debug!(method = %method, url = %url, "dispatching request");

    let response = transport
        .dispatch(TransportCall {
            method,
            url,
            headers: pending.headers,
            query,
            body,
        })
        .await?;

    let status = response.status;
    if response.is_success() {
        debug!(status = %status, "request succeeded");
        let response = options.apply_post_response(response, true);
        if options.raw_body {
            Ok(Reply::Raw(response.body))
        } else {
            Ok(Reply::Envelope(response))
        }
    } else {
        debug!(status = %status, "request failed");
        let response = options.apply_post_response(response, false);
        Err(SdkError::Remote {
            status: status.as_u16(),
            response,
        })
    }
}
