//! # sdkit
//!
//! A small factory for composable REST API clients: give it a base URI and
//! headers, derive nested client nodes with [`Client::at`], bind routes per
//! HTTP verb, and call them with a flat parameter bag. Path-template keys
//! are bound into the URL; whatever remains travels as a query string or a
//! JSON body depending on the method.
//!
//! ## Features
//!
//! - **Path templates**: `:name` segments, `(...)` optional groups, and a
//!   `*` catch-all, rendered per call from the parameter bag
//! - **Parameter partitioning**: path-consumed keys never leak into query
//!   or body data
//! - **Hierarchical composition**: `at()` derives child clients that
//!   inherit and extend base URI, headers, and behavior options
//! - **Hooks**: ordered pre-send and post-response transform chains
//! - **Transport seam**: the wire is behind a trait; reqwest by default
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sdkit::{Client, Params};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sdk = Client::builder("https://tests.com/api/v1/")
//!         .header("accept", "application/json")
//!         .header("authorization", "Basic dXNlcjpwYXNz")
//!         .build();
//!
//!     // bind once, call many times
//!     let get_item = sdk.at("service/").get(":uuid/");
//!
//!     let reply = get_item
//!         .call(Params::new().with("uuid", "qwerty").with("count", 25))
//!         .await?;
//!
//!     // uuid went into the path, count went into the query string
//!     println!("status: {:?}", reply.status());
//!     println!("payload: {}", reply.body());
//!     Ok(())
//! }
//! ```
//!
//! ## Nested clients
//!
//! ```rust,no_run
//! use sdkit::{Client, Headers, OptionsPatch};
//!
//! let sdk = Client::new("https://tests.com/api/v1/");
//! let service = sdk.at("service/");
//! let item = service.at_with(
//!     "item/",
//!     Headers::new().with("cache-control", "no-cache"),
//!     OptionsPatch::new().raw_body(true),
//! );
//! // item inherits the base URI and headers; raw_body applies from here down
//! let get_meta = item.get("meta/");
//! ```

mod client;
mod error;
mod executor;
mod headers;
mod options;
mod params;
mod response;
mod template;
mod transport;

pub use client::{Client, ClientBuilder, Route};
pub use error::{Result, SdkError};
pub use headers::Headers;
pub use options::{CallOptions, OptionsPatch, PendingRequest, PostResponseFn, PreSendFn};
pub use params::{ParamValue, Params};
pub use response::{Reply, Response};
pub use template::{PathTemplate, Rendered, TemplateOptions};
pub use transport::{ReqwestTransport, Transport, TransportCall};

// Re-export common types
pub use http::{Method, StatusCode};
pub use url::Url;

/// Prelude for common imports.
///
/// ```
/// use sdkit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::{Client, ClientBuilder, Route};
    pub use crate::error::{Result, SdkError};
    pub use crate::headers::Headers;
    pub use crate::options::{CallOptions, OptionsPatch, PendingRequest};
    pub use crate::params::{ParamValue, Params};
    pub use crate::response::{Reply, Response};
    pub use crate::template::{PathTemplate, TemplateOptions};
    pub use crate::transport::{ReqwestTransport, Transport, TransportCall};
    pub use http::{Method, StatusCode};
}
