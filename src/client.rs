//! Composable client nodes and bound routes.

use std::sync::Arc;

use http::Method;

use crate::error::Result;
use crate::executor::execute;
use crate::headers::Headers;
use crate::options::{CallOptions, OptionsPatch, PendingRequest};
use crate::params::Params;
use crate::response::{Reply, Response};
use crate::template::TemplateOptions;
use crate::transport::{ReqwestTransport, Transport};

/// A composable REST client node.
///
/// A node is an immutable value holding a base URI, a header set, and the
/// resolved behavior options. [`at`](Self::at) derives children that
/// inherit and extend all three; sibling nodes can never contaminate each
/// other because every derivation copies.
///
/// # Example
///
/// ```rust,no_run
/// use sdkit::Client;
///
/// # async fn demo() -> sdkit::Result<()> {
/// let sdk = Client::builder("https://tests.com/api/v1/")
///     .header("accept", "application/json")
///     .build();
///
/// let item = sdk.at("service/").at("item/");
/// let get_meta = item.get("meta/");
///
/// let reply = get_meta.send().await?;
/// println!("{:?}", reply.status());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    base_uri: String,
    headers: Headers,
    options: CallOptions,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Create a client with default options over the reqwest transport.
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self::builder(base_uri).build()
    }

    /// Create a configuration builder.
    pub fn builder(base_uri: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            base_uri: base_uri.into(),
            headers: Headers::new(),
            patch: OptionsPatch::new(),
            transport: None,
        }
    }

    /// The absolute URI this node is rooted at.
    pub fn url(&self) -> &str {
        &self.base_uri
    }

    /// The node's resolved header set.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Derive a child node rooted at `base_uri + subpath`.
    pub fn at(&self, subpath: &str) -> Client {
        self.at_with(subpath, Headers::new(), OptionsPatch::new())
    }

    /// Derive a child node with extra headers and an options patch.
    ///
    /// Headers shallow-merge with the child winning on collision; hook
    /// chains append; `raw_body` and template configuration override when
    /// the patch supplies them.
    pub fn at_with(&self, subpath: &str, headers: Headers, patch: OptionsPatch) -> Client {
        Client {
            base_uri: format!("{}{}", self.base_uri, subpath),
            headers: self.headers.merge(&headers),
            options: self.options.resolve(&patch),
            transport: Arc::clone(&self.transport),
        }
    }

    /// Bind a GET route.
    pub fn get(&self, subpath: &str) -> Route {
        self.route(Method::GET, subpath)
    }

    /// Bind a POST route.
    pub fn post(&self, subpath: &str) -> Route {
        self.route(Method::POST, subpath)
    }

    /// Bind a PUT route.
    pub fn put(&self, subpath: &str) -> Route {
        self.route(Method::PUT, subpath)
    }

    /// Bind a PATCH route.
    pub fn patch(&self, subpath: &str) -> Route {
        self.route(Method::PATCH, subpath)
    }

    /// Bind a DELETE route.
    pub fn delete(&self, subpath: &str) -> Route {
        self.route(Method::DELETE, subpath)
    }

    /// Bind a route with an arbitrary method.
    pub fn route(&self, method: Method, subpath: &str) -> Route {
        Route {
            method,
            template: format!("{}{}", self.base_uri, subpath),
            headers: self.headers.clone(),
            options: self.options.clone(),
            transport: Arc::clone(&self.transport),
        }
    }
}

/// A bound endpoint: method plus fully joined URL template.
///
/// Building a route is cheap and does no I/O; the same route can be called
/// any number of times with different parameter bags.
#[derive(Clone)]
pub struct Route {
    method: Method,
    template: String,
    headers: Headers,
    options: CallOptions,
    transport: Arc<dyn Transport>,
}

impl Route {
    /// The route's URL template.
    pub fn url(&self) -> &str {
        &self.template
    }

    /// Add one per-route header, overriding the client's on collision.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Merge a set of per-route headers over the client's.
    pub fn headers(mut self, extra: Headers) -> Self {
        self.headers = self.headers.merge(&extra);
        self
    }

    /// Execute the route with a parameter bag.
    ///
    /// Path-consumed keys are stripped from the bag; the remainder travels
    /// as a query string (GET), a JSON body (POST/PUT/PATCH), or not at
    /// all (DELETE).
    pub async fn call(&self, params: Params) -> Result<Reply> {
        execute(
            self.transport.as_ref(),
            self.method.clone(),
            &self.template,
            self.headers.clone(),
            params,
            &self.options,
        )
        .await
    }

    /// Execute the route with an empty bag.
    pub async fn send(&self) -> Result<Reply> {
        self.call(Params::new()).await
    }
}

/// Builder for the top-level client node.
pub struct ClientBuilder {
    base_uri: String,
    headers: Headers,
    patch: OptionsPatch,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    /// Add a base header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Merge a set of base headers.
    pub fn headers(mut self, headers: Headers) -> Self {
        self.headers = self.headers.merge(&headers);
        self
    }

    /// Resolve successful calls to the decoded payload instead of the
    /// response envelope.
    pub fn raw_body(mut self, raw_body: bool) -> Self {
        self.patch = self.patch.raw_body(raw_body);
        self
    }

    /// Set the template parse configuration.
    pub fn template(mut self, template: TemplateOptions) -> Self {
        self.patch = self.patch.template(template);
        self
    }

    /// Register a pre-send transform.
    pub fn pre_send<F>(mut self, hook: F) -> Self
    where
        F: Fn(PendingRequest) -> PendingRequest + Send + Sync + 'static,
    {
        self.patch = self.patch.pre_send(hook);
        self
    }

    /// Register a post-response transform.
    pub fn post_response<F>(mut self, hook: F) -> Self
    where
        F: Fn(Response, bool) -> Response + Send + Sync + 'static,
    {
        self.patch = self.patch.post_response(hook);
        self
    }

    /// Substitute the transport; defaults to [`ReqwestTransport`].
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the root client node.
    pub fn build(self) -> Client {
        Client {
            base_uri: self.base_uri,
            headers: self.headers,
            options: CallOptions::default().resolve(&self.patch),
            transport: self
                .transport
                .unwrap_or_else(|| Arc::new(ReqwestTransport::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT_URI: &str = "https://tests.com/api/v1/";

    #[test]
    fn at_composes_recursively() {
        let sdk = Client::new(ROOT_URI);
        let root = sdk.at("service/");
        let leaf1 = root.at("list/");
        let leaf2 = leaf1.at("item/");
        let leaf3 = leaf2.at("uuid/");
        let leaf3b = leaf2.at("other/");

        assert_eq!(root.url(), "https://tests.com/api/v1/service/");
        assert_eq!(leaf1.url(), "https://tests.com/api/v1/service/list/");
        assert_eq!(leaf2.url(), "https://tests.com/api/v1/service/list/item/");
        assert_eq!(leaf3.url(), "https://tests.com/api/v1/service/list/item/uuid/");
        assert_eq!(leaf3b.url(), "https://tests.com/api/v1/service/list/item/other/");
    }

    #[test]
    fn at_composition_matches_a_single_joined_call() {
        let sdk = Client::builder(ROOT_URI).header("a", "1").build();

        let stepped = sdk
            .at_with("p1/", Headers::new().with("b", "2"), OptionsPatch::new())
            .at_with("p2/", Headers::new().with("a", "3"), OptionsPatch::new());
        let joined = sdk.at_with(
            "p1/p2/",
            Headers::new().with("b", "2").with("a", "3"),
            OptionsPatch::new(),
        );

        assert_eq!(stepped.url(), joined.url());
        assert_eq!(stepped.headers(), joined.headers());
    }

    #[test]
    fn sibling_nodes_are_isolated() {
        let root = Client::new(ROOT_URI).at("service/");
        let a = root.at_with("a/", Headers::new().with("x-branch", "a"), OptionsPatch::new());
        let b = root.at_with("b/", Headers::new().with("x-branch", "b"), OptionsPatch::new());

        assert_eq!(a.headers().get("x-branch"), Some("a"));
        assert_eq!(b.headers().get("x-branch"), Some("b"));
        assert_eq!(root.headers().get("x-branch"), None);
    }

    #[test]
    fn routes_join_base_and_subpath() {
        let sdk = Client::new(ROOT_URI);
        let route = sdk.at("service/").at("item/").get("meta/");
        assert_eq!(route.url(), "https://tests.com/api/v1/service/item/meta/");
    }

    #[test]
    fn route_headers_override_client_headers() {
        let sdk = Client::builder(ROOT_URI)
            .header("accept-language", "da")
            .build();
        let route = sdk.get("service/").header("accept-language", "en, es");
        assert_eq!(route.headers.get("accept-language"), Some("en, es"));
        // the client is untouched
        assert_eq!(sdk.headers().get("accept-language"), Some("da"));
    }
}
