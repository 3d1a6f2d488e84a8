//! Behavior options and their inheritance rules.
//!
//! Every client node carries a resolved [`CallOptions`]. Deriving a child
//! node merges a [`OptionsPatch`] over the parent's options: hook chains
//! compose by appending (parent entries first, then the child's), while
//! `raw_body` and the template configuration are overridden outright when
//! the patch supplies them.

use std::fmt;
use std::sync::Arc;

use crate::headers::Headers;
use crate::params::Params;
use crate::response::Response;
use crate::template::TemplateOptions;

/// The request data a pre-send hook can inspect and rewrite.
///
/// Hooks run before template resolution, so rewriting `params` here can
/// still change which values bind into the path.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    /// The absolute URL template (base URI plus route path).
    pub path: String,
    /// The full parameter bag, not yet partitioned.
    pub params: Params,
    /// The merged header set.
    pub headers: Headers,
}

/// A pre-send transform.
pub type PreSendFn = Arc<dyn Fn(PendingRequest) -> PendingRequest + Send + Sync>;

/// A post-response transform. The flag is `true` on 2xx and `false` when
/// the server responded with an error status; transport-level failures
/// never reach these hooks.
pub type PostResponseFn = Arc<dyn Fn(Response, bool) -> Response + Send + Sync>;

/// Resolved behavior options for a client node.
#[derive(Clone, Default)]
pub struct CallOptions {
    /// Resolve successful calls to the decoded payload instead of the
    /// response envelope.
    pub raw_body: bool,
    /// Template parse configuration, passed through to the engine.
    pub template: TemplateOptions,
    pre_send: Vec<PreSendFn>,
    post_response: Vec<PostResponseFn>,
}

impl CallOptions {
    /// Merge a child patch over these options.
    ///
    /// Hook chains run in registration order, parents before children; a
    /// test pins that direction. `raw_body` and `template` take the patch's
    /// value when present.
    pub fn resolve(&self, patch: &OptionsPatch) -> CallOptions {
        CallOptions {
            raw_body: patch.raw_body.unwrap_or(self.raw_body),
            template: patch
                .template
                .clone()
                .unwrap_or_else(|| self.template.clone()),
            pre_send: self
                .pre_send
                .iter()
                .cloned()
                .chain(patch.pre_send.iter().cloned())
                .collect(),
            post_response: self
                .post_response
                .iter()
                .cloned()
                .chain(patch.post_response.iter().cloned())
                .collect(),
        }
    }

    pub(crate) fn apply_pre_send(&self, pending: PendingRequest) -> PendingRequest {
        self.pre_send
            .iter()
            .fold(pending, |pending, hook| hook(pending))
    }

    pub(crate) fn apply_post_response(&self, response: Response, succeeded: bool) -> Response {
        self.post_response
            .iter()
            .fold(response, |response, hook| hook(response, succeeded))
    }
}

impl fmt::Debug for CallOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallOptions")
            .field("raw_body", &self.raw_body)
            .field("template", &self.template)
            .field("pre_send", &self.pre_send.len())
            .field("post_response", &self.post_response.len())
            .finish()
    }
}

/// The child-side options supplied when deriving a client node.
///
/// Unset fields inherit from the parent; hook vectors always append.
#[derive(Clone, Default)]
pub struct OptionsPatch {
    raw_body: Option<bool>,
    template: Option<TemplateOptions>,
    pre_send: Vec<PreSendFn>,
    post_response: Vec<PostResponseFn>,
}

impl OptionsPatch {
    /// Create an empty patch (pure inheritance).
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the raw-body flag.
    pub fn raw_body(mut self, raw_body: bool) -> Self {
        self.raw_body = Some(raw_body);
        self
    }

    /// Override the template parse configuration.
    pub fn template(mut self, template: TemplateOptions) -> Self {
        self.template = Some(template);
        self
    }

    /// Append a pre-send transform.
    pub fn pre_send<F>(mut self, hook: F) -> Self
    where
        F: Fn(PendingRequest) -> PendingRequest + Send + Sync + 'static,
    {
        self.pre_send.push(Arc::new(hook));
        self
    }

    /// Append a post-response transform.
    pub fn post_response<F>(mut self, hook: F) -> Self
    where
        F: Fn(Response, bool) -> Response + Send + Sync + 'static,
    {
        self.post_response.push(Arc::new(hook));
        self
    }
}

impl fmt::Debug for OptionsPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionsPatch")
            .field("raw_body", &self.raw_body)
            .field("template", &self.template)
            .field("pre_send", &self.pre_send.len())
            .field("post_response", &self.post_response.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn trace_hook(log: &Arc<Mutex<Vec<&'static str>>>, label: &'static str) -> OptionsPatch {
        let log = Arc::clone(log);
        OptionsPatch::new().pre_send(move |pending| {
            log.lock().unwrap().push(label);
            pending
        })
    }

    #[test]
    fn pre_send_chain_runs_parent_then_child() {
        let log = Arc::new(Mutex::new(Vec::new()));

        let parent = CallOptions::default().resolve(&trace_hook(&log, "parent"));
        let child = parent.resolve(&trace_hook(&log, "child"));
        let grandchild = child.resolve(&trace_hook(&log, "grandchild"));

        grandchild.apply_pre_send(PendingRequest {
            path: String::new(),
            params: Params::new(),
            headers: Headers::new(),
        });
        assert_eq!(*log.lock().unwrap(), vec!["parent", "child", "grandchild"]);
    }

    #[test]
    fn post_response_chain_appends_in_order() {
        let parent = CallOptions::default().resolve(
            &OptionsPatch::new().post_response(|mut response, _| {
                response.headers.set("x-seen-by", "parent");
                response
            }),
        );
        let child = parent.resolve(&OptionsPatch::new().post_response(|mut response, _| {
            // child runs second, so it observes and overrides the parent
            response.headers.set("x-seen-by", "child");
            response
        }));

        let response = child.apply_post_response(
            Response::new(
                http::StatusCode::OK,
                Headers::new(),
                serde_json::Value::Null,
            ),
            true,
        );
        assert_eq!(response.header("x-seen-by"), Some("child"));
    }

    #[test]
    fn raw_body_and_template_are_overridden_outright() {
        let parent = CallOptions::default().resolve(&OptionsPatch::new().raw_body(true));
        assert!(parent.raw_body);

        // untouched fields inherit
        let child = parent.resolve(&OptionsPatch::new());
        assert!(child.raw_body);

        // explicit patch wins
        let child = parent.resolve(&OptionsPatch::new().raw_body(false));
        assert!(!child.raw_body);

        let custom = TemplateOptions {
            wildcard_key: "rest".to_string(),
        };
        let child = parent.resolve(&OptionsPatch::new().template(custom.clone()));
        assert_eq!(child.template, custom);
    }

    #[test]
    fn pre_send_can_rewrite_the_bag() {
        let options = CallOptions::default().resolve(&OptionsPatch::new().pre_send(|mut pending| {
            pending.params.set("injected", true);
            pending
        }));

        let pending = options.apply_pre_send(PendingRequest {
            path: "https://example.com/".to_string(),
            params: Params::new(),
            headers: Headers::new(),
        });
        assert!(pending.params.contains("injected"));
    }
}
