//! Lifecycle observers.

use crate::http::rawrequest::RawRequest;
use crate::http::response::Response;
use crate::urlrequest::request::Request;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Observer invoked at fixed points of every execution.
///
/// Hooks run synchronously on the executing thread, in the order the plugins
/// were registered. A panicking hook is logged and skipped; it never fails
/// the execution or prevents later plugins from running.
pub trait Plugin: Send + Sync {
    /// Before the raw request is built or a stub is consulted.
    fn will_send_request(&self, _request: &Request) {}

    /// After headers, body and credentials were applied to the raw request.
    fn did_send_request(&self, _request: &Request, _raw: &RawRequest) {}

    /// After a response (live, stubbed, or failed) exists.
    fn did_receive_response(&self, _response: &Response, _raw: &RawRequest) {}
}

impl<P: Plugin + ?Sized> Plugin for Arc<P> {
    fn will_send_request(&self, request: &Request) {
        (**self).will_send_request(request)
    }

    fn did_send_request(&self, request: &Request, raw: &RawRequest) {
        (**self).did_send_request(request, raw)
    }

    fn did_receive_response(&self, response: &Response, raw: &RawRequest) {
        (**self).did_receive_response(response, raw)
    }
}

/// Call `hook` on every plugin, isolating panics.
pub(crate) fn dispatch<F>(plugins: &[Arc<dyn Plugin>], hook: &'static str, f: F)
where
    F: Fn(&dyn Plugin),
{
    for (index, plugin) in plugins.iter().enumerate() {
        if catch_unwind(AssertUnwindSafe(|| f(plugin.as_ref()))).is_err() {
            tracing::warn!(hook, plugin = index, "plugin hook panicked; continuing");
        }
    }
}
