//! Interception of transport failures.

use crate::base::neterror::NetError;
use crate::urlrequest::request::Request;
use bytes::Bytes;
use std::sync::Arc;

/// What an [`ErrorHandler`] decided to do with an error.
#[derive(Debug, Clone)]
pub enum Handling {
    /// Hand this (possibly rewritten) error to the next handler.
    Pass(NetError),
    /// Stop propagation and succeed with a degraded response carrying `data`.
    Recover(Option<Bytes>),
}

/// Transforms or suppresses errors before they reach the caller.
///
/// Handlers run in registration order. Each sees the error produced by the
/// previous handler; the first `Recover` ends the chain.
pub trait ErrorHandler: Send + Sync {
    /// Whether this handler wants to see `error`. Defaults to every error.
    fn can_handle(&self, _error: &NetError) -> bool {
        true
    }

    fn handle(&self, request: &Request, error: NetError) -> Handling;
}

impl<H: ErrorHandler + ?Sized> ErrorHandler for Arc<H> {
    fn can_handle(&self, error: &NetError) -> bool {
        (**self).can_handle(error)
    }

    fn handle(&self, request: &Request, error: NetError) -> Handling {
        (**self).handle(request, error)
    }
}

/// Closure adapter for one-off handlers.
pub struct FnErrorHandler<F> {
    handler: F,
}

impl<F> FnErrorHandler<F>
where
    F: Fn(&Request, NetError) -> Handling + Send + Sync,
{
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

impl<F> ErrorHandler for FnErrorHandler<F>
where
    F: Fn(&Request, NetError) -> Handling + Send + Sync,
{
    fn handle(&self, request: &Request, error: NetError) -> Handling {
        (self.handler)(request, error)
    }
}

/// Run `error` through `handlers` in order.
pub(crate) fn run_chain(
    handlers: &[Arc<dyn ErrorHandler>],
    request: &Request,
    mut error: NetError,
) -> Handling {
    for handler in handlers {
        if !handler.can_handle(&error) {
            continue;
        }
        match handler.handle(request, error) {
            Handling::Pass(next) => error = next,
            recovered @ Handling::Recover(_) => return recovered,
        }
    }
    Handling::Pass(error)
}
