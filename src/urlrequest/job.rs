use crate::base::neterror::NetError;
use crate::http::rawrequest::RawRequest;
use crate::http::response::{Response, ResponseHead};
use crate::urlrequest::errorhandler::{run_chain, Handling};
use crate::urlrequest::request::Request;

/// Coarse progress of an execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    Built,
    Authorizing,
    Resolving,
    Completed,
}

/// Internal state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    WillSend,
    BuildRaw,
    Authorize,
    DidSend,
    ResolveStub,
    ResolveLive,
    DidReceive,
    Done,
}

impl State {
    fn to_execution_state(self) -> ExecutionState {
        match self {
            State::Idle | State::WillSend | State::BuildRaw => ExecutionState::Built,
            State::Authorize | State::DidSend => ExecutionState::Authorizing,
            State::ResolveStub | State::ResolveLive | State::DidReceive => {
                ExecutionState::Resolving
            }
            State::Done => ExecutionState::Completed,
        }
    }
}

/// One execution of a [`Request`].
///
/// Hook order is fixed: `will_send_request`, raw request construction,
/// authorization, `did_send_request`, stub or transport, error handlers,
/// `did_receive_response`. A raw request that cannot be built ends the job
/// with a configuration error before any response exists.
pub struct RequestJob {
    request: Request,
    state: State,
    raw: Option<RawRequest>,
    response: Option<Response>,
}

impl RequestJob {
    pub fn new(request: Request) -> Self {
        Self {
            request,
            state: State::Idle,
            raw: None,
            response: None,
        }
    }

    pub fn execution_state(&self) -> ExecutionState {
        self.state.to_execution_state()
    }

    /// The raw request as sent, once built.
    pub fn raw_request(&self) -> Option<&RawRequest> {
        self.raw.as_ref()
    }

    pub fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    /// Drive the job to completion.
    pub async fn start(&mut self) -> Result<(), NetError> {
        self.state = State::WillSend;
        tracing::debug!(
            method = %self.request.method(),
            base_url = self.request.base_url(),
            path = self.request.method_path(),
            stubbed = self.request.is_stubbed(),
            "executing request"
        );
        let result = self.do_loop().await;
        if result.is_err() {
            self.state = State::Done;
        }
        result
    }

    /// Drive the job and unwrap its outcome.
    ///
    /// A response still carrying an error after the handler chain becomes
    /// `Err`; anything else, including non-2xx statuses, is `Ok`.
    pub async fn run(mut self) -> Result<Response, NetError> {
        self.start().await?;
        let response = self
            .response
            .take()
            .ok_or_else(|| NetError::Failed("execution produced no response".into()))?;
        match response.error() {
            Some(error) => Err(error.clone()),
            None => Ok(response),
        }
    }

    async fn do_loop(&mut self) -> Result<(), NetError> {
        loop {
            match self.state {
                State::Idle => return Ok(()),
                State::WillSend => {
                    self.request.send_plugins_will_send_request();
                    self.state = State::BuildRaw;
                }
                State::BuildRaw => {
                    let raw = self.request.raw_request().map_err(|e| {
                        tracing::debug!(error = %e, "failed to build raw request");
                        e
                    })?;
                    self.raw = Some(raw);
                    self.state = State::Authorize;
                }
                State::Authorize => {
                    if let Some(authenticator) = self.request.authenticator().cloned() {
                        let raw = self.take_raw()?;
                        self.raw = Some(authenticator.authorize(raw));
                    }
                    self.state = State::DidSend;
                }
                State::DidSend => {
                    self.request.send_plugins_did_send_request(self.raw()?);
                    self.state = if self.request.is_stubbed() {
                        State::ResolveStub
                    } else {
                        State::ResolveLive
                    };
                }
                State::ResolveStub => {
                    self.response = Some(self.resolve_stub().await);
                    self.state = State::DidReceive;
                }
                State::ResolveLive => {
                    let response = self.resolve_live().await?;
                    self.response = Some(response);
                    self.state = State::DidReceive;
                }
                State::DidReceive => {
                    if let Some(response) = self.response.as_ref() {
                        self.request
                            .send_plugins_did_receive_response(response, self.raw()?);
                    }
                    self.state = State::Done;
                }
                State::Done => return Ok(()),
            }
        }
    }

    async fn resolve_stub(&self) -> Response {
        let stub = self.request.stub_data();
        if let Some(delay) = stub.and_then(|s| s.mode.delay()) {
            tokio::time::sleep(delay).await;
        }
        let data = stub.map(|s| s.data.clone());
        tracing::debug!(
            bytes = data.as_ref().map_or(0, |d| d.len()),
            "answered from stub"
        );
        Response::new(self.request.clone(), data, None, None)
    }

    async fn resolve_live(&self) -> Result<Response, NetError> {
        let raw = self.raw()?.clone();
        match self.request.transport().send(raw).await {
            Ok(received) => {
                tracing::debug!(status = %received.status, bytes = received.body.len(), "response received");
                let head = ResponseHead {
                    status: received.status,
                    version: received.version,
                    headers: received.headers,
                };
                Ok(Response::new(
                    self.request.clone(),
                    Some(received.body),
                    Some(head),
                    None,
                ))
            }
            Err(error) => {
                tracing::warn!(error = %error, code = error.as_i32(), "transport failed");
                let response = match run_chain(self.request.error_handlers(), &self.request, error) {
                    Handling::Pass(error) => {
                        Response::new(self.request.clone(), None, None, Some(error))
                    }
                    Handling::Recover(data) => {
                        tracing::debug!("error recovered by handler");
                        Response::new(self.request.clone(), data, None, None)
                    }
                };
                Ok(response)
            }
        }
    }

    fn raw(&self) -> Result<&RawRequest, NetError> {
        self.raw
            .as_ref()
            .ok_or_else(|| NetError::Failed("raw request not built".into()))
    }

    fn take_raw(&mut self) -> Result<RawRequest, NetError> {
        self.raw
            .take()
            .ok_or_else(|| NetError::Failed("raw request not built".into()))
    }
}
