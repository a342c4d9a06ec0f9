//! The declarative request builder.

use crate::base::neterror::NetError;
use crate::http::contenttype::ContentType;
use crate::http::multipart::{Form, Part};
use crate::http::orderedmap::{Headers, OrderedMap, PathParameters, QueryParameters};
use crate::http::parameter::IntoParameter;
use crate::http::rawrequest::{parse_header, RawRequest};
use crate::http::requestbody::RequestBody;
use crate::http::response::Response;
use crate::socket::transport::{default_transport, Transport};
use crate::urlrequest::auth::Authenticator;
use crate::urlrequest::errorhandler::ErrorHandler;
use crate::urlrequest::job::RequestJob;
use crate::urlrequest::plugin::{dispatch, Plugin};
use crate::urlrequest::stub::{StubDescriptor, StubMode};
use bytes::Bytes;
use http::Method;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// An HTTP request under construction.
///
/// Builder methods consume the request and return it, so every chain owns
/// its own copy of the parameter and header maps. Capabilities (plugins,
/// authenticator, error handlers, transport) are shared through `Arc`.
///
/// ```rust,ignore
/// let response = Request::new(Method::GET, "https://api.example.com")
///     .with_method_path("/users/{id}")
///     .path("id", 42)
///     .query("fields", "name")
///     .header("Api-Version", 5)
///     .execute()?;
/// ```
#[derive(Clone)]
pub struct Request {
    method: Method,
    base_url: String,
    method_path: String,
    query_parameters: QueryParameters,
    path_parameters: PathParameters,
    headers: Headers,
    body: RequestBody,
    authenticator: Option<Arc<dyn Authenticator>>,
    stub_data: Option<StubDescriptor>,
    error_handlers: Vec<Arc<dyn ErrorHandler>>,
    plugins: Vec<Arc<dyn Plugin>>,
    transport: Arc<dyn Transport>,
}

impl Request {
    pub fn new(method: Method, base_url: impl Into<String>) -> Self {
        Self {
            method,
            base_url: base_url.into(),
            method_path: String::new(),
            query_parameters: QueryParameters::new(),
            path_parameters: PathParameters::new(),
            headers: Headers::new(),
            body: RequestBody::Empty,
            authenticator: None,
            stub_data: None,
            error_handlers: Vec::new(),
            plugins: Vec::new(),
            transport: default_transport(),
        }
    }

    // === Accessors ===

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn method_path(&self) -> &str {
        &self.method_path
    }

    pub fn query_parameters(&self) -> &QueryParameters {
        &self.query_parameters
    }

    pub fn path_parameters(&self) -> &PathParameters {
        &self.path_parameters
    }

    /// Headers keyed by their literal names (case-sensitive lookup).
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub fn authenticator(&self) -> Option<&Arc<dyn Authenticator>> {
        self.authenticator.as_ref()
    }

    pub fn stub_data(&self) -> Option<&StubDescriptor> {
        self.stub_data.as_ref()
    }

    pub fn error_handlers(&self) -> &[Arc<dyn ErrorHandler>] {
        &self.error_handlers
    }

    pub fn plugins(&self) -> &[Arc<dyn Plugin>] {
        &self.plugins
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn is_authorized(&self) -> bool {
        self.authenticator.is_some()
    }

    /// True when a stub is set and its mode replaces the transport.
    pub fn is_stubbed(&self) -> bool {
        self.stub_data
            .as_ref()
            .is_some_and(|stub| stub.mode.is_active())
    }

    /// Stub bytes, only when [`is_stubbed`](Self::is_stubbed) holds.
    pub fn get_stub_data(&self) -> Option<&Bytes> {
        self.stub_data
            .as_ref()
            .filter(|stub| stub.mode.is_active())
            .map(|stub| &stub.data)
    }

    // === Builder ===

    /// Replace the base URL.
    pub fn url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Path appended to the base URL; may contain `{name}` placeholders.
    pub fn with_method_path(mut self, method_path: impl Into<String>) -> Self {
        self.method_path = method_path.into();
        self
    }

    /// Set a query parameter; `None` removes it.
    pub fn query(mut self, name: impl Into<String>, value: impl IntoParameter) -> Self {
        let name = name.into();
        match value.into_parameter() {
            Some(value) => {
                self.query_parameters.insert(name, value);
            }
            None => {
                self.query_parameters.remove(&name);
            }
        }
        self
    }

    pub fn query_dictionary<I, K, V>(self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoParameter,
    {
        entries
            .into_iter()
            .fold(self, |request, (name, value)| request.query(name, value))
    }

    /// Set a path placeholder value; `None` removes it.
    pub fn path(mut self, name: impl Into<String>, value: impl IntoParameter) -> Self {
        let name = name.into();
        match value.into_parameter() {
            Some(value) => {
                self.path_parameters.insert(name, value.value());
            }
            None => {
                self.path_parameters.remove(&name);
            }
        }
        self
    }

    pub fn path_dictionary<I, K, V>(self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoParameter,
    {
        entries
            .into_iter()
            .fold(self, |request, (name, value)| request.path(name, value))
    }

    /// Set a header; `None` removes it.
    pub fn header(mut self, name: impl Into<String>, value: impl IntoParameter) -> Self {
        let name = name.into();
        match value.into_parameter() {
            Some(value) => {
                self.headers.insert(name, value.value());
            }
            None => {
                self.headers.remove(&name);
            }
        }
        self
    }

    pub fn header_dictionary<I, K, V>(self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoParameter,
    {
        entries
            .into_iter()
            .fold(self, |request, (name, value)| request.header(name, value))
    }

    pub fn content_type(self, content_type: ContentType) -> Self {
        self.header(ContentType::HEADER, content_type.as_str())
    }

    pub fn authorized(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    /// Answer with `data` immediately instead of using the transport.
    pub fn stub(self, data: impl Into<Bytes>) -> Self {
        self.stub_with_mode(data, StubMode::Immediate)
    }

    pub fn stub_with_mode(mut self, data: impl Into<Bytes>, mode: StubMode) -> Self {
        self.stub_data = Some(StubDescriptor::new(data, mode));
        self
    }

    /// Replace the error handlers.
    pub fn with_error_handlers(mut self, handlers: Vec<Arc<dyn ErrorHandler>>) -> Self {
        self.error_handlers = handlers;
        self
    }

    pub fn error_handler(mut self, handler: Arc<dyn ErrorHandler>) -> Self {
        self.error_handlers.push(handler);
        self
    }

    /// Replace the plugins.
    pub fn with_plugins(mut self, plugins: Vec<Arc<dyn Plugin>>) -> Self {
        self.plugins = plugins;
        self
    }

    pub fn plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    // === Bodies ===

    /// A copy of this request ready to carry a raw body.
    pub fn with_body(&self) -> Request {
        let mut request = self.clone();
        request.body = RequestBody::Empty;
        request
    }

    /// A copy of this request sending `multipart/form-data`.
    pub fn multipart(&self) -> Request {
        let mut request = self.clone().content_type(ContentType::MultipartFormData);
        request.body = RequestBody::Multipart(Form::new());
        request
    }

    /// A copy of this request sending `application/x-www-form-urlencoded`.
    pub fn form_url_encoded(&self) -> Request {
        let mut request = self.clone().content_type(ContentType::UrlEncoded);
        request.body = RequestBody::Form(OrderedMap::new());
        request
    }

    pub fn body_bytes(mut self, data: impl Into<Bytes>) -> Self {
        self.body = RequestBody::Bytes(data.into());
        self
    }

    pub fn body_string(self, text: impl Into<String>) -> Self {
        self.body_bytes(text.into())
    }

    /// Serialize `value` as the body and mark it `application/json`.
    #[cfg(feature = "json")]
    pub fn body_json<T: serde::Serialize + ?Sized>(self, value: &T) -> Result<Self, NetError> {
        let bytes = serde_json::to_vec(value).map_err(|e| NetError::InvalidBody(e.to_string()))?;
        Ok(self.content_type(ContentType::Json).body_bytes(bytes))
    }

    /// Append a multipart part.
    pub fn part(mut self, name: impl Into<String>, part: Part) -> Self {
        let form = match std::mem::take(&mut self.body) {
            RequestBody::Multipart(form) => form,
            _ => Form::new(),
        };
        let name: String = name.into();
        self.body = RequestBody::Multipart(form.part(name, part));
        self
    }

    pub fn text_part(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let value: String = value.into();
        self.part(name, Part::text(value))
    }

    /// Set a url-encoded form field; `None` removes it.
    ///
    /// Starting a form replaces any previous body and sets
    /// `Content-Type: application/x-www-form-urlencoded`.
    pub fn field(mut self, name: impl Into<String>, value: impl IntoParameter) -> Self {
        let mut fields = match std::mem::take(&mut self.body) {
            RequestBody::Form(fields) => fields,
            _ => {
                self = self.content_type(ContentType::UrlEncoded);
                OrderedMap::new()
            }
        };
        let name = name.into();
        match value.into_parameter() {
            Some(value) => {
                fields.insert(name, value.value());
            }
            None => {
                fields.remove(&name);
            }
        }
        self.body = RequestBody::Form(fields);
        self
    }

    pub fn field_dictionary<I, K, V>(self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoParameter,
    {
        entries
            .into_iter()
            .fold(self, |request, (name, value)| request.field(name, value))
    }

    // === Raw request ===

    /// Materialize method, URL, headers and body for the transport.
    pub fn raw_request(&self) -> Result<RawRequest, NetError> {
        let path = self.substituted_path()?;
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|_| NetError::InvalidUrl)?;

        if !self.query_parameters.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in self.query_parameters.iter() {
                pairs.append_pair(name, &value.value());
            }
        }

        let mut raw = RawRequest::new(self.method.clone(), url);
        for (name, value) in self.headers.iter() {
            parse_header(name, value)?;
            raw.set_header(name, value.as_str());
        }

        let encoded = self.body.encode();
        if let Some(content_type) = encoded.content_type {
            raw.set_header(ContentType::HEADER, content_type);
        }
        raw.set_body(encoded.data);
        Ok(raw)
    }

    fn substituted_path(&self) -> Result<String, NetError> {
        let mut out = String::with_capacity(self.method_path.len());
        let mut rest = self.method_path.as_str();

        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}').map(|i| open + i) else {
                break;
            };
            let name = &rest[open + 1..close];
            let value = self
                .path_parameters
                .get(name)
                .ok_or_else(|| NetError::MissingPathParameter(name.to_string()))?;
            out.push_str(&rest[..open]);
            out.push_str(value);
            rest = &rest[close + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }

    // === Plugin dispatch ===

    pub fn send_plugins_will_send_request(&self) {
        dispatch(&self.plugins, "will_send_request", |plugin| {
            plugin.will_send_request(self)
        });
    }

    pub fn send_plugins_did_send_request(&self, raw: &RawRequest) {
        dispatch(&self.plugins, "did_send_request", |plugin| {
            plugin.did_send_request(self, raw)
        });
    }

    pub fn send_plugins_did_receive_response(&self, response: &Response, raw: &RawRequest) {
        dispatch(&self.plugins, "did_receive_response", |plugin| {
            plugin.did_receive_response(response, raw)
        });
    }

    // === Execution ===

    /// Run the pipeline on the current task.
    pub async fn send(&self) -> Result<Response, NetError> {
        RequestJob::new(self.clone()).run().await
    }

    /// Run the pipeline, blocking the calling thread until it completes.
    ///
    /// Delayed stubs sleep on this thread. When called from inside a tokio
    /// runtime the pipeline is driven on a helper thread, which still blocks
    /// the caller (and, on a current-thread runtime, every task on it).
    pub fn execute(&self) -> Result<Response, NetError> {
        let job = RequestJob::new(self.clone());
        if tokio::runtime::Handle::try_current().is_ok() {
            std::thread::scope(|scope| scope.spawn(move || block_on(job)).join())
                .unwrap_or_else(|_| Err(NetError::Failed("execution thread panicked".into())))
        } else {
            block_on(job)
        }
    }

    /// Run the pipeline off the caller's thread and hand the result to
    /// `callback` exactly once.
    ///
    /// Inside a tokio runtime the job is spawned as a task on it. Without one
    /// it runs on a dedicated thread with its own runtime.
    pub fn enqueue<F>(&self, callback: F)
    where
        F: FnOnce(Result<Response, NetError>) + Send + 'static,
    {
        let job = RequestJob::new(self.clone());
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move { callback(job.run().await) });
            }
            Err(_) => {
                std::thread::spawn(move || callback(block_on(job)));
            }
        }
    }
}

fn block_on(job: RequestJob) -> Result<Response, NetError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| NetError::Failed(format!("failed to start runtime: {}", e)))?;
    runtime.block_on(job.run())
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("base_url", &self.base_url)
            .field("method_path", &self.method_path)
            .field("query_parameters", &self.query_parameters)
            .field("path_parameters", &self.path_parameters)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("is_authorized", &self.is_authorized())
            .field("stub_data", &self.stub_data)
            .field("error_handlers", &self.error_handlers.len())
            .field("plugins", &self.plugins.len())
            .finish()
    }
}
