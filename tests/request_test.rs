//! Tests for the Request builder.

use http::Method;
use rage::http::RequestBody;
use rage::urlrequest::FnErrorHandler;
use rage::{
    Authenticator, ContentType, ErrorHandler, Handling, NetError, Plugin, RawRequest, Request,
    StubMode,
};
use std::sync::Arc;

struct NoopAuthenticator;

impl Authenticator for NoopAuthenticator {
    fn authorize(&self, request: RawRequest) -> RawRequest {
        request
    }
}

struct NoopPlugin;

impl Plugin for NoopPlugin {}

fn request() -> Request {
    Request::new(Method::GET, "http://example.com")
}

// === Customization ===

#[test]
fn test_set_url() {
    let request = request().url("http://example2.com");
    assert_eq!(request.base_url(), "http://example2.com");
}

#[test]
fn test_query_parameters() {
    let request = request();
    assert_eq!(request.query_parameters().len(), 0);

    let request = request.query("name", "Paul").query("age", 24);
    assert_eq!(request.query_parameters().len(), 2);
    assert_eq!(request.query_parameters().get("name").unwrap().value(), "Paul");
    assert_eq!(request.query_parameters().get("age").unwrap().value(), "24");
}

#[test]
fn test_query_dictionary() {
    let request = request().query_dictionary([("name", "Paul"), ("age", "24")]);
    assert_eq!(request.query_parameters().len(), 2);
    assert_eq!(request.query_parameters().get("name").unwrap().value(), "Paul");
    assert_eq!(request.query_parameters().get("age").unwrap().value(), "24");
}

#[test]
fn test_query_none_removes() {
    let request = request().query("page", 2).query("page", None::<i32>);
    assert!(request.query_parameters().is_empty());
}

#[test]
fn test_path_parameters() {
    let request = request().path("name", "Paul").path("age", 24);
    assert_eq!(request.path_parameters().len(), 2);
    assert_eq!(request.path_parameters().get("name").unwrap(), "Paul");
    assert_eq!(request.path_parameters().get("age").unwrap(), "24");
}

#[test]
fn test_path_dictionary() {
    let request = request().path_dictionary([("id", 7), ("rev", 2)]);
    assert_eq!(request.path_parameters().get("id").unwrap(), "7");
    assert_eq!(request.path_parameters().get("rev").unwrap(), "2");
}

#[test]
fn test_headers() {
    let request = request()
        .header("Authorization", "Basic abcd")
        .header("Api-Version", 5);
    assert_eq!(request.headers().len(), 2);
    assert_eq!(request.headers().get("Authorization").unwrap(), "Basic abcd");
    assert_eq!(request.headers().get("Api-Version").unwrap(), "5");
}

#[test]
fn test_remove_header() {
    let new_version: Option<i32> = None;
    let request = request()
        .header("Authorization", "Basic abcd")
        .header("Api-Version", 5)
        .header("Api-Version", new_version);
    assert_eq!(request.headers().len(), 1);
    assert!(request.headers().get("Api-Version").is_none());
}

#[test]
fn test_header_dictionary_add_and_remove() {
    let request =
        request().header_dictionary([("Authorization", "Basic abcd"), ("Api-Version", "5")]);
    assert_eq!(request.headers().len(), 2);

    let request = request.header_dictionary([("Api-Version", None::<&str>)]);
    assert_eq!(request.headers().len(), 1);
    assert!(request.headers().get("Api-Version").is_none());
}

#[test]
fn test_header_replace_keeps_position() {
    let request = request().header("A", 1).header("B", 2).header("A", 3);
    let keys: Vec<_> = request.headers().keys().collect();
    assert_eq!(keys, vec!["A", "B"]);
    assert_eq!(request.headers().get("A").unwrap(), "3");
}

#[test]
fn test_content_type_overwrites() {
    let request = request().content_type(ContentType::Json);
    assert_eq!(request.headers().get("Content-Type").unwrap(), "application/json");

    let request = request.content_type(ContentType::UrlEncoded);
    assert_eq!(
        request.headers().get("Content-Type").unwrap(),
        "application/x-www-form-urlencoded"
    );

    let request = request.content_type(ContentType::MultipartFormData);
    assert_eq!(request.headers().get("Content-Type").unwrap(), "multipart/form-data");

    let request = request.content_type(ContentType::Custom("image/png".into()));
    assert_eq!(request.headers().get("Content-Type").unwrap(), "image/png");
    assert_eq!(request.headers().len(), 1);
}

#[test]
fn test_authorized() {
    let request = request();
    assert!(!request.is_authorized());
    let request = request.authorized(Arc::new(NoopAuthenticator));
    assert!(request.is_authorized());
}

#[test]
fn test_builder_copies_are_independent() {
    let base = request().header("A", 1);
    let derived = base.clone().header("B", 2);
    assert_eq!(base.headers().len(), 1);
    assert_eq!(derived.headers().len(), 2);
}

// === Stubs ===

#[test]
fn test_stub_with_data() {
    let request = request();
    assert!(request.stub_data().is_none());

    let request = request.stub(b"{}".to_vec());
    let stub = request.stub_data().unwrap();
    assert_eq!(stub.data, "{}");
    assert_eq!(stub.mode, StubMode::Immediate);
}

#[test]
fn test_stub_with_string() {
    let request = request().stub("{}");
    let stub = request.stub_data().unwrap();
    assert_eq!(stub.data, "{}");
    assert_eq!(stub.mode, StubMode::Immediate);
}

#[test]
fn test_stub_modes() {
    let request = request().stub_with_mode("{}", StubMode::Never);
    assert_eq!(request.stub_data().unwrap().mode, StubMode::Never);

    let request = request.stub_with_mode("{}", StubMode::Delayed(2014));
    assert_eq!(request.stub_data().unwrap().mode, StubMode::Delayed(2014));
    assert_ne!(request.stub_data().unwrap().mode, StubMode::Delayed(1000));
}

#[test]
fn test_is_stubbed() {
    let request = request();
    assert!(!request.is_stubbed());

    let request = request.stub_with_mode("{}", StubMode::Never);
    assert!(!request.is_stubbed());

    let request = request.stub_with_mode("{}", StubMode::Delayed(0));
    assert!(request.is_stubbed());

    let request = request.stub_with_mode("{}", StubMode::Immediate);
    assert!(request.is_stubbed());
}

#[test]
fn test_get_stub_data() {
    let request = request();
    assert!(request.get_stub_data().is_none());

    let request = request.stub_with_mode("{}", StubMode::Never);
    assert!(request.get_stub_data().is_none());

    let request = request.stub_with_mode("{}", StubMode::Delayed(0));
    assert_eq!(request.get_stub_data().unwrap(), "{}");

    let request = request.stub_with_mode("{}", StubMode::Immediate);
    assert_eq!(request.get_stub_data().unwrap(), "{}");
}

// === Error handlers ===

#[test]
fn test_error_handlers_set() {
    let handler: Arc<dyn ErrorHandler> =
        Arc::new(FnErrorHandler::new(|_: &Request, e: NetError| Handling::Pass(e)));
    let request = request().with_error_handlers(vec![handler]);
    assert_eq!(request.error_handlers().len(), 1);
}

// === Derived requests ===

fn configured() -> Request {
    request()
        .with_method_path("/test")
        .query("q", "x")
        .path("id", 1)
        .header("Accept", "*/*")
        .authorized(Arc::new(NoopAuthenticator))
        .plugin(Arc::new(NoopPlugin))
}

#[test]
fn test_with_body_copies_everything() {
    let request = configured();
    let body_request = request.with_body();

    assert_eq!(body_request.method(), request.method());
    assert_eq!(body_request.method_path(), request.method_path());
    assert_eq!(body_request.base_url(), request.base_url());
    assert_eq!(body_request.query_parameters(), request.query_parameters());
    assert_eq!(body_request.path_parameters(), request.path_parameters());
    assert_eq!(body_request.headers(), request.headers());
    assert!(body_request.is_authorized());
    assert_eq!(body_request.plugins().len(), request.plugins().len());
}

#[test]
fn test_multipart_adds_content_type() {
    let request = configured();
    let multipart = request.multipart();

    assert_eq!(multipart.method(), request.method());
    assert_eq!(multipart.method_path(), request.method_path());
    assert_eq!(multipart.query_parameters(), request.query_parameters());
    assert_eq!(multipart.headers().len(), request.headers().len() + 1);
    assert_eq!(multipart.headers().get("Content-Type").unwrap(), "multipart/form-data");
    assert!(matches!(multipart.body(), RequestBody::Multipart(_)));
    assert!(multipart.is_authorized());
    assert_eq!(multipart.plugins().len(), request.plugins().len());
}

#[test]
fn test_form_url_encoded_adds_content_type() {
    let request = configured();
    let form = request.form_url_encoded();

    assert_eq!(form.path_parameters(), request.path_parameters());
    assert_eq!(form.headers().len(), request.headers().len() + 1);
    assert_eq!(
        form.headers().get("Content-Type").unwrap(),
        "application/x-www-form-urlencoded"
    );
    assert!(form.is_authorized());
}

#[test]
fn test_derived_request_leaves_source_untouched() {
    let request = configured();
    let _ = request.multipart();
    assert!(request.headers().get("Content-Type").is_none());
    assert!(matches!(request.body(), RequestBody::Empty));
}

// === Raw request ===

#[test]
fn test_raw_request_full_url() {
    let raw = Request::new(Method::DELETE, "https://api.example.com/v1")
        .with_method_path("/users/{id}")
        .path("id", 42)
        .query("hard", true)
        .raw_request()
        .unwrap();
    assert_eq!(*raw.method(), Method::DELETE);
    assert_eq!(raw.url().as_str(), "https://api.example.com/v1/users/42?hard=true");
}

#[test]
fn test_missing_path_parameter_message() {
    let err = request()
        .with_method_path("/users/{id}")
        .raw_request()
        .unwrap_err();
    assert_eq!(err.to_string(), "Missing value for path parameter {id}");
}
