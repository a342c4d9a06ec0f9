pub mod contenttype;
pub mod multipart;
pub mod orderedmap;
pub mod parameter;
pub mod rawrequest;
pub mod requestbody;
pub mod response;

// Re-exports for convenience
pub use contenttype::ContentType;
pub use orderedmap::{Headers, OrderedMap, PathParameters, QueryParameters};
pub use parameter::{IntoParameter, Parameter};
pub use rawrequest::RawRequest;
pub use requestbody::RequestBody;
pub use response::{Response, ResponseHead};
