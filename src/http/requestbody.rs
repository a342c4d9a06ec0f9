//! Request body for POST/PUT/PATCH operations.

use crate::http::multipart::Form;
use crate::http::orderedmap::OrderedMap;
use bytes::Bytes;

/// Request body, encoded only when the raw request is built.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    /// No body (GET, HEAD, DELETE).
    #[default]
    Empty,
    /// Body with raw bytes.
    Bytes(Bytes),
    /// `application/x-www-form-urlencoded` fields.
    Form(OrderedMap<String>),
    /// `multipart/form-data` parts.
    Multipart(Form),
}

/// A body rendered to wire bytes.
#[derive(Debug, Clone, Default)]
pub struct EncodedBody {
    pub data: Option<Bytes>,
    /// Replaces the request's `Content-Type` on the wire (multipart boundary).
    pub content_type: Option<String>,
}

impl RequestBody {
    /// Render the body to bytes.
    pub fn encode(&self) -> EncodedBody {
        match self {
            RequestBody::Empty => EncodedBody::default(),
            RequestBody::Bytes(b) => EncodedBody {
                data: Some(b.clone()),
                content_type: None,
            },
            RequestBody::Form(fields) => {
                let encoded = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(fields.iter())
                    .finish();
                EncodedBody {
                    data: Some(Bytes::from(encoded)),
                    content_type: None,
                }
            }
            RequestBody::Multipart(form) => EncodedBody {
                data: Some(form.to_body()),
                content_type: Some(form.content_type()),
            },
        }
    }
}
