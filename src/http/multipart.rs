//! Multipart form data encoding (RFC 7578).
//!
//! # Example
//! ```ignore
//! use rage::http::multipart::{Form, Part};
//!
//! let form = Form::new()
//!     .text("username", "user123")
//!     .part("avatar", Part::bytes(png).file_name("me.png").content_type("image/png"));
//! ```

use bytes::{BufMut, Bytes, BytesMut};
use std::borrow::Cow;

/// An ordered list of named parts sharing one boundary.
#[derive(Debug, Clone)]
pub struct Form {
    boundary: String,
    fields: Vec<(Cow<'static, str>, Part)>,
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

impl Form {
    /// Create a new empty form.
    pub fn new() -> Self {
        Self {
            boundary: generate_boundary(),
            fields: Vec::new(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Add a text field.
    pub fn text<N, V>(self, name: N, value: V) -> Self
    where
        N: Into<Cow<'static, str>>,
        V: Into<Cow<'static, str>>,
    {
        self.part(name, Part::text(value))
    }

    /// Add a custom part.
    pub fn part<N>(mut self, name: N, part: Part) -> Self
    where
        N: Into<Cow<'static, str>>,
    {
        self.fields.push((name.into(), part));
        self
    }

    /// Number of parts.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The `Content-Type` value including the boundary parameter.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Render all parts. An empty form renders to an empty body.
    pub fn to_body(&self) -> Bytes {
        if self.fields.is_empty() {
            return Bytes::new();
        }

        let mut out = BytesMut::new();
        for (name, part) in &self.fields {
            out.put_slice(b"--");
            out.put_slice(self.boundary.as_bytes());
            out.put_slice(b"\r\n");
            out.put_slice(part.headers(name).as_bytes());
            out.put_slice(b"\r\n\r\n");
            out.put_slice(&part.data);
            out.put_slice(b"\r\n");
        }
        out.put_slice(b"--");
        out.put_slice(self.boundary.as_bytes());
        out.put_slice(b"--\r\n");
        out.freeze()
    }
}

/// One part of a multipart form.
#[derive(Debug, Clone)]
pub struct Part {
    data: Bytes,
    content_type: Option<String>,
    file_name: Option<Cow<'static, str>>,
}

impl Part {
    /// A UTF-8 text part.
    pub fn text<V>(value: V) -> Self
    where
        V: Into<Cow<'static, str>>,
    {
        Self {
            data: Bytes::from(value.into().into_owned()),
            content_type: Some("text/plain; charset=utf-8".to_string()),
            file_name: None,
        }
    }

    /// A binary part with no content type.
    pub fn bytes<B>(data: B) -> Self
    where
        B: Into<Bytes>,
    {
        Self {
            data: data.into(),
            content_type: None,
            file_name: None,
        }
    }

    pub fn content_type<S: Into<String>>(mut self, mime: S) -> Self {
        self.content_type = Some(mime.into());
        self
    }

    pub fn file_name<S>(mut self, name: S) -> Self
    where
        S: Into<Cow<'static, str>>,
    {
        self.file_name = Some(name.into());
        self
    }

    fn headers(&self, name: &str) -> String {
        let mut header = format!("Content-Disposition: form-data; name=\"{}\"", escape(name));
        if let Some(file_name) = &self.file_name {
            header.push_str(&format!("; filename=\"{}\"", escape(file_name)));
        }
        if let Some(mime) = &self.content_type {
            header.push_str("\r\nContent-Type: ");
            header.push_str(mime);
        }
        header
    }
}

fn escape(s: &str) -> Cow<'_, str> {
    if s.contains(['"', '\\', '\r', '\n']) {
        Cow::Owned(
            s.replace('\\', "\\\\")
                .replace('"', "\\\"")
                .replace('\r', "\\r")
                .replace('\n', "\\n"),
        )
    } else {
        Cow::Borrowed(s)
    }
}

fn generate_boundary() -> String {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("----rage-boundary-{:016x}{:08x}", nanos, seq)
}
