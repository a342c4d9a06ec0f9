/// Content types with a fixed `Content-Type` header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentType {
    Json,
    UrlEncoded,
    MultipartFormData,
    Custom(String),
}

impl ContentType {
    /// Header name the value is written under.
    pub const HEADER: &'static str = "Content-Type";

    pub fn as_str(&self) -> &str {
        match self {
            ContentType::Json => "application/json",
            ContentType::UrlEncoded => "application/x-www-form-urlencoded",
            ContentType::MultipartFormData => "multipart/form-data",
            ContentType::Custom(value) => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values() {
        assert_eq!(ContentType::Json.as_str(), "application/json");
        assert_eq!(
            ContentType::UrlEncoded.as_str(),
            "application/x-www-form-urlencoded"
        );
        assert_eq!(
            ContentType::MultipartFormData.as_str(),
            "multipart/form-data"
        );
        assert_eq!(ContentType::Custom("image/png".into()).as_str(), "image/png");
    }
}
