// Schema definitions - one record type per collection

pub mod post_schema;
pub mod simple_schemas;
pub mod user_schema;

use serde::Serialize;
use url::Url;
use validator::{Validate, ValidationError};

use crate::error::AppResult;

pub use post_schema::Post;
pub use simple_schemas::{Comment, Like};
pub use user_schema::User;

/// A validated record that is persisted as a document in `COLLECTION`.
pub trait Schema: Validate + Serialize {
    const COLLECTION: &'static str;

    /// Canonical form of an already validated record.
    fn normalize(self) -> Self;
}

/// Validate a raw record and return its normalized form.
pub fn validate_record<T: Schema>(record: T) -> AppResult<T> {
    record.validate()?;
    Ok(record.normalize())
}

/// Only absolute http(s) URLs with a host are accepted.
pub fn validate_http_url(value: &str) -> Result<(), ValidationError> {
    let parsed = Url::parse(value).map_err(|_| invalid_url())?;
    match parsed.scheme() {
        "http" | "https" if parsed.has_host() => Ok(()),
        _ => Err(invalid_url()),
    }
}

pub(crate) fn normalize_url(value: Option<String>) -> Option<String> {
    value.map(|raw| match Url::parse(&raw) {
        Ok(parsed) => parsed.to_string(),
        Err(_) => raw,
    })
}

fn invalid_url() -> ValidationError {
    let mut error = ValidationError::new("url");
    error.message = Some("must be a valid http or https URL".into());
    error
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_url_validation() {
        assert!(validate_http_url("https://example.com/a.png").is_ok());
        assert!(validate_http_url("http://localhost:8000").is_ok());
        assert!(validate_http_url("ftp://example.com/file").is_err());
        assert!(validate_http_url("mailto:alex@example.com").is_err());
        assert!(validate_http_url("not a url").is_err());
        assert!(validate_http_url("").is_err());
    }

    #[test]
    fn test_normalize_url_canonicalizes() {
        assert_eq!(
            normalize_url(Some("HTTPS://Example.com".to_string())),
            Some("https://example.com/".to_string())
        );
        assert_eq!(normalize_url(None), None);
    }
}
