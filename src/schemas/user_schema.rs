// User Entity Schema

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{normalize_url, validate_http_url, Schema};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct User {
    /// Display name
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,

    /// Unique email address (uniqueness is not enforced)
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    #[serde(default)]
    #[validate(custom(function = "validate_http_url"))]
    pub avatar_url: Option<String>,

    #[serde(default)]
    #[validate(length(max = 280, message = "must be at most 280 characters"))]
    pub bio: Option<String>,
}

impl Schema for User {
    const COLLECTION: &'static str = "user";

    fn normalize(self) -> Self {
        Self {
            avatar_url: normalize_url(self.avatar_url),
            ..self
        }
    }
}
