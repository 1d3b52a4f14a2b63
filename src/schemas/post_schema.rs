// Post Entity Schema - engagement counters default to zero

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{normalize_url, validate_http_url, Schema};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Post {
    /// Author user id (string form of the user's document id)
    #[validate(length(min = 1, message = "must not be empty"))]
    pub user_id: String,

    #[validate(length(
        min = 1,
        max = 1000,
        message = "must be between 1 and 1000 characters"
    ))]
    pub content: String,

    #[serde(default)]
    #[validate(custom(function = "validate_http_url"))]
    pub image_url: Option<String>,

    /// Server-owned; request bodies cannot set it
    #[serde(default, skip_deserializing)]
    #[validate(range(min = 0, message = "must not be negative"))]
    pub like_count: i64,

    #[serde(default, skip_deserializing)]
    #[validate(range(min = 0, message = "must not be negative"))]
    pub comment_count: i64,
}

impl Post {
    pub fn new(user_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            content: content.into(),
            image_url: None,
            like_count: 0,
            comment_count: 0,
        }
    }
}

impl Schema for Post {
    const COLLECTION: &'static str = "post";

    fn normalize(self) -> Self {
        Self {
            image_url: normalize_url(self.image_url),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::validate_record;

    #[test]
    fn test_post_defaults_counters() {
        let raw = serde_json::json!({ "user_id": "u1", "content": "hi" });
        let post: Post = serde_json::from_value(raw).unwrap();
        let post = validate_record(post).unwrap();
        assert_eq!(post.like_count, 0);
        assert_eq!(post.comment_count, 0);
        assert_eq!(post.image_url, None);
    }

    #[test]
    fn test_post_ignores_client_counters() {
        let raw = serde_json::json!({
            "user_id": "u1",
            "content": "hi",
            "like_count": 5,
            "comment_count": 7
        });
        let post: Post = serde_json::from_value(raw).unwrap();
        assert_eq!(post.like_count, 0);
        assert_eq!(post.comment_count, 0);
    }

    #[test]
    fn test_post_content_bounds() {
        let mut post = Post::new("u1", "");
        assert!(post.validate().is_err());

        post.content = "x".repeat(1000);
        assert!(post.validate().is_ok());

        post.content = "x".repeat(1001);
        assert!(post.validate().is_err());
    }

    #[test]
    fn test_post_requires_user_id() {
        assert!(Post::new("", "hello").validate().is_err());
    }

    #[test]
    fn test_post_negative_counters_rejected() {
        let mut post = Post::new("u1", "hello");
        post.like_count = -1;
        let err = validate_record(post).unwrap_err().to_string();
        assert!(err.contains("like_count"));
    }

    #[test]
    fn test_post_image_url() {
        let mut post = Post::new("u1", "hello");
        post.image_url = Some("javascript:alert(1)".to_string());
        assert!(post.validate().is_err());

        post.image_url = Some("https://images.example.com/cat.png".to_string());
        assert!(post.validate().is_ok());
    }
}
