// Comment and Like schemas. No route writes these yet; likes are only
// tracked through Post::like_count.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Schema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Comment {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub post_id: String,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub user_id: String,

    #[validate(length(
        min = 1,
        max = 500,
        message = "must be between 1 and 500 characters"
    ))]
    pub content: String,
}

impl Schema for Comment {
    const COLLECTION: &'static str = "comment";

    fn normalize(self) -> Self {
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Like {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub post_id: String,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub user_id: String,
}

impl Schema for Like {
    const COLLECTION: &'static str = "like";

    fn normalize(self) -> Self {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_content_bounds() {
        let mut comment = Comment {
            post_id: "p1".to_string(),
            user_id: "u1".to_string(),
            content: "nice".to_string(),
        };
        assert!(comment.validate().is_ok());

        comment.content = "x".repeat(501);
        assert!(comment.validate().is_err());

        comment.content = String::new();
        assert!(comment.validate().is_err());
    }

    #[test]
    fn test_like_requires_both_ids() {
        let like = Like {
            post_id: "p1".to_string(),
            user_id: String::new(),
        };
        assert!(like.validate().is_err());
    }
}
