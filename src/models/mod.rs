// Wire response shapes and the stored-document mappings that produce them

pub mod responses;

pub use responses::{
    comment_from_document, post_from_document, user_from_document, CommentResponse,
    PostResponse, UserResponse,
};
