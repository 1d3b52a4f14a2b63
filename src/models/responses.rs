use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub image_url: Option<String>,
    pub like_count: i64,
    pub comment_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub content: String,
}

pub fn user_from_document(doc: &Document) -> AppResult<UserResponse> {
    Ok(UserResponse {
        id: document_id(doc)?,
        name: required_str(doc, "name")?,
        email: required_str(doc, "email")?,
        avatar_url: optional_str(doc, "avatar_url"),
        bio: optional_str(doc, "bio"),
    })
}

pub fn post_from_document(doc: &Document) -> AppResult<PostResponse> {
    Ok(PostResponse {
        id: document_id(doc)?,
        user_id: reference(doc, "user_id")?,
        content: required_str(doc, "content")?,
        image_url: optional_str(doc, "image_url"),
        like_count: counter(doc, "like_count")?,
        comment_count: counter(doc, "comment_count")?,
    })
}

pub fn comment_from_document(doc: &Document) -> AppResult<CommentResponse> {
    Ok(CommentResponse {
        id: document_id(doc)?,
        post_id: reference(doc, "post_id")?,
        user_id: reference(doc, "user_id")?,
        content: required_str(doc, "content")?,
    })
}

fn document_id(doc: &Document) -> AppResult<String> {
    match doc.get("_id") {
        Some(Bson::ObjectId(id)) => Ok(id.to_hex()),
        Some(Bson::String(id)) => Ok(id.clone()),
        _ => Err(malformed("_id")),
    }
}

/// Reference fields may have been written as ObjectIds or strings
fn reference(doc: &Document, key: &str) -> AppResult<String> {
    match doc.get(key) {
        Some(Bson::ObjectId(id)) => Ok(id.to_hex()),
        Some(Bson::String(id)) => Ok(id.clone()),
        _ => Err(malformed(key)),
    }
}

fn required_str(doc: &Document, key: &str) -> AppResult<String> {
    doc.get_str(key)
        .map(str::to_string)
        .map_err(|_| malformed(key))
}

fn optional_str(doc: &Document, key: &str) -> Option<String> {
    doc.get_str(key).ok().map(str::to_string)
}

/// Missing counters read as zero
fn counter(doc: &Document, key: &str) -> AppResult<i64> {
    match doc.get(key) {
        None | Some(Bson::Null) => Ok(0),
        Some(Bson::Int32(v)) => Ok(i64::from(*v)),
        Some(Bson::Int64(v)) => Ok(*v),
        Some(_) => Err(malformed(key)),
    }
}

fn malformed(key: &str) -> AppError {
    AppError::DeserializationError(format!("Stored document has missing or invalid '{}'", key))
}
