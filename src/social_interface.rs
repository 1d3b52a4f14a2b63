// Social App HTTP interface - handlers and router for users, posts and likes

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    app_state::AppState,
    data_seeder::seed_demo_data,
    error::{AppError, AppResult},
    infrastructure::database::{parse_object_id, Database},
    models::{post_from_document, user_from_document, PostResponse, UserResponse},
    schemas::{validate_record, Post, Schema, User},
};

pub const DEFAULT_LIST_LIMIT: i64 = 20;
const MAX_DIAGNOSTIC_COLLECTIONS: usize = 10;
const MAX_DIAGNOSTIC_ERROR_CHARS: usize = 50;

// HTTP Request/Response types
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

impl ListQuery {
    fn resolved_limit(&self) -> AppResult<i64> {
        match self.limit {
            None => Ok(DEFAULT_LIST_LIMIT),
            Some(limit) if limit > 0 => Ok(limit),
            Some(_) => Err(AppError::Validation(
                "limit: must be a positive integer".to_string(),
            )),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SeedResponse {
    pub status: String,
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DiagnosticResponse {
    pub backend: String,
    pub database: String,
    pub database_url: Option<String>,
    pub database_name: Option<String>,
    pub connection_status: String,
    pub collections: Vec<String>,
}

fn set_marker(is_set: bool) -> String {
    let marker = if is_set { "✅ Set" } else { "❌ Not Set" };
    marker.to_string()
}

fn truncate_chars(message: &str, max: usize) -> String {
    message.chars().take(max).collect()
}

fn json_payload<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::warn!("Rejected request body: {}", rejection.body_text());
            Err(AppError::Validation(rejection.body_text()))
        }
    }
}

fn list_limit(query: Result<Query<ListQuery>, QueryRejection>) -> AppResult<i64> {
    let Query(query) = query.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    query.resolved_limit()
}

async fn insert_and_reread<T: Schema>(db: &Database, record: T) -> AppResult<mongodb::bson::Document> {
    let record = validate_record(record)?;
    let id = db.create_document(T::COLLECTION, &record).await?;
    let oid = parse_object_id(&id)
        .ok_or_else(|| AppError::DatabaseError(format!("Store returned invalid id {}", id)))?;

    db.get_document_by_id(T::COLLECTION, oid)
        .await?
        .ok_or_else(|| {
            AppError::DatabaseError(format!(
                "Created {} {} missing on re-read",
                T::COLLECTION,
                id
            ))
        })
}

// HTTP Handlers

pub async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "Social App API running" }))
}

/// Connectivity report; store failures are folded into status strings.
pub async fn test_database_handler(State(state): State<AppState>) -> Json<DiagnosticResponse> {
    let mut response = DiagnosticResponse {
        backend: "✅ Running".to_string(),
        database: "❌ Not Available".to_string(),
        database_url: None,
        database_name: None,
        connection_status: "Not Connected".to_string(),
        collections: Vec::new(),
    };

    let Some(db) = state.database() else {
        response.database = "⚠️  Available but not initialized".to_string();
        return Json(response);
    };

    response.database = "✅ Available".to_string();
    response.database_url = Some(set_marker(state.config.database.url_is_set()));
    response.database_name = Some(set_marker(state.config.database.name_is_set()));
    response.connection_status = "Connected".to_string();

    match db.list_collection_names().await {
        Ok(mut collections) => {
            collections.truncate(MAX_DIAGNOSTIC_COLLECTIONS);
            response.collections = collections;
            response.database = "✅ Connected & Working".to_string();
        }
        Err(e) => {
            tracing::warn!("Diagnostic collection listing failed: {}", e);
            response.database = format!(
                "⚠️  Connected but Error: {}",
                truncate_chars(&e.to_string(), MAX_DIAGNOSTIC_ERROR_CHARS)
            );
        }
    }

    Json(response)
}

pub async fn seed_handler(State(state): State<AppState>) -> AppResult<Json<SeedResponse>> {
    let db = state.require_database()?;
    let user_id = seed_demo_data(db).await?;
    Ok(Json(SeedResponse {
        status: "ok".to_string(),
        user_id,
    }))
}

pub async fn list_posts_handler(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> AppResult<Json<Vec<PostResponse>>> {
    let limit = list_limit(query)?;
    let db = state.require_database()?;
    let posts = db
        .get_recent_documents(Post::COLLECTION, limit)
        .await?
        .iter()
        .map(post_from_document)
        .collect::<AppResult<Vec<_>>>()?;
    Ok(Json(posts))
}

pub async fn create_post_handler(
    State(state): State<AppState>,
    payload: Result<Json<Post>, JsonRejection>,
) -> AppResult<Json<PostResponse>> {
    let post = json_payload(payload)?;
    let db = state.require_database()?;
    let stored = insert_and_reread(db, post).await?;
    let response = post_from_document(&stored)?;
    tracing::info!("Created post {} by user {}", response.id, response.user_id);
    Ok(Json(response))
}

pub async fn list_users_handler(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let limit = list_limit(query)?;
    let db = state.require_database()?;
    let users = db
        .get_recent_documents(User::COLLECTION, limit)
        .await?
        .iter()
        .map(user_from_document)
        .collect::<AppResult<Vec<_>>>()?;
    Ok(Json(users))
}

pub async fn create_user_handler(
    State(state): State<AppState>,
    payload: Result<Json<User>, JsonRejection>,
) -> AppResult<Json<UserResponse>> {
    let user = json_payload(payload)?;
    let db = state.require_database()?;
    let stored = insert_and_reread(db, user).await?;
    let response = user_from_document(&stored)?;
    tracing::info!("Created user {} ({})", response.id, response.name);
    Ok(Json(response))
}

/// Single-document atomic increment of `like_count`
pub async fn like_post_handler(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> AppResult<Json<PostResponse>> {
    let id = parse_object_id(&post_id)
        .ok_or_else(|| AppError::BadRequest("Invalid post id".to_string()))?;
    let db = state.require_database()?;

    let updated = db
        .increment_counter(Post::COLLECTION, id, "like_count")
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;
    Ok(Json(post_from_document(&updated)?))
}

// Create unified router
pub fn create_social_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/test", get(test_database_handler))
        .route("/seed", post(seed_handler))
        // Posts
        .route("/posts", get(list_posts_handler).post(create_post_handler))
        .route("/posts/{post_id}/like", post(like_post_handler))
        // Users
        .route("/users", get(list_users_handler).post(create_user_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_limit_defaults_and_bounds() {
        assert_eq!(ListQuery { limit: None }.resolved_limit().unwrap(), 20);
        assert_eq!(ListQuery { limit: Some(2) }.resolved_limit().unwrap(), 2);
        assert!(ListQuery { limit: Some(0) }.resolved_limit().is_err());
        assert!(ListQuery { limit: Some(-5) }.resolved_limit().is_err());
    }

    #[test]
    fn test_truncate_chars_is_char_aware() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo");
        assert_eq!(truncate_chars("short", 50), "short");
    }
}
