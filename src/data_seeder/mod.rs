use crate::{
    error::AppResult,
    infrastructure::database::Database,
    schemas::{Post, Schema, User},
};

const DEMO_POSTS: [&str; 2] = [
    "Hello world! This is my first post on our new app.",
    "Loving these floating icons in the hero animation.",
];

pub fn demo_user() -> User {
    User {
        name: "Alex Johnson".to_string(),
        email: "alex@example.com".to_string(),
        avatar_url: None,
        bio: Some("Building a social app with AI ✨".to_string()),
    }
}

/// Insert one demo user and two posts by that user. Not idempotent: every
/// call creates a fresh set. Returns the new user's id.
pub async fn seed_demo_data(db: &Database) -> AppResult<String> {
    tracing::info!("Seeding demo data...");

    let user_id = db.create_document(User::COLLECTION, &demo_user()).await?;
    for content in DEMO_POSTS {
        let post = Post::new(user_id.clone(), content);
        db.create_document(Post::COLLECTION, &post).await?;
    }

    tracing::info!("Seeded demo user {} with {} posts", user_id, DEMO_POSTS.len());
    Ok(user_id)
}
