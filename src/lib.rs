// Social App API - users, posts and like counters over a document store

// Schema Definitions - validated records, one per collection
pub mod schemas;

// Store infrastructure - persistence accessor and store implementations
pub mod infrastructure;

// Wire response shapes
pub mod models;

// HTTP layer
pub mod social_interface;

// Common utilities
pub mod app_state;
pub mod config;
pub mod data_seeder;
pub mod error;

// Re-exports for convenience
pub use error::{AppError, AppResult};
