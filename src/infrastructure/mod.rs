// Core infrastructure modules
pub mod database;     // Persistence accessor and store trait
pub mod memory_store; // In-process store
pub mod mongo_store;  // MongoDB store

pub use database::{parse_object_id, Database, DocumentQuery, DocumentStore};
pub use memory_store::MemoryStore;
pub use mongo_store::MongoStore;
