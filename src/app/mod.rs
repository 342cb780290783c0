pub mod error;
pub mod lesson_store;
pub mod server;
