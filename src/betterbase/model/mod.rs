pub mod connection;
pub mod meta;

// Re-export common types for easier access
pub use connection::{Connection, ConnectionDraft, ConnectionSnapshot};
