//! Common type definitions.
//!
//! # ID Types
//!
//! - [`AccountId`]: API-key-bearing account identifier (UUID, assigned at signup)
//! - [`SentenceId`]: Dataset sentence identifier (database sequence)
//!
//! # Utility Functions
//!
//! - [`abbrev_uuid`]: Abbreviate UUIDs to first 8 chars for logging

use uuid::Uuid;

// Type aliases for IDs
pub type AccountId = Uuid;
pub type SentenceId = i64;

/// Endpoint names recorded in the usage log for metered calls.
pub mod endpoints {
    pub const ANALYZE: &str = "/analyze";
}

/// Abbreviate a UUID to its first 8 characters for more readable logs and traces
/// Example: "550e8400-e29b-41d4-a716-446655440000" -> "550e8400"
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}
