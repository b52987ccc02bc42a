//! API request and response data models.
//!
//! API models are distinct from the store models in [`crate::db::models`], so the wire format
//! can evolve independently of storage. All models are annotated with `utoipa` for the generated
//! OpenAPI document.
//!
//! - [`accounts`]: signup and account summary
//! - [`analyze`]: metered text analysis
//! - [`sentences`]: dataset submission, listing, validation and statistics
//! - [`service`]: root banner

pub mod accounts;
pub mod analyze;
pub mod sentences;
pub mod service;
