//! API key authentication and request metering.
//!
//! - [`bearer`]: extracts the presented key from `Authorization: Bearer <key>`
//! - [`access`]: the [`AccessController`](access::AccessController), the single path through
//!   which keys are verified and quota is charged

pub mod access;
pub mod bearer;
