//! HTTP request handlers for all API endpoints.
//!
//! Handlers are thin: they authenticate through [`crate::auth::access::AccessController`] where a
//! route is metered, call [`crate::scoring`], persist through the dataset store and shape the
//! response.
//!
//! # Handler Modules
//!
//! - [`accounts`]: signup and account details
//! - [`analyze`]: metered text analysis
//! - [`sentences`]: dataset submission, listing, validation, deletion and statistics
//! - [`service`]: root banner

pub mod accounts;
pub mod analyze;
pub mod sentences;
pub mod service;
