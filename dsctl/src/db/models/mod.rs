//! Store records and requests.
//!
//! Types in this module cross the store boundary: handlers build `*DBRequest`s, stores return
//! `*DBResponse`s. They carry no HTTP concerns; see [`crate::api::models`] for those.

pub mod accounts;
pub mod sentences;
