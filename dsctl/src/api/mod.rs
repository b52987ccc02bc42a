//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`models`]**: Request/response data structures
//!
//! # API Structure
//!
//! - **Accounts** (`/signup`, `/account`): key issuance and quota inspection
//! - **Analysis** (`/analyze`): metered scoring, requires `Authorization: Bearer <key>`
//! - **Sentences** (`/sentences/*`, `/stats`): the curated dataset
//!
//! The OpenAPI document is served at `/openapi.json` with an interactive reference at `/docs`.

pub mod handlers;
pub mod models;
