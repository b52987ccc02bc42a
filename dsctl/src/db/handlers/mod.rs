//! Store implementations for database access.
//!
//! Two backends implement the traits in [`repository`]:
//!
//! - [`PgAccountStore`] / [`PgDatasetStore`]: PostgreSQL via a shared `PgPool`
//! - [`InMemoryAccountStore`] / [`InMemoryDatasetStore`]: process-local maps, used for
//!   development and the HTTP test suite
//!
//! Multi-row writes (a charge, a sentence plus its breakdown) are all-or-nothing in both.

pub mod accounts;
pub mod memory;
pub mod repository;
pub mod sentences;

pub use accounts::PgAccountStore;
pub use memory::{InMemoryAccountStore, InMemoryDatasetStore};
pub use repository::{AccountStore, DatasetStore};
pub use sentences::PgDatasetStore;
