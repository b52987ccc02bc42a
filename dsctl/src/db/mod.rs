//! Persistence layer.
//!
//! ```text
//! ┌──────────────────┐
//! │  API handlers /  │
//! │ AccessController │
//! └────────┬─────────┘
//!          │ Arc<dyn AccountStore>, Arc<dyn DatasetStore>
//!          ↓
//! ┌──────────────────┐
//! │  db::handlers    │  (Postgres or in-memory stores)
//! └────────┬─────────┘
//!          ↓
//! ┌──────────────────┐
//! │   db::models     │  (store requests and responses)
//! └──────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`handlers`]: Store traits and their implementations
//! - [`models`]: Records passed into and out of the stores
//! - [`errors`]: Store error type
//!
//! # Migrations
//!
//! Migrations live in `migrations/` and are embedded by [`crate::migrator`]:
//!
//! ```ignore
//! dsctl::migrator().run(&pool).await?;
//! ```

pub mod errors;
pub mod handlers;
pub mod models;

use crate::config::PoolSettings;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;

/// Open a connection pool with the configured limits.
pub async fn connect(url: &str, settings: &PoolSettings) -> Result<PgPool, sqlx::Error> {
    let mut options = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs));

    // 0 disables the timeout
    options = options.idle_timeout((settings.idle_timeout_secs > 0).then(|| Duration::from_secs(settings.idle_timeout_secs)));
    options = options.max_lifetime((settings.max_lifetime_secs > 0).then(|| Duration::from_secs(settings.max_lifetime_secs)));

    options.connect(url).await
}
