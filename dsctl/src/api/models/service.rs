//! Service banner returned at the root path.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    pub message: String,
    pub status: String,
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            message: "Somali AI Dataset API".to_string(),
            status: "active".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
