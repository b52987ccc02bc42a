//! Dialect classification by indicator particles.
//!
//! The text is lowercased and each indicator is tested with plain substring containment, so
//! `"la"` also hits inside `"lacag"`. The list with the most distinct hits wins; ties resolve
//! Northern, then Southern, then Central.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use super::round1;

/// Northern indicator particles.
pub const NORTHERN_INDICATORS: &[&str] = &["waa", "baa", "ayaa", "oo", "iyo"];

/// Southern indicator particles.
pub const SOUTHERN_INDICATORS: &[&str] = &["ka", "ku", "la", "ah", "uu"];

/// Central indicator particles.
pub const CENTRAL_INDICATORS: &[&str] = &["si", "ugu", "kala", "soo", "aan"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Dialect {
    #[serde(rename = "Northern Somali")]
    Northern,
    #[serde(rename = "Southern Somali")]
    Southern,
    #[serde(rename = "Central Somali")]
    Central,
    Unknown,
}

impl Dialect {
    /// Label stored alongside sentences and returned to clients.
    pub fn label(&self) -> &'static str {
        match self {
            Dialect::Northern => "Northern Somali",
            Dialect::Southern => "Southern Somali",
            Dialect::Central => "Central Somali",
            Dialect::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Winning dialect and its share of all indicator hits, as a percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DialectDetection {
    pub dialect: Dialect,
    pub confidence: f64,
}

fn hits(lowered: &str, indicators: &[&str]) -> usize {
    indicators.iter().filter(|word| lowered.contains(*word)).count()
}

/// Classify `text` against the three indicator lists.
pub fn dialect(text: &str) -> DialectDetection {
    let lowered = text.to_lowercase();
    let northern = hits(&lowered, NORTHERN_INDICATORS);
    let southern = hits(&lowered, SOUTHERN_INDICATORS);
    let central = hits(&lowered, CENTRAL_INDICATORS);

    let total = northern + southern + central;
    if total == 0 {
        return DialectDetection {
            dialect: Dialect::Unknown,
            confidence: 0.0,
        };
    }

    let (dialect, count) = if northern >= southern && northern >= central {
        (Dialect::Northern, northern)
    } else if southern >= central {
        (Dialect::Southern, southern)
    } else {
        (Dialect::Central, central)
    };

    DialectDetection {
        dialect,
        confidence: round1(count as f64 / total as f64 * 100.0),
    }
}
