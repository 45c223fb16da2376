//! Region/shard locations.

use serde::{Deserialize, Serialize};

/// A region/shard pair the game API is partitioned by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub region: String,
    pub shard: String,
}

impl Location {
    pub fn new(region: impl Into<String>, shard: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            shard: shard.into(),
        }
    }

    pub fn europe() -> Self {
        Self::new("eu", "eu")
    }

    pub fn north_america() -> Self {
        Self::new("na", "na")
    }

    pub fn latin_america() -> Self {
        Self::new("latam", "na")
    }

    pub fn brazil() -> Self {
        Self::new("br", "na")
    }

    pub fn korea() -> Self {
        Self::new("kr", "kr")
    }

    pub fn asia_pacific() -> Self {
        Self::new("ap", "ap")
    }

    pub fn pbe() -> Self {
        Self::new("na", "pbe")
    }

    /// All known locations.
    pub fn all() -> Vec<Self> {
        vec![
            Self::europe(),
            Self::north_america(),
            Self::latin_america(),
            Self::brazil(),
            Self::korea(),
            Self::asia_pacific(),
            Self::pbe(),
        ]
    }

    /// Look up the location for a region reported by the affinity endpoint.
    pub fn for_region(region: &str) -> Option<Self> {
        Self::all().into_iter().find(|l| l.region == region)
    }
}
