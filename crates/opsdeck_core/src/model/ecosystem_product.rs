//! Ecosystem product metrics.

use super::{Entity, EntityKind};
use serde::{Deserialize, Serialize};

closed_set! {
    ProductStatus {
        Active => "active",
        Beta => "beta",
        Deprecated => "deprecated",
        Planned => "planned",
    }
}

closed_set! {
    ProductHealth {
        Healthy => "healthy",
        Warning => "warning",
        Error => "error",
    }
}

/// Product card. `id` doubles as the URL slug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcosystemProduct {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub status: ProductStatus,
    pub health: ProductHealth,
    pub users: f64,
    /// Monthly revenue; never negative.
    pub revenue: f64,
    pub version: String,
    pub uptime: String,
    pub requests_per_day: f64,
    pub avg_response_time: String,
    pub error_rate: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl EcosystemProduct {
    /// Returns whether the product is serving users (active or beta).
    pub fn is_live(&self) -> bool {
        matches!(self.status, ProductStatus::Active | ProductStatus::Beta)
    }
}

impl Entity for EcosystemProduct {
    const KIND: EntityKind = EntityKind::EcosystemProducts;

    fn id(&self) -> &str {
        &self.id
    }
}
