//! Fleet domain entities

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Operational status of a physical jetski
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JetskiStatus {
    /// Ready to be handed out
    Available,
    /// Currently out on a rental
    Rented,
    /// Under maintenance, not bookable
    Maintenance,
}

impl JetskiStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Rented => "Rented",
            Self::Maintenance => "Maintenance",
        }
    }

    /// Unknown values are treated as not bookable.
    pub fn from_str(s: &str) -> Self {
        match s {
            "Available" => Self::Available,
            "Rented" => Self::Rented,
            _ => Self::Maintenance,
        }
    }
}

impl std::fmt::Display for JetskiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Jetski model: the unit reservations are made against.
#[derive(Debug, Clone, PartialEq)]
pub struct JetskiModel {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub active: bool,
    /// Price per hour of billable usage
    pub hourly_price: Decimal,
    /// Free minutes subtracted from usage before billing
    pub tolerance_minutes: i64,
    pub created_at: DateTime<Utc>,
}

impl JetskiModel {
    pub fn new(
        tenant_id: Uuid,
        name: impl Into<String>,
        hourly_price: Decimal,
        tolerance_minutes: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            name: name.into(),
            active: true,
            hourly_price,
            tolerance_minutes,
            created_at: Utc::now(),
        }
    }
}

/// A physical jetski belonging to a model.
#[derive(Debug, Clone, PartialEq)]
pub struct Jetski {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub model_id: Uuid,
    /// Hull code painted on the craft
    pub code: String,
    pub active: bool,
    pub status: JetskiStatus,
    pub created_at: DateTime<Utc>,
}

impl Jetski {
    pub fn new(tenant_id: Uuid, model_id: Uuid, code: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            model_id,
            code: code.into(),
            active: true,
            status: JetskiStatus::Available,
            created_at: Utc::now(),
        }
    }

    /// Counts toward model capacity.
    pub fn is_bookable(&self) -> bool {
        self.active && self.status == JetskiStatus::Available
    }
}
