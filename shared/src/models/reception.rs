//! Reception Model

use super::{Product, UnknownVariant};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Reception status. The only transition is `Open -> Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReceptionStatus {
    #[serde(rename = "open", alias = "in_progress")]
    Open,
    #[serde(rename = "closed", alias = "close")]
    Closed,
}

impl ReceptionStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ReceptionStatus::Open => "open",
            ReceptionStatus::Closed => "closed",
        }
    }

    pub const fn is_open(&self) -> bool {
        matches!(self, ReceptionStatus::Open)
    }
}

impl FromStr for ReceptionStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" | "in_progress" => Ok(ReceptionStatus::Open),
            "closed" | "close" => Ok(ReceptionStatus::Closed),
            other => Err(UnknownVariant::new("reception status", other)),
        }
    }
}

impl TryFrom<String> for ReceptionStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ReceptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Goods-receiving session at a pickup point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Reception {
    pub id: Uuid,
    pub date_time: DateTime<Utc>,
    pub pvz_id: Uuid,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub status: ReceptionStatus,
}

impl Reception {
    /// A freshly opened reception for `pvz_id`
    pub fn open(pvz_id: Uuid, date_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date_time,
            pvz_id,
            status: ReceptionStatus::Open,
        }
    }
}

/// Listing entry: a reception with its products in creation order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceptionWithProducts {
    pub reception: Reception,
    pub products: Vec<Product>,
}
