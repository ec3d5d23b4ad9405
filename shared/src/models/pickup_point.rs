//! Pickup Point Model

use super::{ReceptionWithProducts, UnknownVariant};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Cities where pickup points may be registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum City {
    #[serde(rename = "Moscow", alias = "Москва")]
    Moscow,
    #[serde(rename = "Saint Petersburg", alias = "Санкт-Петербург")]
    SaintPetersburg,
    #[serde(rename = "Kazan", alias = "Казань")]
    Kazan,
}

impl City {
    pub const ALL: [City; 3] = [City::Moscow, City::SaintPetersburg, City::Kazan];

    pub const fn as_str(&self) -> &'static str {
        match self {
            City::Moscow => "Moscow",
            City::SaintPetersburg => "Saint Petersburg",
            City::Kazan => "Kazan",
        }
    }
}

impl FromStr for City {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Moscow" | "Москва" => Ok(City::Moscow),
            "Saint Petersburg" | "Санкт-Петербург" => Ok(City::SaintPetersburg),
            "Kazan" | "Казань" => Ok(City::Kazan),
            other => Err(UnknownVariant::new("city", other)),
        }
    }
}

impl TryFrom<String> for City {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pickup point entity (ПВЗ). Immutable once registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct PickupPoint {
    pub id: Uuid,
    pub registration_date: DateTime<Utc>,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub city: City,
}

/// Listing entry: a pickup point with its receptions nested newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupPointWithReceptions {
    pub pvz: PickupPoint,
    pub receptions: Vec<ReceptionWithProducts>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_accepts_both_spellings() {
        assert_eq!("Moscow".parse::<City>().unwrap(), City::Moscow);
        assert_eq!("Санкт-Петербург".parse::<City>().unwrap(), City::SaintPetersburg);
        assert_eq!("Казань".parse::<City>().unwrap(), City::Kazan);
    }

    #[test]
    fn test_city_rejects_unknown() {
        let err = "Paris".parse::<City>().unwrap_err();
        assert_eq!(err.kind, "city");
        assert_eq!(err.to_string(), "unsupported city: \"Paris\"");
    }

    #[test]
    fn test_city_serializes_canonical_name() {
        let city: City = serde_json::from_str("\"Москва\"").unwrap();
        assert_eq!(serde_json::to_string(&city).unwrap(), "\"Moscow\"");
    }

    #[test]
    fn test_pickup_point_json_shape() {
        let pvz = PickupPoint {
            id: Uuid::nil(),
            registration_date: DateTime::from_timestamp(0, 0).unwrap(),
            city: City::Kazan,
        };
        let json = serde_json::to_value(&pvz).unwrap();
        assert_eq!(json["city"], "Kazan");
        assert_eq!(json["registrationDate"], "1970-01-01T00:00:00Z");
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
    }
}
