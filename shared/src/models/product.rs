//! Product Model

use super::UnknownVariant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Product categories accepted at reception
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    #[serde(rename = "electronics", alias = "электроника")]
    Electronics,
    #[serde(rename = "clothes", alias = "одежда")]
    Clothes,
    #[serde(rename = "shoes", alias = "обувь")]
    Shoes,
}

impl ProductType {
    pub const ALL: [ProductType; 3] = [
        ProductType::Electronics,
        ProductType::Clothes,
        ProductType::Shoes,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ProductType::Electronics => "electronics",
            ProductType::Clothes => "clothes",
            ProductType::Shoes => "shoes",
        }
    }
}

impl FromStr for ProductType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "electronics" | "электроника" => Ok(ProductType::Electronics),
            "clothes" | "одежда" => Ok(ProductType::Clothes),
            "shoes" | "обувь" => Ok(ProductType::Shoes),
            other => Err(UnknownVariant::new("product type", other)),
        }
    }
}

impl TryFrom<String> for ProductType {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product received within a reception
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub date_time: DateTime<Utc>,
    #[serde(rename = "type")]
    #[cfg_attr(feature = "db", sqlx(rename = "type", try_from = "String"))]
    pub product_type: ProductType,
    pub reception_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_type_parse() {
        assert_eq!("electronics".parse::<ProductType>().unwrap(), ProductType::Electronics);
        assert_eq!("обувь".parse::<ProductType>().unwrap(), ProductType::Shoes);
        let err = "furniture".parse::<ProductType>().unwrap_err();
        assert_eq!(err.kind, "product type");
    }

    #[test]
    fn test_product_json_uses_type_key() {
        let product = Product {
            id: Uuid::nil(),
            date_time: DateTime::from_timestamp(0, 0).unwrap(),
            product_type: ProductType::Clothes,
            reception_id: Uuid::nil(),
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["type"], "clothes");
        assert!(json.get("receptionId").is_some());
    }
}
