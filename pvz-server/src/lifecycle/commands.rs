//! Engine commands.
//!
//! Each command declares the role it requires and validates its raw input
//! into the typed values the engine works with. Optional fields are filled
//! with their defaults here, before anything touches a store.

use chrono::{DateTime, NaiveDate, Utc};
use shared::models::{City, ProductType, Role};
use uuid::Uuid;

use super::LifecycleError;
use crate::store::{Page, ReceptionWindow};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// An engine operation's input
pub trait Command {
    /// Used in authorization failures and logs
    const NAME: &'static str;
    /// `None` means any authenticated caller
    const REQUIRED_ROLE: Option<Role>;

    type Valid;

    fn validate(self) -> Result<Self::Valid, LifecycleError>;
}

#[derive(Debug, Clone, Default)]
pub struct CreatePickupPoint {
    pub id: Option<String>,
    pub registration_date: Option<DateTime<Utc>>,
    pub city: String,
}

/// Pickup point with every default filled in
#[derive(Debug, Clone, PartialEq)]
pub struct NewPickupPoint {
    pub id: Uuid,
    pub registration_date: DateTime<Utc>,
    pub city: City,
}

impl Command for CreatePickupPoint {
    const NAME: &'static str = "CreatePickupPoint";
    const REQUIRED_ROLE: Option<Role> = Some(Role::Moderator);

    type Valid = NewPickupPoint;

    fn validate(self) -> Result<NewPickupPoint, LifecycleError> {
        let id = match self.id {
            Some(raw) => parse_id("id", &raw)?,
            None => Uuid::new_v4(),
        };
        let city = self
            .city
            .parse()
            .map_err(|_| LifecycleError::UnsupportedCity(self.city.clone()))?;

        Ok(NewPickupPoint {
            id,
            registration_date: self.registration_date.unwrap_or_else(Utc::now),
            city,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListWithReceptions {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Command for ListWithReceptions {
    const NAME: &'static str = "ListWithReceptions";
    const REQUIRED_ROLE: Option<Role> = None;

    type Valid = (ReceptionWindow, Page);

    fn validate(self) -> Result<(ReceptionWindow, Page), LifecycleError> {
        let start = self
            .start_date
            .as_deref()
            .map(|raw| parse_bound("startDate", raw, Bound::Start))
            .transpose()?;
        let end = self
            .end_date
            .as_deref()
            .map(|raw| parse_bound("endDate", raw, Bound::End))
            .transpose()?;
        if let (Some(start), Some(end)) = (start, end)
            && start > end
        {
            return Err(LifecycleError::InvalidDateRange);
        }

        let page = Page {
            number: positive("page", self.page.unwrap_or(DEFAULT_PAGE))?,
            limit: positive("limit", self.limit.unwrap_or(DEFAULT_LIMIT))?,
        };

        Ok((ReceptionWindow { start, end }, page))
    }
}

#[derive(Debug, Clone)]
pub struct CreateReception {
    pub pvz_id: String,
}

impl Command for CreateReception {
    const NAME: &'static str = "CreateReception";
    const REQUIRED_ROLE: Option<Role> = Some(Role::Employee);

    type Valid = Uuid;

    fn validate(self) -> Result<Uuid, LifecycleError> {
        parse_id("pvzId", &self.pvz_id)
    }
}

#[derive(Debug, Clone)]
pub struct CloseLastReception {
    pub pvz_id: String,
}

impl Command for CloseLastReception {
    const NAME: &'static str = "CloseLastReception";
    const REQUIRED_ROLE: Option<Role> = Some(Role::Employee);

    type Valid = Uuid;

    fn validate(self) -> Result<Uuid, LifecycleError> {
        parse_id("pvzId", &self.pvz_id)
    }
}

#[derive(Debug, Clone)]
pub struct AddProduct {
    pub pvz_id: String,
    pub product_type: String,
}

impl Command for AddProduct {
    const NAME: &'static str = "AddProduct";
    const REQUIRED_ROLE: Option<Role> = Some(Role::Employee);

    type Valid = (Uuid, ProductType);

    fn validate(self) -> Result<(Uuid, ProductType), LifecycleError> {
        let pvz_id = parse_id("pvzId", &self.pvz_id)?;
        let product_type = self
            .product_type
            .parse()
            .map_err(|_| LifecycleError::UnsupportedProductType(self.product_type.clone()))?;
        Ok((pvz_id, product_type))
    }
}

#[derive(Debug, Clone)]
pub struct DeleteLastProduct {
    pub pvz_id: String,
}

impl Command for DeleteLastProduct {
    const NAME: &'static str = "DeleteLastProduct";
    const REQUIRED_ROLE: Option<Role> = Some(Role::Employee);

    type Valid = Uuid;

    fn validate(self) -> Result<Uuid, LifecycleError> {
        parse_id("pvzId", &self.pvz_id)
    }
}

fn parse_id(field: &'static str, raw: &str) -> Result<Uuid, LifecycleError> {
    Uuid::parse_str(raw.trim()).map_err(|_| LifecycleError::InvalidId {
        field,
        value: raw.to_string(),
    })
}

fn positive(field: &'static str, value: i64) -> Result<u32, LifecycleError> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v >= 1)
        .ok_or(LifecycleError::InvalidPagination { field, value })
}

#[derive(Clone, Copy)]
enum Bound {
    Start,
    End,
}

/// RFC 3339 timestamp, or a bare date covering the whole UTC day
fn parse_bound(field: &'static str, raw: &str, bound: Bound) -> Result<DateTime<Utc>, LifecycleError> {
    let invalid = || LifecycleError::InvalidDate {
        field,
        value: raw.to_string(),
    };

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())?;
    let at = match bound {
        Bound::Start => date.and_hms_opt(0, 0, 0),
        Bound::End => date.and_hms_micro_opt(23, 59, 59, 999_999),
    };
    at.map(|naive| naive.and_utc()).ok_or_else(invalid)
}
