use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

pub type RestaurantId = i64;

/// A restaurant as the core sees it. `id` is `None` until the store has
/// persisted it and is never reassigned afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: Option<RestaurantId>,
    pub name: String,
    pub city: String,
    /// Cost for two people.
    pub estimated_cost: i32,
    pub average_rating: Decimal,
    /// Number of reviews behind `average_rating`.
    pub votes: i32,
}

/// Caller-submitted restaurant data, not yet reconciled with the store.
/// Any field may be absent; update only looks at `average_rating` and `votes`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestaurantCandidate {
    pub id: Option<RestaurantId>,
    pub name: Option<String>,
    pub city: Option<String>,
    pub estimated_cost: Option<i32>,
    pub average_rating: Option<Decimal>,
    pub votes: Option<i32>,
}

fn required_text(value: Option<String>, field: &str) -> Result<String, ServiceError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ServiceError::missing_field(field)),
    }
}

impl TryFrom<RestaurantCandidate> for Restaurant {
    type Error = ServiceError;

    fn try_from(c: RestaurantCandidate) -> Result<Self, Self::Error> {
        Ok(Restaurant {
            id: c.id,
            name: required_text(c.name, "name")?,
            city: required_text(c.city, "city")?,
            estimated_cost: c.estimated_cost.ok_or_else(|| ServiceError::missing_field("estimatedCost"))?,
            average_rating: c.average_rating.ok_or_else(|| ServiceError::missing_field("averageRating"))?,
            votes: c.votes.ok_or_else(|| ServiceError::missing_field("votes"))?,
        })
    }
}

impl From<Restaurant> for RestaurantCandidate {
    fn from(r: Restaurant) -> Self {
        RestaurantCandidate {
            id: r.id,
            name: Some(r.name),
            city: Some(r.city),
            estimated_cost: Some(r.estimated_cost),
            average_rating: Some(r.average_rating),
            votes: Some(r.votes),
        }
    }
}

impl From<models::restaurant::Model> for Restaurant {
    fn from(m: models::restaurant::Model) -> Self {
        Restaurant {
            id: Some(m.id),
            name: m.name,
            city: m.city,
            estimated_cost: m.estimated_cost,
            average_rating: m.average_rating,
            votes: m.votes,
        }
    }
}
