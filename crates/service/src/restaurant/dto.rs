//! External (JSON) representations of a restaurant.
//!
//! Ratings travel as text so clients keep the exact decimal they sent.

use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

use super::domain::RestaurantId;

/// Full restaurant payload, used for create and for every read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RestaurantId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub estimated_cost: Option<i32>,
    #[serde(default)]
    pub average_rating: Option<String>,
    #[serde(default)]
    pub votes: Option<i32>,
}

impl RestaurantDto {
    /// Presence and non-blank checks applied before a create.
    pub fn validate_new(&self) -> Result<(), ServiceError> {
        non_blank(self.name.as_deref(), "name")?;
        non_blank(self.city.as_deref(), "city")?;
        if self.estimated_cost.is_none() {
            return Err(ServiceError::missing_field("estimatedCost"));
        }
        non_blank(self.average_rating.as_deref(), "averageRating")?;
        if self.votes.is_none() {
            return Err(ServiceError::missing_field("votes"));
        }
        Ok(())
    }
}

fn non_blank(value: Option<&str>, field: &str) -> Result<(), ServiceError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(ServiceError::missing_field(field)),
    }
}

/// Body of `PUT /restaurant/{id}`: the only fields an update may touch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantShortDto {
    #[serde(default)]
    pub average_rating: Option<String>,
    #[serde(default)]
    pub votes: Option<i32>,
}

impl RestaurantShortDto {
    pub fn into_dto(self, id: Option<RestaurantId>) -> RestaurantDto {
        RestaurantDto {
            id,
            average_rating: self.average_rating,
            votes: self.votes,
            ..RestaurantDto::default()
        }
    }
}

/// Identity of a freshly created or updated restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntityDto {
    pub id: RestaurantId,
}
