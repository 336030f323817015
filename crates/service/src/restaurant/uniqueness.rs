//! Duplicate guard on the (name, city) key.
//!
//! Matching is exact on both fields, including case. The guard and the save
//! that follows are separate calls; stores backed by a unique index close the
//! window between them.

use tracing::debug;

use crate::errors::ServiceError;

use super::domain::Restaurant;
use super::repository::RestaurantRepository;

pub async fn ensure_unique<R>(repo: &R, candidate: &Restaurant) -> Result<(), ServiceError>
where
    R: RestaurantRepository + ?Sized,
{
    match repo.find_by_name_and_city(&candidate.name, &candidate.city).await? {
        Some(existing) => {
            debug!(existing_id = ?existing.id, name = %candidate.name, city = %candidate.city, "restaurant exists");
            Err(ServiceError::duplicate(&candidate.name, &candidate.city))
        }
        None => Ok(()),
    }
}
