use std::sync::Arc;

use tracing::{info, instrument, trace};

use crate::errors::ServiceError;

use super::domain::{Restaurant, RestaurantCandidate, RestaurantId};
use super::repository::RestaurantRepository;
use super::uniqueness::ensure_unique;

/// Which branch of [`RestaurantService::update_or_create`] ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated(Restaurant),
    /// The id was absent or unknown, so the candidate went through create.
    Created(Restaurant),
}

impl UpdateOutcome {
    pub fn restaurant(&self) -> &Restaurant {
        match self {
            UpdateOutcome::Updated(r) | UpdateOutcome::Created(r) => r,
        }
    }

    pub fn into_inner(self) -> Restaurant {
        match self {
            UpdateOutcome::Updated(r) | UpdateOutcome::Created(r) => r,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, UpdateOutcome::Created(_))
    }
}

/// Restaurant lifecycle rules independent of web framework and storage.
pub struct RestaurantService<R: RestaurantRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: RestaurantRepository + ?Sized> RestaurantService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Persist a new restaurant after the duplicate guard passed.
    ///
    /// Any id carried by the candidate is ignored; the store assigns one.
    ///
    /// # Examples
    /// ```
    /// use service::restaurant::{RestaurantService, domain::RestaurantCandidate, repository::mock::MockRestaurantRepository};
    /// use rust_decimal::Decimal;
    /// use std::sync::Arc;
    /// let svc = RestaurantService::new(Arc::new(MockRestaurantRepository::default()));
    /// let candidate = RestaurantCandidate {
    ///     name: Some("Olive Garden".into()),
    ///     city: Some("Austin".into()),
    ///     estimated_cost: Some(30),
    ///     average_rating: Some(Decimal::new(42, 1)),
    ///     votes: Some(100),
    ///     ..Default::default()
    /// };
    /// let created = tokio_test::block_on(svc.create(candidate.clone())).unwrap();
    /// assert_eq!(created.id, Some(1));
    /// assert!(tokio_test::block_on(svc.create(candidate)).is_err());
    /// ```
    #[instrument(skip(self, candidate))]
    pub async fn create(&self, candidate: RestaurantCandidate) -> Result<Restaurant, ServiceError> {
        trace!("create");
        let mut restaurant = Restaurant::try_from(candidate)?;
        restaurant.id = None;
        ensure_unique(&*self.repo, &restaurant).await?;
        let saved = self.repo.save(restaurant).await?;
        info!(id = ?saved.id, name = %saved.name, city = %saved.city, "restaurant_created");
        Ok(saved)
    }

    pub async fn find_by_id(&self, id: RestaurantId) -> Result<Option<Restaurant>, ServiceError> {
        self.repo.find_by_id(id).await
    }

    pub async fn find_all(&self) -> Result<Vec<Restaurant>, ServiceError> {
        self.repo.find_all().await
    }

    /// Case-insensitive match on the city.
    pub async fn find_all_by_city(&self, city: &str) -> Result<Vec<Restaurant>, ServiceError> {
        self.repo.find_all_by_city_ignore_case(&city.to_lowercase()).await
    }

    pub async fn find_all_order_by_average_rating(&self) -> Result<Vec<Restaurant>, ServiceError> {
        self.repo.find_all_order_by_average_rating_desc().await
    }

    /// Merge `average_rating` and `votes` into the stored restaurant.
    ///
    /// When the candidate has no id, or its id resolves to nothing, this
    /// falls back to [`create`](Self::create) with the candidate as given and
    /// reports [`UpdateOutcome::Created`]. A partial candidate then fails the
    /// required-field check. `name`, `city` and `estimated_cost` of an
    /// existing restaurant are never changed.
    #[instrument(skip(self, candidate), fields(id = ?candidate.id))]
    pub async fn update_or_create(&self, candidate: RestaurantCandidate) -> Result<UpdateOutcome, ServiceError> {
        trace!("update_or_create");
        if let Some(id) = candidate.id {
            let merged = self.repo.merge_rating_and_votes(id, candidate.average_rating, candidate.votes).await?;
            if let Some(saved) = merged {
                info!(id, rating = %saved.average_rating, votes = saved.votes, "restaurant_updated");
                return Ok(UpdateOutcome::Updated(saved));
            }
        }
        self.create(candidate).await.map(UpdateOutcome::Created)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: RestaurantId) -> Result<(), ServiceError> {
        trace!("delete");
        let restaurant = self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found(id))?;
        self.repo.delete(&restaurant).await?;
        info!(id, "restaurant_deleted");
        Ok(())
    }
}
