use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::ServiceError;

use super::domain::{Restaurant, RestaurantId};

/// Persistence collaborator for restaurants.
///
/// Implementations own identity issuing: `save` assigns an id when the
/// restaurant has none and updates the stored row otherwise. A store that
/// can enforce the (name, city) uniqueness itself must report a violation
/// as [`ServiceError::DuplicateEntity`].
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    async fn find_by_id(&self, id: RestaurantId) -> Result<Option<Restaurant>, ServiceError>;
    /// Every restaurant, ordered by id.
    async fn find_all(&self) -> Result<Vec<Restaurant>, ServiceError>;
    async fn find_all_by_city_ignore_case(&self, city: &str) -> Result<Vec<Restaurant>, ServiceError>;
    /// Highest rating first; equal ratings keep id order.
    async fn find_all_order_by_average_rating_desc(&self) -> Result<Vec<Restaurant>, ServiceError>;
    /// Exact match on both fields.
    async fn find_by_name_and_city(&self, name: &str, city: &str) -> Result<Option<Restaurant>, ServiceError>;
    async fn save(&self, restaurant: Restaurant) -> Result<Restaurant, ServiceError>;
    /// Read, merge and write back in one unit: only the given rating and
    /// votes change, every other column keeps its stored value. `None` when
    /// no restaurant has `id`.
    async fn merge_rating_and_votes(
        &self,
        id: RestaurantId,
        average_rating: Option<Decimal>,
        votes: Option<i32>,
    ) -> Result<Option<Restaurant>, ServiceError>;
    async fn delete(&self, restaurant: &Restaurant) -> Result<(), ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
    use std::sync::{Mutex, MutexGuard, PoisonError};

    #[derive(Default)]
    pub struct MockRestaurantRepository {
        rows: Mutex<BTreeMap<RestaurantId, Restaurant>>, // key: id
        last_id: AtomicI64,
        saves: AtomicUsize,
        failure: Mutex<Option<String>>,
    }

    impl MockRestaurantRepository {
        fn rows(&self) -> MutexGuard<'_, BTreeMap<RestaurantId, Restaurant>> {
            self.rows.lock().unwrap_or_else(PoisonError::into_inner)
        }

        fn check_failure(&self) -> Result<(), ServiceError> {
            match self.failure.lock().unwrap_or_else(PoisonError::into_inner).as_ref() {
                Some(msg) => Err(ServiceError::Db(msg.clone())),
                None => Ok(()),
            }
        }

        /// Make every subsequent call fail with a database error.
        pub fn fail_with(&self, message: &str) {
            *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = Some(message.to_string());
        }

        /// Number of `save` calls that reached the store.
        pub fn save_count(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }

        pub fn len(&self) -> usize {
            self.rows().len()
        }

        pub fn is_empty(&self) -> bool {
            self.rows().is_empty()
        }
    }

    #[async_trait]
    impl RestaurantRepository for MockRestaurantRepository {
        async fn find_by_id(&self, id: RestaurantId) -> Result<Option<Restaurant>, ServiceError> {
            self.check_failure()?;
            Ok(self.rows().get(&id).cloned())
        }

        async fn find_all(&self) -> Result<Vec<Restaurant>, ServiceError> {
            self.check_failure()?;
            Ok(self.rows().values().cloned().collect())
        }

        async fn find_all_by_city_ignore_case(&self, city: &str) -> Result<Vec<Restaurant>, ServiceError> {
            self.check_failure()?;
            let wanted = city.to_lowercase();
            Ok(self.rows().values().filter(|r| r.city.to_lowercase() == wanted).cloned().collect())
        }

        async fn find_all_order_by_average_rating_desc(&self) -> Result<Vec<Restaurant>, ServiceError> {
            self.check_failure()?;
            let mut all: Vec<Restaurant> = self.rows().values().cloned().collect();
            // stable sort keeps id order among equal ratings
            all.sort_by(|a, b| b.average_rating.cmp(&a.average_rating));
            Ok(all)
        }

        async fn find_by_name_and_city(&self, name: &str, city: &str) -> Result<Option<Restaurant>, ServiceError> {
            self.check_failure()?;
            Ok(self.rows().values().find(|r| r.name == name && r.city == city).cloned())
        }

        async fn save(&self, mut restaurant: Restaurant) -> Result<Restaurant, ServiceError> {
            self.check_failure()?;
            self.saves.fetch_add(1, Ordering::SeqCst);
            let mut rows = self.rows();
            let clash = rows.values().any(|r| {
                r.id != restaurant.id && r.name == restaurant.name && r.city == restaurant.city
            });
            if clash {
                return Err(ServiceError::duplicate(&restaurant.name, &restaurant.city));
            }
            let id = match restaurant.id {
                Some(id) if rows.contains_key(&id) => id,
                Some(id) => return Err(ServiceError::not_found(id)),
                None => self.last_id.fetch_add(1, Ordering::SeqCst) + 1,
            };
            restaurant.id = Some(id);
            rows.insert(id, restaurant.clone());
            Ok(restaurant)
        }

        async fn merge_rating_and_votes(
            &self,
            id: RestaurantId,
            average_rating: Option<Decimal>,
            votes: Option<i32>,
        ) -> Result<Option<Restaurant>, ServiceError> {
            self.check_failure()?;
            let mut rows = self.rows();
            let Some(row) = rows.get_mut(&id) else { return Ok(None) };
            if let Some(rating) = average_rating {
                row.average_rating = rating;
            }
            if let Some(votes) = votes {
                row.votes = votes;
            }
            Ok(Some(row.clone()))
        }

        async fn delete(&self, restaurant: &Restaurant) -> Result<(), ServiceError> {
            self.check_failure()?;
            let id = restaurant.id.ok_or_else(|| ServiceError::NotFound("restaurant has no id".into()))?;
            match self.rows().remove(&id) {
                Some(_) => Ok(()),
                None => Err(ServiceError::not_found(id)),
            }
        }
    }
}
