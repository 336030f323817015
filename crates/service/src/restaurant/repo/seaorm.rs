use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr, TransactionTrait, Unchanged,
};

use models::restaurant::{self, Entity as RestaurantEntity};

use crate::errors::ServiceError;
use crate::restaurant::domain::{Restaurant, RestaurantId};
use crate::restaurant::repository::RestaurantRepository;

/// PostgreSQL-backed repository. Ids come from the table's identity column
/// and the `uniq_restaurant_name_city` index enforces the duplicate rule.
pub struct SeaOrmRestaurantRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmRestaurantRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn db_err(e: DbErr) -> ServiceError {
    ServiceError::Db(e.to_string())
}

fn into_domain(rows: Vec<restaurant::Model>) -> Vec<Restaurant> {
    rows.into_iter().map(Restaurant::from).collect()
}

#[async_trait::async_trait]
impl RestaurantRepository for SeaOrmRestaurantRepository {
    async fn find_by_id(&self, id: RestaurantId) -> Result<Option<Restaurant>, ServiceError> {
        let found = RestaurantEntity::find_by_id(id).one(&self.db).await.map_err(db_err)?;
        Ok(found.map(Restaurant::from))
    }

    async fn find_all(&self) -> Result<Vec<Restaurant>, ServiceError> {
        let rows = RestaurantEntity::find()
            .order_by_asc(restaurant::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(into_domain(rows))
    }

    async fn find_all_by_city_ignore_case(&self, city: &str) -> Result<Vec<Restaurant>, ServiceError> {
        let rows = RestaurantEntity::find()
            .filter(Expr::expr(Func::lower(Expr::col(restaurant::Column::City))).eq(city.to_lowercase()))
            .order_by_asc(restaurant::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(into_domain(rows))
    }

    async fn find_all_order_by_average_rating_desc(&self) -> Result<Vec<Restaurant>, ServiceError> {
        let rows = RestaurantEntity::find()
            .order_by_desc(restaurant::Column::AverageRating)
            .order_by_asc(restaurant::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(into_domain(rows))
    }

    async fn find_by_name_and_city(&self, name: &str, city: &str) -> Result<Option<Restaurant>, ServiceError> {
        let found = RestaurantEntity::find()
            .filter(restaurant::Column::Name.eq(name))
            .filter(restaurant::Column::City.eq(city))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(found.map(Restaurant::from))
    }

    async fn save(&self, r: Restaurant) -> Result<Restaurant, ServiceError> {
        let am = restaurant::ActiveModel {
            id: match r.id { Some(id) => Unchanged(id), None => NotSet },
            name: Set(r.name.clone()),
            city: Set(r.city.clone()),
            estimated_cost: Set(r.estimated_cost),
            average_rating: Set(r.average_rating),
            votes: Set(r.votes),
        };
        let result = match r.id {
            None => am.insert(&self.db).await,
            Some(_) => am.update(&self.db).await,
        };
        match result {
            Ok(model) => Ok(Restaurant::from(model)),
            Err(DbErr::RecordNotUpdated) => Err(ServiceError::not_found(r.id.unwrap_or_default())),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(ServiceError::duplicate(&r.name, &r.city)),
                _ => Err(db_err(e)),
            },
        }
    }

    async fn merge_rating_and_votes(
        &self,
        id: RestaurantId,
        average_rating: Option<Decimal>,
        votes: Option<i32>,
    ) -> Result<Option<Restaurant>, ServiceError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        // FOR UPDATE: concurrent merges on the same row queue here
        let current = RestaurantEntity::find_by_id(id).lock_exclusive().one(&txn).await.map_err(db_err)?;
        let Some(current) = current else {
            txn.rollback().await.map_err(db_err)?;
            return Ok(None);
        };

        // every column starts Unchanged, so the UPDATE only names the merged ones
        let mut am: restaurant::ActiveModel = current.clone().into();
        if let Some(rating) = average_rating {
            am.average_rating = Set(rating);
        }
        if let Some(votes) = votes {
            am.votes = Set(votes);
        }
        let merged = if am.is_changed() { am.update(&txn).await.map_err(db_err)? } else { current };
        txn.commit().await.map_err(db_err)?;
        Ok(Some(Restaurant::from(merged)))
    }

    async fn delete(&self, r: &Restaurant) -> Result<(), ServiceError> {
        let id = r.id.ok_or_else(|| ServiceError::NotFound("restaurant has no id".into()))?;
        let res = RestaurantEntity::delete_by_id(id).exec(&self.db).await.map_err(db_err)?;
        if res.rows_affected == 0 {
            return Err(ServiceError::not_found(id));
        }
        Ok(())
    }
}
