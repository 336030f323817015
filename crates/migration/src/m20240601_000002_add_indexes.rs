use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Restaurant: composite unique (name, city); backs the duplicate guard
        manager
            .create_index(
                Index::create()
                    .name("uniq_restaurant_name_city")
                    .table(Restaurant::Table)
                    .col(Restaurant::Name)
                    .col(Restaurant::City)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_restaurant_city")
                    .table(Restaurant::Table)
                    .col(Restaurant::City)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_restaurant_average_rating")
                    .table(Restaurant::Table)
                    .col(Restaurant::AverageRating)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uniq_restaurant_name_city").table(Restaurant::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_restaurant_city").table(Restaurant::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_restaurant_average_rating").table(Restaurant::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Restaurant { Table, Name, City, AverageRating }
