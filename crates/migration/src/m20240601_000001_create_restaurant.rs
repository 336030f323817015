//! Create `restaurant` table.
//!
//! `id` is a database-issued identity; `average_rating` is an unconstrained
//! `numeric` so ratings keep their exact scale.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Restaurant::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Restaurant::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string_len(Restaurant::Name, 255).not_null())
                    .col(string_len(Restaurant::City, 255).not_null())
                    .col(integer(Restaurant::EstimatedCost).not_null())
                    .col(decimal(Restaurant::AverageRating).not_null())
                    .col(integer(Restaurant::Votes).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Restaurant::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Restaurant {
    Table,
    Id,
    Name,
    City,
    EstimatedCost,
    AverageRating,
    Votes,
}
