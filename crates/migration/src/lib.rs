//! Migrator registering the restaurant schema.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_restaurant;
mod m20240601_000002_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_restaurant::Migration),
            // Indexes should always be applied last
            Box::new(m20240601_000002_add_indexes::Migration),
        ]
    }
}
