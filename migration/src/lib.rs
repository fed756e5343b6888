pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_chefs_table;
mod m20250901_000002_create_pizzas_table;
mod m20250901_000003_create_pizza_images_table;
mod m20250901_000004_create_review_categories_table;
mod m20250901_000005_create_pizza_reviews_table;
mod m20250901_000006_create_pizza_review_scores_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_chefs_table::Migration),
            Box::new(m20250901_000002_create_pizzas_table::Migration),
            Box::new(m20250901_000003_create_pizza_images_table::Migration),
            Box::new(m20250901_000004_create_review_categories_table::Migration),
            Box::new(m20250901_000005_create_pizza_reviews_table::Migration),
            Box::new(m20250901_000006_create_pizza_review_scores_table::Migration),
        ]
    }
}
