use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PizzaReviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PizzaReviews::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    // One review per pizza.
                    .col(
                        ColumnDef::new(PizzaReviews::PizzaId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PizzaReviews::ReviewSummary)
                            .string_len(1000)
                            .not_null(),
                    )
                    .col(ColumnDef::new(PizzaReviews::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pizza_reviews_pizza_id")
                            .from(PizzaReviews::Table, PizzaReviews::PizzaId)
                            .to(Pizzas::Table, Pizzas::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PizzaReviews::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PizzaReviews {
    Table,
    Id,
    PizzaId,
    ReviewSummary,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Pizzas {
    Table,
    Id,
}
