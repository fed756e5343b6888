use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PizzaImages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PizzaImages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PizzaImages::PizzaId).integer().not_null())
                    .col(ColumnDef::new(PizzaImages::ImagePath).string_len(500).not_null())
                    .col(ColumnDef::new(PizzaImages::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pizza_images_pizza_id")
                            .from(PizzaImages::Table, PizzaImages::PizzaId)
                            .to(Pizzas::Table, Pizzas::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_pizza_images_pizza_id")
                    .table(PizzaImages::Table)
                    .col(PizzaImages::PizzaId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PizzaImages::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PizzaImages {
    Table,
    Id,
    PizzaId,
    ImagePath,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Pizzas {
    Table,
    Id,
}
