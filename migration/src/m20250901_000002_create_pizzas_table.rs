use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Pizzas::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Pizzas::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Pizzas::ChefId).integer().not_null())
                    .col(ColumnDef::new(Pizzas::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pizzas_chef_id")
                            .from(Pizzas::Table, Pizzas::ChefId)
                            .to(Chefs::Table, Chefs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_pizzas_chef_id")
                    .table(Pizzas::Table)
                    .col(Pizzas::ChefId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Pizzas::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Pizzas {
    Table,
    Id,
    ChefId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Chefs {
    Table,
    Id,
}
