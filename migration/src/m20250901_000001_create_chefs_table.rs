use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Chefs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Chefs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Chefs::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Chefs::ImagePath).string_len(500))
                    .col(ColumnDef::new(Chefs::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Chefs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Chefs {
    Table,
    Id,
    Name,
    ImagePath,
    CreatedAt,
}
