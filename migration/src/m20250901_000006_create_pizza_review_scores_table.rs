use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PizzaReviewScores::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PizzaReviewScores::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PizzaReviewScores::PizzaReviewId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PizzaReviewScores::CategoryId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PizzaReviewScores::Score).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pizza_review_scores_review_id")
                            .from(PizzaReviewScores::Table, PizzaReviewScores::PizzaReviewId)
                            .to(PizzaReviews::Table, PizzaReviews::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pizza_review_scores_category_id")
                            .from(PizzaReviewScores::Table, PizzaReviewScores::CategoryId)
                            .to(ReviewCategories::Table, ReviewCategories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_pizza_review_scores_review_category")
                    .table(PizzaReviewScores::Table)
                    .col(PizzaReviewScores::PizzaReviewId)
                    .col(PizzaReviewScores::CategoryId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PizzaReviewScores::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PizzaReviewScores {
    Table,
    Id,
    PizzaReviewId,
    CategoryId,
    Score,
}

#[derive(DeriveIden)]
enum PizzaReviews {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum ReviewCategories {
    Table,
    Id,
}
