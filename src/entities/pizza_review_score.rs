use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "pizza_review_scores")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub pizza_review_id: i32,
    pub category_id: i32,
    pub score: i32, // 1-5, or 0 when no image could be reviewed
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pizza_review::Entity",
        from = "Column::PizzaReviewId",
        to = "super::pizza_review::Column::Id",
        on_delete = "Cascade"
    )]
    PizzaReview,
    #[sea_orm(
        belongs_to = "super::review_category::Entity",
        from = "Column::CategoryId",
        to = "super::review_category::Column::Id",
        on_delete = "Cascade"
    )]
    ReviewCategory,
}

impl Related<super::pizza_review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PizzaReview.def()
    }
}

impl Related<super::review_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReviewCategory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
