use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "pizza_reviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub pizza_id: i32,
    pub review_summary: String,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pizza::Entity",
        from = "Column::PizzaId",
        to = "super::pizza::Column::Id",
        on_delete = "Cascade"
    )]
    Pizza,
    #[sea_orm(has_many = "super::pizza_review_score::Entity")]
    PizzaReviewScore,
}

impl Related<super::pizza::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pizza.def()
    }
}

impl Related<super::pizza_review_score::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PizzaReviewScore.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
