use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "review_categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::pizza_review_score::Entity")]
    PizzaReviewScore,
}

impl Related<super::pizza_review_score::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PizzaReviewScore.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
