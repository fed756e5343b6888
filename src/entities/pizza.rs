use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "pizzas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub chef_id: i32,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::chef::Entity",
        from = "Column::ChefId",
        to = "super::chef::Column::Id",
        on_delete = "Cascade"
    )]
    Chef,
    #[sea_orm(has_many = "super::pizza_image::Entity")]
    PizzaImage,
    #[sea_orm(has_one = "super::pizza_review::Entity")]
    PizzaReview,
}

impl Related<super::chef::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Chef.def()
    }
}

impl Related<super::pizza_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PizzaImage.def()
    }
}

impl Related<super::pizza_review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PizzaReview.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
