use std::collections::HashMap;

use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, JoinType, Order, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};

use crate::entities::{pizza, pizza_review, pizza_review_score};
use crate::error::AppError;
use crate::models::review::{MAX_SCORE, MIN_SCORE};
use crate::models::views::LeaderboardEntry;
use crate::services::store::Store;

#[derive(Debug, FromQueryResult)]
struct PizzaAverage {
    pizza_id: i32,
    average_score: f64,
}

impl Store {
    /// Pizzas ranked by the mean of their review scores, best first.
    ///
    /// Unreviewed pizzas never appear, and sentinel scores are left out of the
    /// mean so a review that could not be performed does not rank. Equal means
    /// are ordered by pizza id.
    pub async fn top_pizzas_by_average_score(
        &self,
        limit: u64,
    ) -> Result<Vec<LeaderboardEntry>, AppError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let average: SimpleExpr = Func::avg(Expr::col((
            pizza_review_score::Entity,
            pizza_review_score::Column::Score,
        )))
        .into();

        let ranked = pizza::Entity::find()
            .select_only()
            .column_as(pizza::Column::Id, "pizza_id")
            .expr_as(average.clone(), "average_score")
            .join(JoinType::InnerJoin, pizza::Relation::PizzaReview.def())
            .join(JoinType::InnerJoin, pizza_review::Relation::PizzaReviewScore.def())
            .filter(pizza_review_score::Column::Score.between(MIN_SCORE, MAX_SCORE))
            .group_by(pizza::Column::Id)
            .order_by(average, Order::Desc)
            .order_by_asc(pizza::Column::Id)
            .limit(limit)
            .into_model::<PizzaAverage>()
            .all(self.connection())
            .await?;

        let ids: Vec<i32> = ranked.iter().map(|r| r.pizza_id).collect();
        let pizzas = pizza::Entity::find()
            .filter(pizza::Column::Id.is_in(ids))
            .all(self.connection())
            .await?;
        let mut by_id: HashMap<i32, _> = self
            .hydrate_pizzas(pizzas)
            .await?
            .into_iter()
            .map(|view| (view.id, view))
            .collect();

        Ok(ranked
            .into_iter()
            .filter_map(|row| {
                by_id
                    .remove(&row.pizza_id)
                    .map(|pizza| (row.average_score, pizza))
            })
            .enumerate()
            .map(|(index, (average_score, pizza))| LeaderboardEntry {
                rank: index + 1,
                average_score,
                pizza,
            })
            .collect())
    }
}
