//! Read models returned by the store's eager-loading queries and serialized by the API.

use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

use crate::entities::{chef, pizza_image, pizza_review};
use crate::models::review::{MAX_SCORE, MIN_SCORE};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ImageView {
    pub id: i32,
    pub image_path: String,
    pub created_at: NaiveDateTime,
}

impl From<pizza_image::Model> for ImageView {
    fn from(model: pizza_image::Model) -> Self {
        Self {
            id: model.id,
            image_path: model.image_path,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ScoreView {
    pub category: String,
    pub score: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ReviewView {
    pub id: i32,
    pub summary: String,
    pub created_at: NaiveDateTime,
    pub scores: Vec<ScoreView>,
    /// Mean of the valid scores; `None` when nothing could be reviewed.
    pub average_score: Option<f64>,
}

impl ReviewView {
    pub fn new(model: pizza_review::Model, scores: Vec<ScoreView>) -> Self {
        let valid: Vec<i32> = scores
            .iter()
            .map(|s| s.score)
            .filter(|s| (MIN_SCORE..=MAX_SCORE).contains(s))
            .collect();
        let average_score = if valid.is_empty() {
            None
        } else {
            Some(valid.iter().sum::<i32>() as f64 / valid.len() as f64)
        };

        Self {
            id: model.id,
            summary: model.review_summary,
            created_at: model.created_at,
            scores,
            average_score,
        }
    }

    pub fn score_for(&self, category: &str) -> Option<i32> {
        self.scores
            .iter()
            .find(|s| s.category == category)
            .map(|s| s.score)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PizzaView {
    pub id: i32,
    pub chef_id: i32,
    pub chef_name: String,
    pub created_at: NaiveDateTime,
    pub images: Vec<ImageView>,
    pub review: Option<ReviewView>,
    /// True until the background review has been recorded.
    pub review_pending: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChefView {
    pub id: i32,
    pub name: String,
    pub image_path: Option<String>,
    pub created_at: NaiveDateTime,
    pub pizza_count: usize,
    pub pizzas: Vec<PizzaView>,
}

impl ChefView {
    pub fn new(model: chef::Model, pizzas: Vec<PizzaView>) -> Self {
        Self {
            id: model.id,
            name: model.name,
            image_path: model.image_path,
            created_at: model.created_at,
            pizza_count: pizzas.len(),
            pizzas,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub average_score: f64,
    pub pizza: PizzaView,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CategoryView {
    pub id: i32,
    pub name: String,
}
