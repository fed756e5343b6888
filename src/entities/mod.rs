pub mod chef;
pub mod pizza;
pub mod pizza_image;
pub mod pizza_review;
pub mod pizza_review_score;
pub mod review_category;
