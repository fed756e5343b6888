pub mod review;
pub mod views;
