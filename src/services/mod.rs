pub mod ai;
pub mod blob;
pub mod jobs;
pub mod leaderboard;
pub mod openai;
pub mod prompts;
pub mod store;
pub mod worker;
