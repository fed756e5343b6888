use std::path::PathBuf;

use clap::Parser;
use url::Url;

/// Runtime settings. Every flag can also come from the environment (or a `.env` file).
#[derive(Debug, Clone, Parser)]
#[command(name = "pizzatron", version, about = "AI pizza judge")]
pub struct Config {
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://pizzatron.db?mode=rwc")]
    pub database_url: String,

    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8000")]
    pub bind_addr: String,

    /// Root of the blob store, served under `/static`.
    #[arg(long, env = "STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    #[arg(long, env = "PROMPTS_DIR", default_value = "prompts")]
    pub prompts_dir: PathBuf,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    pub openai_base_url: Url,

    #[arg(long, env = "IMAGE_MODEL", default_value = "gpt-image-1")]
    pub image_model: String,

    #[arg(long, env = "REVIEW_MODEL", default_value = "gpt-5")]
    pub review_model: String,

    /// Upper bound on background tasks running at once.
    #[arg(long, env = "WORKER_CONCURRENCY", default_value_t = 4)]
    pub worker_concurrency: usize,

    #[arg(long, env = "LEADERBOARD_LIMIT", default_value_t = 10)]
    pub leaderboard_limit: u64,

    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = 20 * 1024 * 1024)]
    pub max_upload_bytes: usize,
}
