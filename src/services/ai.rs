use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::error::AppError;
use crate::models::review::{ReviewDraft, MAX_SCORE, MIN_SCORE};
use crate::services::blob::BlobStore;
use crate::services::prompts::Prompts;
use crate::services::store::Store;
use crate::utils::image_processor;

/// Output size requested for generated chef portraits.
pub const PORTRAIT_SIZE: &str = "1024x1024";

/// A structured review call: instructions, photos and the JSON schema the
/// answer must follow.
#[derive(Debug, Clone)]
pub struct ReviewRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub images: Vec<Vec<u8>>,
    pub schema: Value,
}

/// The remote multimodal service, treated as a black box.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Generates one image from a reference image and an instruction.
    async fn edit_image(&self, image: Vec<u8>, prompt: &str, size: &str)
        -> Result<Vec<u8>, AppError>;

    /// Returns the raw JSON text produced for `request`.
    async fn structured_completion(&self, request: ReviewRequest) -> Result<String, AppError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(2),
        }
    }
}

/// Portrait generation and pizza review on top of an [`AiProvider`].
#[derive(Clone)]
pub struct AiGateway {
    provider: Arc<dyn AiProvider>,
    blobs: Arc<dyn BlobStore>,
    store: Store,
    prompts: Arc<Prompts>,
    retry: RetryPolicy,
}

impl AiGateway {
    pub fn new(
        provider: Arc<dyn AiProvider>,
        blobs: Arc<dyn BlobStore>,
        store: Store,
        prompts: Arc<Prompts>,
    ) -> Self {
        Self {
            provider,
            blobs,
            store,
            prompts,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Produces a stylized chef portrait from a reference photo.
    ///
    /// The photo is normalized first (falling back to the raw bytes), then the
    /// provider is tried up to `max_attempts` times with doubling delays.
    pub async fn generate_chef_image(&self, reference: &[u8]) -> Result<Vec<u8>, AppError> {
        let owned = reference.to_vec();
        let input = match tokio::task::spawn_blocking(move || {
            image_processor::normalize_or_original(&owned)
        })
        .await
        {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "Image normalization task failed, sending original bytes");
                reference.to_vec()
            }
        };

        let max_attempts = self.retry.max_attempts.max(1);
        let mut delay = self.retry.initial_delay;
        let mut attempt = 1;

        loop {
            match self
                .provider
                .edit_image(input.clone(), self.prompts.chef_image(), PORTRAIT_SIZE)
                .await
            {
                Ok(image) => return Ok(image),
                Err(e) if attempt >= max_attempts => {
                    error!(attempt, error = %e, "Chef image generation failed, giving up");
                    return Err(AppError::Generation(format!(
                        "gave up after {} attempts: {}",
                        attempt, e
                    )));
                }
                Err(e) => {
                    warn!(attempt, error = %e, retry_in = ?delay, "Chef image generation attempt failed");
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
            }
        }
    }

    /// Reviews the photos of one pizza. Unreadable photos are skipped; with no
    /// readable photo at all the placeholder review is returned without a
    /// remote call.
    pub async fn review_pizza_images(
        &self,
        image_paths: &[String],
        chef_name: &str,
    ) -> Result<ReviewDraft, AppError> {
        let categories: Vec<String> = self
            .store
            .list_review_categories()
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect();

        let mut images = Vec::with_capacity(image_paths.len());
        for path in image_paths {
            match self.blobs.read_bytes(path).await {
                Ok(bytes) => images.push(bytes),
                Err(e) => warn!(path = %path, error = %e, "Could not read pizza image, skipping"),
            }
        }

        if images.is_empty() {
            info!(chef = chef_name, "No readable images, returning placeholder review");
            return Ok(ReviewDraft::placeholder(categories));
        }

        let request = ReviewRequest {
            system_prompt: self.prompts.review_system(chef_name),
            user_prompt: Prompts::review_user(chef_name),
            images,
            schema: review_schema(&categories),
        };

        let raw = self.provider.structured_completion(request).await?;
        parse_review(&raw, &categories)
    }
}

/// JSON schema for a review: a summary plus one required 1-5 integer per category.
pub fn review_schema(categories: &[String]) -> Value {
    let properties: serde_json::Map<String, Value> = categories
        .iter()
        .map(|name| {
            (
                name.clone(),
                json!({ "type": "integer", "minimum": MIN_SCORE, "maximum": MAX_SCORE }),
            )
        })
        .collect();

    json!({
        "type": "object",
        "properties": {
            "review_summary": { "type": "string" },
            "scores": {
                "type": "object",
                "properties": properties,
                "required": categories,
                "additionalProperties": false
            }
        },
        "required": ["review_summary", "scores"],
        "additionalProperties": false
    })
}

#[derive(Deserialize)]
struct RawReview {
    review_summary: String,
    scores: BTreeMap<String, i32>,
}

/// Parses provider output, requiring a score in range for every known category.
pub fn parse_review(raw: &str, categories: &[String]) -> Result<ReviewDraft, AppError> {
    let parsed: RawReview =
        serde_json::from_str(raw).map_err(|e| AppError::MalformedResponse(e.to_string()))?;

    for name in categories {
        match parsed.scores.get(name) {
            None => {
                return Err(AppError::MalformedResponse(format!(
                    "missing score for '{}'",
                    name
                )))
            }
            Some(score) if !(MIN_SCORE..=MAX_SCORE).contains(score) => {
                return Err(AppError::MalformedResponse(format!(
                    "score {} for '{}' is outside {}-{}",
                    score, name, MIN_SCORE, MAX_SCORE
                )))
            }
            Some(_) => {}
        }
    }

    Ok(ReviewDraft {
        review_summary: parsed.review_summary,
        scores: parsed.scores,
    })
}
