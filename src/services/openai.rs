use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::error::AppError;
use crate::services::ai::{AiProvider, ReviewRequest};
use crate::utils::image_processor;

const REVIEW_SCHEMA_NAME: &str = "PizzaReview";

/// OpenAI-compatible image edit and chat completion client.
pub struct OpenAiProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    image_model: String,
    review_model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Value>,
    response_format: Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    b64_json: Option<String>,
}

impl OpenAiProvider {
    pub fn new(
        base_url: &Url,
        api_key: Option<String>,
        image_model: impl Into<String>,
        review_model: impl Into<String>,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Provider(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            image_model: image_model.into(),
            review_model: review_model.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(
            &config.openai_base_url,
            config.openai_api_key.clone(),
            config.image_model.clone(),
            config.review_model.clone(),
        )
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, AppError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Provider("OPENAI_API_KEY is not set".to_string()))?;
        Ok(request.bearer_auth(key))
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response, AppError> {
        let response = self
            .authorize(request)?
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("{} request failed: {}", what, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!(
                "{} returned {}: {}",
                what,
                status,
                truncate(&body, 300)
            )));
        }
        Ok(response)
    }

    fn chat_request(&self, request: &ReviewRequest) -> ChatRequest<'_> {
        let mut user_content = vec![json!({ "type": "text", "text": request.user_prompt })];
        user_content.extend(request.images.iter().map(|bytes| {
            let data_url = format!(
                "data:{};base64,{}",
                image_processor::mime_type(bytes),
                BASE64.encode(bytes)
            );
            json!({ "type": "image_url", "image_url": { "url": data_url } })
        }));

        ChatRequest {
            model: &self.review_model,
            messages: vec![
                json!({ "role": "system", "content": request.system_prompt }),
                json!({ "role": "user", "content": user_content }),
            ],
            response_format: json!({
                "type": "json_schema",
                "json_schema": {
                    "name": REVIEW_SCHEMA_NAME,
                    "schema": request.schema,
                    "strict": true
                }
            }),
        }
    }
}

/// Labels the reference upload with its sniffed type.
fn reference_part(image: Vec<u8>) -> Result<Part, AppError> {
    let mime = image_processor::mime_type(&image);
    let extension = match mime {
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "jpg",
    };
    Part::bytes(image)
        .file_name(format!("reference.{}", extension))
        .mime_str(mime)
        .map_err(|e| AppError::Provider(e.to_string()))
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[async_trait]
impl AiProvider for OpenAiProvider {
    async fn edit_image(
        &self,
        image: Vec<u8>,
        prompt: &str,
        size: &str,
    ) -> Result<Vec<u8>, AppError> {
        let part = reference_part(image)?;
        let form = Form::new()
            .text("model", self.image_model.clone())
            .text("prompt", prompt.to_string())
            .text("size", size.to_string())
            .text("n", "1")
            .part("image", part);

        debug!(model = %self.image_model, size, "Requesting image edit");
        let response = self
            .send(
                self.client.post(self.endpoint("images/edits")).multipart(form),
                "Image edit",
            )
            .await?;

        let body: ImageResponse = response
            .json()
            .await
            .map_err(|e| AppError::MalformedResponse(format!("image response: {}", e)))?;
        let encoded = body
            .data
            .into_iter()
            .next()
            .and_then(|d| d.b64_json)
            .ok_or_else(|| AppError::MalformedResponse("image response had no data".to_string()))?;

        BASE64
            .decode(encoded)
            .map_err(|e| AppError::MalformedResponse(format!("image payload: {}", e)))
    }

    async fn structured_completion(&self, request: ReviewRequest) -> Result<String, AppError> {
        debug!(
            model = %self.review_model,
            images = request.images.len(),
            "Requesting structured review"
        );
        let body = self.chat_request(&request);
        let response = self
            .send(
                self.client.post(self.endpoint("chat/completions")).json(&body),
                "Chat completion",
            )
            .await?;

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::MalformedResponse(format!("chat response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AppError::MalformedResponse("chat response had no content".to_string()))
    }
}
