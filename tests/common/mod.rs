use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tower::ServiceExt;

use pizzatron::error::AppError;
use pizzatron::models::review::DEFAULT_REVIEW_CATEGORIES;
use pizzatron::routes::create_routes;
use pizzatron::services::ai::{AiGateway, AiProvider, RetryPolicy, ReviewRequest};
use pizzatron::services::blob::LocalBlobStore;
use pizzatron::services::jobs::Judge;
use pizzatron::services::prompts::Prompts;
use pizzatron::services::store::Store;
use pizzatron::services::worker::{self, TaskQueue};
use pizzatron::state::AppState;

pub mod routes {
    pub const CHEFS: &str = "/chefs";
    pub const PIZZAS: &str = "/pizzas";
    pub const LEADERBOARD: &str = "/leaderboard";
    pub const REVIEW_CATEGORIES: &str = "/review-categories";

    pub fn chef(id: i64) -> String {
        format!("/chefs/{id}")
    }

    pub fn pizza(id: i64) -> String {
        format!("/pizzas/{id}")
    }
}

/// Provider double with canned answers.
pub struct StubProvider {
    pub image_failures: usize,
    pub review_json: String,
    pub image_calls: AtomicUsize,
    pub review_requests: Mutex<Vec<ReviewRequest>>,
}

impl StubProvider {
    /// Answers every review with `score` in every category.
    pub fn scoring(score: i32) -> Self {
        let scores: serde_json::Map<String, Value> = DEFAULT_REVIEW_CATEGORIES
            .iter()
            .map(|name| (name.to_string(), json!(score)))
            .collect();
        Self {
            image_failures: 0,
            review_json: json!({ "review_summary": "Good", "scores": scores }).to_string(),
            image_calls: AtomicUsize::new(0),
            review_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_images(mut self) -> Self {
        self.image_failures = usize::MAX;
        self
    }
}

#[async_trait]
impl AiProvider for StubProvider {
    async fn edit_image(
        &self,
        _image: Vec<u8>,
        _prompt: &str,
        _size: &str,
    ) -> Result<Vec<u8>, AppError> {
        let call = self.image_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.image_failures {
            return Err(AppError::Provider("503 Service Unavailable".into()));
        }
        Ok(b"generated portrait".to_vec())
    }

    async fn structured_completion(&self, request: ReviewRequest) -> Result<String, AppError> {
        self.review_requests.lock().unwrap().push(request);
        Ok(self.review_json.clone())
    }
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    pub bytes: Vec<u8>,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

/// A multipart/form-data body built by hand.
#[derive(Default)]
pub struct Form {
    parts: Vec<(String, Option<String>, Vec<u8>)>,
}

const BOUNDARY: &str = "pizzatron-test-boundary";

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.parts.push((name.to_string(), None, value.as_bytes().to_vec()));
        self
    }

    pub fn file(mut self, name: &str, filename: &str, bytes: &[u8]) -> Self {
        self.parts
            .push((name.to_string(), Some(filename.to_string()), bytes.to_vec()));
        self
    }

    fn into_body(self) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, filename, bytes) in self.parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match filename {
                Some(filename) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(&bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }
}

/// The router plus everything behind it, backed by a temporary directory.
pub struct TestApp {
    pub router: Router,
    pub store: Store,
    pub blobs: Arc<LocalBlobStore>,
    pub provider: Arc<StubProvider>,
    worker: JoinHandle<()>,
    dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::with_provider(StubProvider::scoring(4)).await
    }

    pub async fn with_provider(provider: StubProvider) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let url = format!("sqlite://{}/test.db?mode=rwc", dir.path().display());
        let store = Store::connect(&url)
            .await
            .expect("Failed to initialize test database");
        let blobs = Arc::new(LocalBlobStore::new(dir.path().join("static")));
        Self::assemble(dir, store, blobs, Arc::new(provider))
    }

    fn assemble(
        dir: TempDir,
        store: Store,
        blobs: Arc<LocalBlobStore>,
        provider: Arc<StubProvider>,
    ) -> Self {
        let gateway = AiGateway::new(
            provider.clone(),
            blobs.clone(),
            store.clone(),
            Arc::new(Prompts::new("Turn this person into a chef", "Judge {chef_name}")),
        )
        .with_retry_policy(RetryPolicy {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1),
        });
        let judge = Judge::new(store.clone(), blobs.clone(), gateway);
        let (tasks, worker): (TaskQueue, _) = worker::channel(2);
        let worker = tokio::spawn(worker.run());

        let state = AppState {
            store: store.clone(),
            blobs: blobs.clone(),
            judge,
            tasks,
            leaderboard_limit: 10,
        };
        let router = create_routes(state, blobs.root(), 20 * 1024 * 1024);

        Self {
            router,
            store,
            blobs,
            provider,
            worker,
            dir,
        }
    }

    /// Waits for every scheduled background task, then hands back a fresh
    /// app over the same database and files.
    pub async fn settle(self) -> Self {
        let TestApp {
            router,
            store,
            blobs,
            provider,
            worker,
            dir,
        } = self;
        drop(router);
        worker.await.expect("Worker panicked");
        Self::assemble(dir, store, blobs, provider)
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");
        let status = response.status().as_u16();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body")
            .to_vec();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse {
            status,
            bytes,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(
            Request::builder()
                .method(Method::DELETE)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn post_form(&self, uri: &str, form: Form) -> TestResponse {
        self.send(
            Request::post(uri)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(form.into_body()))
                .unwrap(),
        )
        .await
    }

    /// Creates a chef without an image and returns its id.
    pub async fn create_chef(&self, name: &str) -> i64 {
        let res = self.post_form(routes::CHEFS, Form::new().text("name", name)).await;
        assert_eq!(res.status, 201, "chef creation failed: {}", res.body);
        res.body["id"].as_i64().unwrap()
    }

    pub async fn submit_pizza(&self, chef_id: i64, images: usize) -> TestResponse {
        let mut form = Form::new().text("chef_id", &chef_id.to_string());
        for n in 0..images {
            form = form.file("images", &format!("pizza{n}.jpg"), format!("jpeg {n}").as_bytes());
        }
        self.post_form(routes::PIZZAS, form).await
    }
}
