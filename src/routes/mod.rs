mod chefs;
mod home;
mod leaderboard;
mod pizzas;

use std::path::Path;

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::models::views::{
    CategoryView, ChefView, ImageView, LeaderboardEntry, PizzaView, ReviewView, ScoreView,
};
use crate::state::AppState;

// Define the OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        home::root,
        chefs::create_chef,
        chefs::list_chefs,
        chefs::get_chef,
        chefs::delete_chef,
        pizzas::submit_pizza,
        pizzas::list_pizzas,
        pizzas::get_pizza,
        leaderboard::leaderboard,
        leaderboard::review_categories,
    ),
    components(
        schemas(
            ChefView,
            PizzaView,
            ImageView,
            ReviewView,
            ScoreView,
            LeaderboardEntry,
            CategoryView,
        )
    ),
    tags(
        (name = "General", description = "General API information"),
        (name = "Chefs", description = "Register chefs and browse their submissions"),
        (name = "Pizzas", description = "Submit pizzas for review"),
        (name = "Leaderboard", description = "Rankings and the scoring vocabulary")
    ),
    info(
        title = "Pizzatron API",
        version = "0.1.0",
        description = "Pizza submissions judged by a multimodal AI, with generated chef portraits and a leaderboard",
    )
)]
struct ApiDoc;

pub fn create_routes(state: AppState, static_dir: &Path, max_upload_bytes: usize) -> Router {
    // Swagger UI (stateless)
    let swagger_router: Router = SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into();

    let app_routes = Router::new()
        .route("/", get(home::root))
        .route("/chefs", get(chefs::list_chefs).post(chefs::create_chef))
        .route("/chefs/{id}", get(chefs::get_chef).delete(chefs::delete_chef))
        .route("/pizzas", get(pizzas::list_pizzas).post(pizzas::submit_pizza))
        .route("/pizzas/{id}", get(pizzas::get_pizza))
        .route("/leaderboard", get(leaderboard::leaderboard))
        .route("/review-categories", get(leaderboard::review_categories))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state);

    Router::new()
        .merge(swagger_router)
        .merge(app_routes)
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
}
