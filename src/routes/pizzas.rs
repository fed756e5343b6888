use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::info;

use crate::error::AppError;
use crate::models::views::PizzaView;
use crate::state::AppState;
use crate::utils::files;

pub const MIN_IMAGES: usize = 1;
pub const MAX_IMAGES: usize = 3;

#[utoipa::path(
    post,
    path = "/pizzas",
    tag = "Pizzas",
    request_body(content = Vec<u8>, content_type = "multipart/form-data",
        description = "`chef_id` and one to three `images` files"),
    responses(
        (status = 201, description = "Pizza submitted, review scheduled", body = PizzaView),
        (status = 400, description = "Unknown chef, wrong image count or format"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn submit_pizza(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut chef_id: Option<i32> = None;
    let mut images: Vec<(String, Vec<u8>)> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::Validation("Invalid multipart data".to_string()))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "chef_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| AppError::Validation("Invalid chef".to_string()))?;
                chef_id = Some(
                    text.trim()
                        .parse()
                        .map_err(|_| AppError::Validation("Invalid chef".to_string()))?,
                );
            }
            "images" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| AppError::Validation("Failed to read image".to_string()))?;
                if filename.is_empty() && data.is_empty() {
                    continue;
                }
                images.push((files::image_extension(&filename)?, data.to_vec()));
            }
            _ => {}
        }
    }

    let chef_id = chef_id.ok_or_else(|| AppError::Validation("Please choose a chef".to_string()))?;
    if !(MIN_IMAGES..=MAX_IMAGES).contains(&images.len()) {
        return Err(AppError::Validation(format!(
            "Please upload between {} and {} images",
            MIN_IMAGES, MAX_IMAGES
        )));
    }

    let chef = state.store.get_chef(chef_id).await.map_err(|e| match e {
        AppError::NotFound(_) => AppError::Validation("Invalid chef".to_string()),
        other => other,
    })?;

    let (pizza, paths) = state
        .store
        .create_pizza_with_images(chef.id, &images, state.blobs.as_ref())
        .await?;
    info!(pizza_id = pizza.id, chef_id = chef.id, images = paths.len(), "Pizza submitted");

    let judge = state.judge.clone();
    let pizza_id = pizza.id;
    let chef_name = chef.name.clone();
    state.tasks.schedule(format!("pizza review {}", pizza_id), async move {
        judge.review_pizza(pizza_id, paths, chef_name).await
    });

    let view = state.store.get_pizza_with_images(pizza.id).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[utoipa::path(
    get,
    path = "/pizzas",
    tag = "Pizzas",
    responses(
        (status = 200, description = "All pizzas, newest first", body = Vec<PizzaView>)
    )
)]
pub async fn list_pizzas(State(state): State<AppState>) -> Result<Json<Vec<PizzaView>>, AppError> {
    Ok(Json(state.store.list_pizzas().await?))
}

#[utoipa::path(
    get,
    path = "/pizzas/{id}",
    tag = "Pizzas",
    params(("id" = i32, Path, description = "Pizza ID")),
    responses(
        (status = 200, description = "Pizza with images and review", body = PizzaView),
        (status = 404, description = "Pizza not found")
    )
)]
pub async fn get_pizza(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PizzaView>, AppError> {
    Ok(Json(state.store.get_pizza_with_images(id).await?))
}
