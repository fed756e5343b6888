use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::info;

use crate::error::AppError;
use crate::models::views::ChefView;
use crate::state::AppState;
use crate::utils::files;

#[utoipa::path(
    post,
    path = "/chefs",
    tag = "Chefs",
    request_body(content = Vec<u8>, content_type = "multipart/form-data",
        description = "`name` (required) and an optional `image` file"),
    responses(
        (status = 201, description = "Chef created", body = ChefView),
        (status = 400, description = "Missing name or unsupported image format"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn create_chef(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut name = String::new();
    let mut image: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::Validation("Invalid multipart data".to_string()))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => {
                name = field
                    .text()
                    .await
                    .map_err(|_| AppError::Validation("Invalid chef name".to_string()))?;
            }
            "image" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| AppError::Validation("Failed to read image".to_string()))?;
                // Browsers send an empty part when no file was picked.
                if !filename.is_empty() || !data.is_empty() {
                    image = Some((files::image_extension(&filename)?, data.to_vec()));
                }
            }
            _ => {}
        }
    }

    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation("Chef name is required".to_string()));
    }

    let uploaded = match &image {
        Some((ext, bytes)) => {
            let path = files::chef_upload_path(ext);
            state.blobs.write_bytes(&path, bytes).await?;
            Some(path)
        }
        None => None,
    };

    let chef = state.store.create_chef(&name, uploaded).await?;
    info!(chef_id = chef.id, name = %chef.name, with_image = image.is_some(), "Chef created");

    if let Some((_, bytes)) = image {
        let judge = state.judge.clone();
        let chef_id = chef.id;
        state.tasks.schedule(format!("chef portrait {}", chef_id), async move {
            judge.regenerate_chef_portrait(chef_id, bytes).await
        });
    }

    Ok((StatusCode::CREATED, Json(ChefView::new(chef, Vec::new()))))
}

#[utoipa::path(
    get,
    path = "/chefs",
    tag = "Chefs",
    responses(
        (status = 200, description = "All chefs with their pizzas", body = Vec<ChefView>)
    )
)]
pub async fn list_chefs(State(state): State<AppState>) -> Result<Json<Vec<ChefView>>, AppError> {
    Ok(Json(state.store.list_chefs().await?))
}

#[utoipa::path(
    get,
    path = "/chefs/{id}",
    tag = "Chefs",
    params(("id" = i32, Path, description = "Chef ID")),
    responses(
        (status = 200, description = "Chef with pizzas, images and reviews", body = ChefView),
        (status = 404, description = "Chef not found")
    )
)]
pub async fn get_chef(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ChefView>, AppError> {
    Ok(Json(state.store.get_chef_with_pizzas(id).await?))
}

#[utoipa::path(
    delete,
    path = "/chefs/{id}",
    tag = "Chefs",
    params(("id" = i32, Path, description = "Chef ID")),
    responses(
        (status = 204, description = "Chef and everything it owns deleted"),
        (status = 404, description = "Chef not found")
    )
)]
pub async fn delete_chef(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    state.store.delete_chef(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
