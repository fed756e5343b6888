use std::sync::Arc;

use tracing::info;

use crate::error::AppError;
use crate::services::ai::AiGateway;
use crate::services::blob::BlobStore;
use crate::services::store::Store;
use crate::utils::files;

/// The background work triggered by chef and pizza submissions.
#[derive(Clone)]
pub struct Judge {
    store: Store,
    blobs: Arc<dyn BlobStore>,
    gateway: AiGateway,
}

impl Judge {
    pub fn new(store: Store, blobs: Arc<dyn BlobStore>, gateway: AiGateway) -> Self {
        Self {
            store,
            blobs,
            gateway,
        }
    }

    /// Replaces the uploaded chef photo with a generated portrait. On any
    /// failure the uploaded photo stays as the chef's image.
    pub async fn regenerate_chef_portrait(
        &self,
        chef_id: i32,
        reference: Vec<u8>,
    ) -> Result<(), AppError> {
        let portrait = self.gateway.generate_chef_image(&reference).await?;

        let path = files::chef_portrait_path();
        self.blobs.write_bytes(&path, &portrait).await?;

        if self.store.update_chef_image(chef_id, &path).await? {
            info!(chef_id, path = %path, "Chef portrait updated");
        }
        Ok(())
    }

    pub async fn review_pizza(
        &self,
        pizza_id: i32,
        image_paths: Vec<String>,
        chef_name: String,
    ) -> Result<(), AppError> {
        let draft = self
            .gateway
            .review_pizza_images(&image_paths, &chef_name)
            .await?;
        let review = self.store.record_review(pizza_id, &draft).await?;

        info!(
            pizza_id,
            review_id = review.id,
            placeholder = draft.is_placeholder(),
            "Pizza review recorded"
        );
        Ok(())
    }
}
