use std::collections::HashMap;
use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DatabaseConnection, DbErr,
    EntityTrait, LoaderTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
    TransactionTrait,
};
use tracing::{debug, info, warn};

use crate::entities::{chef, pizza, pizza_image, pizza_review, pizza_review_score, review_category};
use crate::error::AppError;
use crate::models::review::{ReviewDraft, DEFAULT_REVIEW_CATEGORIES, MAX_SCORE, MIN_SCORE};
use crate::models::views::{ChefView, ImageView, PizzaView, ReviewView, ScoreView};
use crate::services::blob::BlobStore;
use crate::utils::files;

const MAX_SUMMARY_CHARS: usize = 1000;

/// Relational store for chefs, pizzas, images and reviews.
///
/// Every method is one self-contained unit of work; multi-row writes run in a
/// single transaction and roll back as a whole on failure.
#[derive(Clone)]
pub struct Store {
    db: DatabaseConnection,
}

impl Store {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connects, applies pending migrations and seeds the category vocabulary.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let mut opt = ConnectOptions::new(database_url.to_owned());
        opt.max_connections(8)
            .connect_timeout(Duration::from_secs(8))
            .acquire_timeout(Duration::from_secs(8))
            .sqlx_logging(false);

        let db = Database::connect(opt).await?;
        let store = Self::new(db);
        store.initialize().await?;
        Ok(store)
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn initialize(&self) -> Result<(), AppError> {
        Migrator::up(&self.db, None).await?;
        self.seed_review_categories().await?;
        Ok(())
    }

    /// Seeds the fixed vocabulary, but only into an empty table.
    async fn seed_review_categories(&self) -> Result<(), AppError> {
        if review_category::Entity::find().count(&self.db).await? > 0 {
            debug!("Review categories already exist, skipping seed");
            return Ok(());
        }

        let models = DEFAULT_REVIEW_CATEGORIES
            .iter()
            .map(|&name| review_category::ActiveModel {
                name: Set(name.to_string()),
                ..Default::default()
            });

        let result = review_category::Entity::insert_many(models)
            .on_conflict(
                OnConflict::column(review_category::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await;

        match result {
            Ok(_) => info!("Seeded {} review categories", DEFAULT_REVIEW_CATEGORIES.len()),
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    pub async fn create_chef(
        &self,
        name: &str,
        image_path: Option<String>,
    ) -> Result<chef::Model, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Chef name is required".to_string()));
        }

        let chef = chef::ActiveModel {
            name: Set(name.to_string()),
            image_path: Set(image_path),
            created_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        };

        Ok(chef.insert(&self.db).await?)
    }

    pub async fn get_chef(&self, id: i32) -> Result<chef::Model, AppError> {
        chef::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Chef with ID {} not found", id)))
    }

    /// All chefs with their pizzas, images and reviews resolved.
    pub async fn list_chefs(&self) -> Result<Vec<ChefView>, AppError> {
        let chefs = chef::Entity::find()
            .order_by_asc(chef::Column::Id)
            .all(&self.db)
            .await?;
        if chefs.is_empty() {
            return Ok(Vec::new());
        }

        let pizzas = chefs
            .load_many(
                pizza::Entity::find().order_by_asc(pizza::Column::Id),
                &self.db,
            )
            .await?;

        let counts: Vec<usize> = pizzas.iter().map(Vec::len).collect();
        let mut hydrated = self
            .hydrate_pizzas(pizzas.into_iter().flatten().collect())
            .await?
            .into_iter();

        Ok(chefs
            .into_iter()
            .zip(counts)
            .map(|(chef, count)| ChefView::new(chef, hydrated.by_ref().take(count).collect()))
            .collect())
    }

    pub async fn get_chef_with_pizzas(&self, id: i32) -> Result<ChefView, AppError> {
        let chef = self.get_chef(id).await?;
        let pizzas = self.list_pizzas_by_chef(id).await?;
        Ok(ChefView::new(chef, pizzas))
    }

    /// Deletes a chef together with its pizzas, their images, reviews and scores.
    pub async fn delete_chef(&self, id: i32) -> Result<(), AppError> {
        let txn = self.db.begin().await?;

        if chef::Entity::find_by_id(id).one(&txn).await?.is_none() {
            return Err(AppError::NotFound(format!("Chef with ID {} not found", id)));
        }

        let pizza_ids: Vec<i32> = pizza::Entity::find()
            .select_only()
            .column(pizza::Column::Id)
            .filter(pizza::Column::ChefId.eq(id))
            .into_tuple()
            .all(&txn)
            .await?;

        let review_ids: Vec<i32> = pizza_review::Entity::find()
            .select_only()
            .column(pizza_review::Column::Id)
            .filter(pizza_review::Column::PizzaId.is_in(pizza_ids.clone()))
            .into_tuple()
            .all(&txn)
            .await?;

        pizza_review_score::Entity::delete_many()
            .filter(pizza_review_score::Column::PizzaReviewId.is_in(review_ids.clone()))
            .exec(&txn)
            .await?;
        pizza_review::Entity::delete_many()
            .filter(pizza_review::Column::Id.is_in(review_ids))
            .exec(&txn)
            .await?;
        pizza_image::Entity::delete_many()
            .filter(pizza_image::Column::PizzaId.is_in(pizza_ids.clone()))
            .exec(&txn)
            .await?;
        pizza::Entity::delete_many()
            .filter(pizza::Column::ChefId.eq(id))
            .exec(&txn)
            .await?;
        chef::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        info!(chef_id = id, pizzas = pizza_ids.len(), "Deleted chef");
        Ok(())
    }

    /// Points the chef at a new image. Returns `false` (and changes nothing)
    /// when the chef has been deleted in the meantime.
    pub async fn update_chef_image(&self, chef_id: i32, path: &str) -> Result<bool, AppError> {
        let Some(chef) = chef::Entity::find_by_id(chef_id).one(&self.db).await? else {
            warn!(chef_id, "Chef not found for image update");
            return Ok(false);
        };

        let mut chef_active: chef::ActiveModel = chef.into();
        chef_active.image_path = Set(Some(path.to_string()));
        chef_active.update(&self.db).await?;
        Ok(true)
    }

    pub async fn create_pizza(&self, chef_id: i32) -> Result<pizza::Model, AppError> {
        self.get_chef(chef_id).await?;

        let pizza = pizza::ActiveModel {
            chef_id: Set(chef_id),
            created_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        };

        Ok(pizza.insert(&self.db).await?)
    }

    /// Creates a pizza, stores its photos and records one image row per photo,
    /// all or nothing. Photo `n` is stored as `pizza_{id}_{n}_*`.
    pub async fn create_pizza_with_images(
        &self,
        chef_id: i32,
        images: &[(String, Vec<u8>)],
        blobs: &dyn BlobStore,
    ) -> Result<(pizza::Model, Vec<String>), AppError> {
        let txn = self.db.begin().await?;

        if chef::Entity::find_by_id(chef_id).one(&txn).await?.is_none() {
            return Err(AppError::NotFound(format!("Chef with ID {} not found", chef_id)));
        }

        let pizza = pizza::ActiveModel {
            chef_id: Set(chef_id),
            created_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut paths = Vec::with_capacity(images.len());
        for (position, (ext, bytes)) in images.iter().enumerate() {
            let path = files::pizza_image_path(pizza.id, position + 1, ext);
            blobs.write_bytes(&path, bytes).await?;
            pizza_image::ActiveModel {
                pizza_id: Set(pizza.id),
                image_path: Set(path.clone()),
                created_at: Set(chrono::Utc::now().naive_utc()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            paths.push(path);
        }

        txn.commit().await?;
        Ok((pizza, paths))
    }

    pub async fn add_pizza_image(
        &self,
        pizza_id: i32,
        path: &str,
    ) -> Result<pizza_image::Model, AppError> {
        let image = pizza_image::ActiveModel {
            pizza_id: Set(pizza_id),
            image_path: Set(path.to_string()),
            created_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        };

        Ok(image.insert(&self.db).await?)
    }

    pub async fn list_pizzas(&self) -> Result<Vec<PizzaView>, AppError> {
        let pizzas = pizza::Entity::find()
            .order_by_desc(pizza::Column::CreatedAt)
            .order_by_desc(pizza::Column::Id)
            .all(&self.db)
            .await?;
        self.hydrate_pizzas(pizzas).await
    }

    pub async fn list_pizzas_by_chef(&self, chef_id: i32) -> Result<Vec<PizzaView>, AppError> {
        let pizzas = pizza::Entity::find()
            .filter(pizza::Column::ChefId.eq(chef_id))
            .order_by_asc(pizza::Column::Id)
            .all(&self.db)
            .await?;
        self.hydrate_pizzas(pizzas).await
    }

    pub async fn get_pizza_with_images(&self, id: i32) -> Result<PizzaView, AppError> {
        let pizza = pizza::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Pizza with ID {} not found", id)))?;

        self.hydrate_pizzas(vec![pizza])
            .await?
            .pop()
            .ok_or_else(|| AppError::InternalServerError(format!("Pizza {} vanished while loading", id)))
    }

    pub async fn list_review_categories(&self) -> Result<Vec<review_category::Model>, AppError> {
        Ok(review_category::Entity::find()
            .order_by_asc(review_category::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Persists a review and one score per known category named in the draft.
    ///
    /// Unknown category names are skipped. A pizza can be reviewed only once:
    /// a second call fails with `Conflict` and writes nothing.
    pub async fn record_review(
        &self,
        pizza_id: i32,
        draft: &ReviewDraft,
    ) -> Result<pizza_review::Model, AppError> {
        // The sentinel is only valid when it fills the whole draft.
        if !draft.is_placeholder() {
            if let Some((name, score)) = draft
                .scores
                .iter()
                .find(|(_, &score)| !(MIN_SCORE..=MAX_SCORE).contains(&score))
            {
                return Err(AppError::Validation(format!(
                    "Score {} for '{}' is out of range",
                    score, name
                )));
            }
        }

        let txn = self.db.begin().await?;

        if pizza::Entity::find_by_id(pizza_id).one(&txn).await?.is_none() {
            return Err(AppError::NotFound(format!("Pizza with ID {} not found", pizza_id)));
        }

        let existing = pizza_review::Entity::find()
            .filter(pizza_review::Column::PizzaId.eq(pizza_id))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(already_reviewed(pizza_id));
        }

        let review = pizza_review::ActiveModel {
            pizza_id: Set(pizza_id),
            review_summary: Set(draft.review_summary.chars().take(MAX_SUMMARY_CHARS).collect()),
            created_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| review_insert_error(e, pizza_id))?;

        let categories: HashMap<String, i32> = review_category::Entity::find()
            .all(&txn)
            .await?
            .into_iter()
            .map(|c| (c.name, c.id))
            .collect();

        let mut rows = Vec::with_capacity(draft.scores.len());
        for (name, &score) in &draft.scores {
            match categories.get(name) {
                Some(&category_id) => rows.push(pizza_review_score::ActiveModel {
                    pizza_review_id: Set(review.id),
                    category_id: Set(category_id),
                    score: Set(score),
                    ..Default::default()
                }),
                None => debug!(pizza_id, category = %name, "Ignoring score for unknown category"),
            }
        }

        if !rows.is_empty() {
            pizza_review_score::Entity::insert_many(rows)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(review)
    }

    /// Resolves chef name, images and review with scores for a batch of pizzas
    /// using a fixed number of queries, preserving the input order.
    pub(crate) async fn hydrate_pizzas(
        &self,
        pizzas: Vec<pizza::Model>,
    ) -> Result<Vec<PizzaView>, AppError> {
        if pizzas.is_empty() {
            return Ok(Vec::new());
        }

        let chefs = pizzas.load_one(chef::Entity, &self.db).await?;
        let images = pizzas
            .load_many(
                pizza_image::Entity::find().order_by_asc(pizza_image::Column::Id),
                &self.db,
            )
            .await?;
        let reviews = pizzas.load_one(pizza_review::Entity, &self.db).await?;

        let present: Vec<pizza_review::Model> = reviews.iter().flatten().cloned().collect();
        let mut scores_by_review: HashMap<i32, Vec<pizza_review_score::Model>> = HashMap::new();
        if !present.is_empty() {
            let scores = present
                .load_many(
                    pizza_review_score::Entity::find()
                        .order_by_asc(pizza_review_score::Column::CategoryId),
                    &self.db,
                )
                .await?;
            scores_by_review = present.iter().map(|r| r.id).zip(scores).collect();
        }

        let category_names: HashMap<i32, String> = review_category::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let views = pizzas
            .into_iter()
            .zip(chefs)
            .zip(images)
            .zip(reviews)
            .map(|(((pizza, chef), images), review)| {
                let review = review.map(|review| {
                    let scores = scores_by_review
                        .remove(&review.id)
                        .unwrap_or_default()
                        .into_iter()
                        .map(|s| ScoreView {
                            category: category_names
                                .get(&s.category_id)
                                .cloned()
                                .unwrap_or_else(|| format!("category {}", s.category_id)),
                            score: s.score,
                        })
                        .collect();
                    ReviewView::new(review, scores)
                });

                PizzaView {
                    id: pizza.id,
                    chef_id: pizza.chef_id,
                    chef_name: chef.map(|c| c.name).unwrap_or_else(|| "Unknown".to_string()),
                    created_at: pizza.created_at,
                    images: images.into_iter().map(ImageView::from).collect(),
                    review_pending: review.is_none(),
                    review,
                }
            })
            .collect();

        Ok(views)
    }
}

fn already_reviewed(pizza_id: i32) -> AppError {
    AppError::Conflict(format!("Pizza {} has already been reviewed", pizza_id))
}

/// A concurrent writer can slip past the existence check; the unique index on
/// `pizza_reviews.pizza_id` still rejects it.
fn review_insert_error(err: DbErr, pizza_id: i32) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => already_reviewed(pizza_id),
        _ => err.into(),
    }
}
