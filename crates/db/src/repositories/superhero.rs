//! Superhero repository for database operations.
//!
//! Implements superhero and superhero image persistence using `SeaORM`.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::{superhero_images, superheroes};
use hero_core::superhero::{
    ImageSelection, NewSuperheroImage, Superhero, SuperheroChanges, SuperheroError,
    SuperheroFields, SuperheroImage, SuperheroRepository as SuperheroRepoTrait,
};
use hero_shared::{SuperheroId, SuperheroImageId};

/// Superhero repository implementation.
#[derive(Debug, Clone)]
pub struct SuperheroRepository {
    db: DatabaseConnection,
}

impl SuperheroRepository {
    /// Create a new superhero repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Load images for the given superheroes, grouped by owner in display order.
    async fn load_images(
        &self,
        superhero_ids: &[i32],
        selection: ImageSelection,
    ) -> Result<HashMap<i32, Vec<SuperheroImage>>, SuperheroError> {
        let mut grouped: HashMap<i32, Vec<SuperheroImage>> = HashMap::new();
        if superhero_ids.is_empty() {
            return Ok(grouped);
        }

        let mut query = superhero_images::Entity::find()
            .filter(superhero_images::Column::SuperheroId.is_in(superhero_ids.iter().copied()));
        if let Some(limit) = selection.limit() {
            query = query.filter(Expr::cust(first_n_per_superhero(limit)));
        }

        let models = query
            .order_by_asc(superhero_images::Column::SuperheroId)
            .order_by_asc(superhero_images::Column::SortOrder)
            .order_by_asc(superhero_images::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        for model in models {
            grouped
                .entry(model.superhero_id)
                .or_default()
                .push(image_to_domain(model));
        }
        Ok(grouped)
    }
}

impl SuperheroRepoTrait for SuperheroRepository {
    async fn create(&self, fields: SuperheroFields) -> Result<Superhero, SuperheroError> {
        let now = Utc::now();
        let active_model = superheroes::ActiveModel {
            id: NotSet,
            nickname: Set(fields.nickname),
            real_name: Set(fields.real_name),
            origin_description: Set(fields.origin_description),
            superpowers: Set(fields.superpowers),
            catch_phrase: Set(fields.catch_phrase),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let model = active_model.insert(&self.db).await.map_err(db_err)?;

        Ok(to_domain(model, Vec::new()))
    }

    async fn find_by_id(
        &self,
        id: SuperheroId,
        images: ImageSelection,
    ) -> Result<Option<Superhero>, SuperheroError> {
        let Some(model) = superheroes::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        let mut grouped = self.load_images(&[model.id], images).await?;
        let images = grouped.remove(&model.id).unwrap_or_default();
        Ok(Some(to_domain(model, images)))
    }

    async fn list(&self, images: ImageSelection) -> Result<Vec<Superhero>, SuperheroError> {
        let models = superheroes::Entity::find()
            .order_by_asc(superheroes::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let mut grouped = self.load_images(&ids, images).await?;

        Ok(models
            .into_iter()
            .map(|model| {
                let images = grouped.remove(&model.id).unwrap_or_default();
                to_domain(model, images)
            })
            .collect())
    }

    async fn update(
        &self,
        id: SuperheroId,
        changes: SuperheroChanges,
    ) -> Result<Superhero, SuperheroError> {
        let model = superheroes::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(SuperheroError::NotFound(id))?;

        let mut active_model: superheroes::ActiveModel = model.into();
        if let Some(nickname) = changes.nickname {
            active_model.nickname = Set(nickname);
        }
        if let Some(real_name) = changes.real_name {
            active_model.real_name = Set(Some(real_name));
        }
        if let Some(origin_description) = changes.origin_description {
            active_model.origin_description = Set(Some(origin_description));
        }
        if let Some(superpowers) = changes.superpowers {
            active_model.superpowers = Set(Some(superpowers));
        }
        if let Some(catch_phrase) = changes.catch_phrase {
            active_model.catch_phrase = Set(Some(catch_phrase));
        }
        active_model.updated_at = Set(Utc::now().into());

        let model = active_model.update(&self.db).await.map_err(db_err)?;

        Ok(to_domain(model, Vec::new()))
    }

    async fn delete(&self, id: SuperheroId) -> Result<bool, SuperheroError> {
        let result = superheroes::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn exists(&self, id: SuperheroId) -> Result<bool, SuperheroError> {
        let count: u64 = superheroes::Entity::find_by_id(id.into_inner())
            .count(&self.db)
            .await
            .map_err(db_err)?;

        Ok(count > 0)
    }

    async fn create_image(&self, input: NewSuperheroImage) -> Result<SuperheroImage, SuperheroError> {
        let active_model = superhero_images::ActiveModel {
            id: NotSet,
            superhero_id: Set(input.superhero_id.into_inner()),
            url: Set(input.url),
            sort_order: Set(input.order),
            created_at: Set(Utc::now().into()),
        };

        let model = active_model.insert(&self.db).await.map_err(db_err)?;

        Ok(image_to_domain(model))
    }

    async fn find_images(
        &self,
        superhero_id: SuperheroId,
        ids: &[SuperheroImageId],
    ) -> Result<Vec<SuperheroImage>, SuperheroError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = superhero_images::Entity::find()
            .filter(superhero_images::Column::SuperheroId.eq(superhero_id.into_inner()))
            .filter(superhero_images::Column::Id.is_in(ids.iter().map(|id| id.into_inner())))
            .order_by_asc(superhero_images::Column::SortOrder)
            .order_by_asc(superhero_images::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(image_to_domain).collect())
    }

    async fn update_image_order(
        &self,
        image_id: SuperheroImageId,
        order: i32,
    ) -> Result<(), SuperheroError> {
        superhero_images::Entity::update_many()
            .col_expr(superhero_images::Column::SortOrder, Expr::value(order))
            .filter(superhero_images::Column::Id.eq(image_id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(())
    }

    async fn delete_images(
        &self,
        superhero_id: SuperheroId,
        ids: &[SuperheroImageId],
    ) -> Result<u64, SuperheroError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = superhero_images::Entity::delete_many()
            .filter(superhero_images::Column::SuperheroId.eq(superhero_id.into_inner()))
            .filter(superhero_images::Column::Id.is_in(ids.iter().map(|id| id.into_inner())))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected)
    }

    async fn max_image_order(&self, superhero_id: SuperheroId) -> Result<Option<i32>, SuperheroError> {
        let max: Option<Option<i32>> = superhero_images::Entity::find()
            .select_only()
            .column_as(superhero_images::Column::SortOrder.max(), "max_order")
            .filter(superhero_images::Column::SuperheroId.eq(superhero_id.into_inner()))
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(max.flatten())
    }
}

/// Keeps an image only if fewer than `limit` images of the same superhero
/// sort before it by `(sort_order, id)`.
fn first_n_per_superhero(limit: usize) -> String {
    format!(
        "(SELECT COUNT(*) FROM superhero_images AS earlier \
         WHERE earlier.superhero_id = superhero_images.superhero_id \
         AND (earlier.sort_order, earlier.id) < (superhero_images.sort_order, superhero_images.id)) < {limit}"
    )
}

fn db_err(e: DbErr) -> SuperheroError {
    SuperheroError::repository(e.to_string())
}

/// Convert database model to domain model.
fn to_domain(model: superheroes::Model, images: Vec<SuperheroImage>) -> Superhero {
    Superhero {
        id: SuperheroId::new(model.id),
        nickname: model.nickname,
        real_name: model.real_name,
        origin_description: model.origin_description,
        superpowers: model.superpowers,
        catch_phrase: model.catch_phrase,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
        images,
    }
}

/// Convert database image model to domain model.
fn image_to_domain(model: superhero_images::Model) -> SuperheroImage {
    SuperheroImage {
        id: SuperheroImageId::new(model.id),
        superhero_id: SuperheroId::new(model.superhero_id),
        url: model.url,
        order: model.sort_order,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
