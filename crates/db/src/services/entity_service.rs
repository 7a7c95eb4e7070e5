//! The generic service every entity route goes through.

use std::sync::Arc;

use academy_core::query::{PaginationQuery, Visibility};
use academy_core::types::DbId;
use academy_core::validation::{validate, DtoMode, EntitySchema};
use serde_json::{Map, Value};

use super::context::RequestContext;
use super::error::ServiceResult;
use super::hooks::{EntityHooks, NoHooks};
use crate::models::{Entity, Page, Record};
use crate::repositories::{EntityRepo, Repository};
use crate::DbPool;

/// Validation gate plus hooks in front of one entity's repository.
///
/// Mutations run in a fixed order: the raw input is validated in full, then
/// the entity's hooks run, and only then is the repository called.
pub struct EntityService<E: Entity> {
    repo: Arc<dyn Repository<E>>,
    hooks: Arc<dyn EntityHooks>,
}

impl<E: Entity> EntityService<E> {
    pub fn new(repo: Arc<dyn Repository<E>>, hooks: Arc<dyn EntityHooks>) -> Self {
        Self { repo, hooks }
    }

    /// Service over the Postgres repository with no hooks.
    pub fn with_pool(pool: DbPool) -> Self {
        Self::new(Arc::new(EntityRepo::<E>::new(pool)), Arc::new(NoHooks))
    }

    /// Service over the Postgres repository with the given hooks.
    pub fn with_hooks(pool: DbPool, hooks: impl EntityHooks + 'static) -> Self {
        Self::new(Arc::new(EntityRepo::<E>::new(pool)), Arc::new(hooks))
    }

    pub fn schema(&self) -> &'static EntitySchema {
        E::schema()
    }

    pub async fn create(&self, ctx: &RequestContext, raw: &Map<String, Value>) -> ServiceResult<E> {
        let mut dto = validate(E::schema(), DtoMode::Create, raw)?;
        self.hooks.before_create(ctx, &mut dto)?;

        let row = self.repo.create(&dto).await?;
        tracing::info!(
            entity = E::schema().entity,
            id = %row.id(),
            user_id = ?ctx.user_id,
            "Entity created",
        );
        Ok(row)
    }

    /// Returns `None` when no live row has `id`.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: DbId,
        raw: &Map<String, Value>,
    ) -> ServiceResult<Option<E>> {
        let mut dto = validate(E::schema(), DtoMode::Update, raw)?;
        self.hooks.before_update(ctx, id, &mut dto)?;

        let row = self.repo.update(id, &dto).await?;
        if row.is_some() {
            tracing::info!(
                entity = E::schema().entity,
                id = %id,
                fields = dto.len(),
                user_id = ?ctx.user_id,
                "Entity updated",
            );
        }
        Ok(row)
    }

    pub async fn find_by_id(
        &self,
        id: DbId,
        visibility: Visibility,
        populate_children: bool,
    ) -> ServiceResult<Option<Record<E>>> {
        Ok(self
            .repo
            .find_by_id(id, visibility, populate_children)
            .await?)
    }

    pub async fn list(&self, query: &PaginationQuery) -> ServiceResult<Page<Record<E>>> {
        query.validate()?;
        E::schema().check_filters(query)?;
        Ok(self.repo.list(query).await?)
    }

    pub async fn soft_delete(&self, ctx: &RequestContext, id: DbId) -> ServiceResult<bool> {
        let deleted = self.repo.soft_delete(id).await?;
        if deleted {
            tracing::info!(
                entity = E::schema().entity,
                id = %id,
                user_id = ?ctx.user_id,
                "Entity soft-deleted",
            );
        }
        Ok(deleted)
    }

    pub async fn restore(&self, ctx: &RequestContext, id: DbId) -> ServiceResult<bool> {
        let restored = self.repo.restore(id).await?;
        if restored {
            tracing::info!(
                entity = E::schema().entity,
                id = %id,
                user_id = ?ctx.user_id,
                "Entity restored",
            );
        }
        Ok(restored)
    }
}
