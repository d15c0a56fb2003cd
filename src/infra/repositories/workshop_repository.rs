//! Workshop repository with soft delete support.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::workshop::{self, ActiveModel, Entity as WorkshopEntity};
use crate::domain::{NewWorkshop, Workshop, WorkshopChanges, WorkshopFilter};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait WorkshopRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Workshop>>;

    /// Rows for the given ids, deleted included
    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Workshop>>;

    async fn list(&self, filter: WorkshopFilter) -> AppResult<Vec<Workshop>>;

    async fn create(&self, data: NewWorkshop) -> AppResult<Workshop>;

    async fn update(&self, id: Uuid, changes: WorkshopChanges) -> AppResult<Workshop>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct WorkshopStore {
    db: DatabaseConnection,
}

impl WorkshopStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_active_model(&self, id: Uuid) -> AppResult<workshop::Model> {
        WorkshopEntity::find_by_id(id)
            .filter(workshop::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }
}

fn into_workshops(models: Vec<workshop::Model>) -> AppResult<Vec<Workshop>> {
    models.into_iter().map(Workshop::try_from).collect()
}

#[async_trait]
impl WorkshopRepository for WorkshopStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Workshop>> {
        WorkshopEntity::find_by_id(id)
            .filter(workshop::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .map(Workshop::try_from)
            .transpose()
    }

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Workshop>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = WorkshopEntity::find()
            .filter(workshop::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;

        into_workshops(models)
    }

    async fn list(&self, filter: WorkshopFilter) -> AppResult<Vec<Workshop>> {
        let mut query = WorkshopEntity::find().filter(workshop::Column::DeletedAt.is_null());
        if let Some(teacher_id) = filter.teacher_id {
            query = query.filter(workshop::Column::TeacherId.eq(teacher_id));
        }
        if let Some(active) = filter.active {
            query = query.filter(workshop::Column::Active.eq(active));
        }

        let models = query
            .order_by_asc(workshop::Column::Name)
            .all(&self.db)
            .await?;

        into_workshops(models)
    }

    async fn create(&self, data: NewWorkshop) -> AppResult<Workshop> {
        let now = chrono::Utc::now();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(data.name.trim().to_string()),
            description: Set(data.description),
            teacher_id: Set(data.teacher_id),
            weekdays: Set(data.schedule.weekdays_to_stored()),
            start_time: Set(data.schedule.start_time),
            end_time: Set(data.schedule.end_time),
            capacity: Set(data.capacity),
            starts_on: Set(data.starts_on),
            ends_on: Set(data.ends_on),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(&self.db)
        .await
        .map_err(|e| AppError::from_write(e, "Workshop"))?;

        Workshop::try_from(model)
    }

    async fn update(&self, id: Uuid, changes: WorkshopChanges) -> AppResult<Workshop> {
        let mut active: ActiveModel = self.find_active_model(id).await?.into();

        if let Some(name) = changes.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        if changes.clear_teacher {
            active.teacher_id = Set(None);
        } else if let Some(teacher_id) = changes.teacher_id {
            active.teacher_id = Set(Some(teacher_id));
        }
        if let Some(schedule) = changes.schedule {
            active.weekdays = Set(schedule.weekdays_to_stored());
            active.start_time = Set(schedule.start_time);
            active.end_time = Set(schedule.end_time);
        }
        if let Some(capacity) = changes.capacity {
            active.capacity = Set(Some(capacity));
        }
        if let Some(starts_on) = changes.starts_on {
            active.starts_on = Set(starts_on);
        }
        if let Some(ends_on) = changes.ends_on {
            active.ends_on = Set(Some(ends_on));
        }
        if let Some(flag) = changes.active {
            active.active = Set(flag);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| AppError::from_write(e, "Workshop"))?;
        Workshop::try_from(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut active: ActiveModel = self.find_active_model(id).await?.into();
        let now = chrono::Utc::now();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);

        active.update(&self.db).await?;
        Ok(())
    }
}
