//! Family group repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::family_group::{self, ActiveModel, Entity as FamilyEntity};
use crate::domain::{FamilyChanges, FamilyGroup, NewFamilyGroup};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FamilyRepository: Send + Sync {
    /// Find a family that has not been deleted
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FamilyGroup>>;

    async fn list(&self) -> AppResult<Vec<FamilyGroup>>;

    async fn create(&self, data: NewFamilyGroup) -> AppResult<FamilyGroup>;

    async fn update(&self, id: Uuid, changes: FamilyChanges) -> AppResult<FamilyGroup>;

    /// Soft delete
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct FamilyStore {
    db: DatabaseConnection,
}

impl FamilyStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_active_model(&self, id: Uuid) -> AppResult<family_group::Model> {
        FamilyEntity::find_by_id(id)
            .filter(family_group::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }
}

#[async_trait]
impl FamilyRepository for FamilyStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FamilyGroup>> {
        let result = FamilyEntity::find_by_id(id)
            .filter(family_group::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;

        Ok(result.map(FamilyGroup::from))
    }

    async fn list(&self) -> AppResult<Vec<FamilyGroup>> {
        let models = FamilyEntity::find()
            .filter(family_group::Column::DeletedAt.is_null())
            .order_by_asc(family_group::Column::Name)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(FamilyGroup::from).collect())
    }

    async fn create(&self, data: NewFamilyGroup) -> AppResult<FamilyGroup> {
        let now = chrono::Utc::now();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(data.name.trim().to_string()),
            contact_name: Set(data.contact_name),
            contact_phone: Set(data.contact_phone),
            contact_email: Set(data.contact_email),
            notes: Set(data.notes),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(&self.db)
        .await?;

        Ok(FamilyGroup::from(model))
    }

    async fn update(&self, id: Uuid, changes: FamilyChanges) -> AppResult<FamilyGroup> {
        let mut active: ActiveModel = self.find_active_model(id).await?.into();

        if let Some(name) = changes.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(contact_name) = changes.contact_name {
            active.contact_name = Set(Some(contact_name));
        }
        if let Some(contact_phone) = changes.contact_phone {
            active.contact_phone = Set(Some(contact_phone));
        }
        if let Some(contact_email) = changes.contact_email {
            active.contact_email = Set(Some(contact_email));
        }
        if let Some(notes) = changes.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(FamilyGroup::from(model))
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
