//! Staff repository with soft delete support.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::staff::{self, ActiveModel, Entity as StaffEntity};
use crate::domain::{NewStaff, Staff, StaffChanges};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Staff repository trait for dependency injection.
///
/// Query methods exclude soft-deleted rows unless their name says otherwise.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StaffRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Staff>>;

    async fn find_by_id_with_deleted(&self, id: Uuid) -> AppResult<Option<Staff>>;

    /// Email lookup across every row, deleted included
    async fn find_by_email_with_deleted(&self, email: &str) -> AppResult<Option<Staff>>;

    async fn list(&self, include_inactive: bool) -> AppResult<Vec<Staff>>;

    async fn create(&self, data: NewStaff) -> AppResult<Staff>;

    async fn update(&self, id: Uuid, changes: StaffChanges) -> AppResult<Staff>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn restore(&self, id: Uuid) -> AppResult<Staff>;
}

pub struct StaffStore {
    db: DatabaseConnection,
}

impl StaffStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_active_model(&self, id: Uuid) -> AppResult<staff::Model> {
        StaffEntity::find_by_id(id)
            .filter(staff::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }
}

#[async_trait]
impl StaffRepository for StaffStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Staff>> {
        let result = StaffEntity::find_by_id(id)
            .filter(staff::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;

        Ok(result.map(Staff::from))
    }

    async fn find_by_id_with_deleted(&self, id: Uuid) -> AppResult<Option<Staff>> {
        let result = StaffEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Staff::from))
    }

    async fn find_by_email_with_deleted(&self, email: &str) -> AppResult<Option<Staff>> {
        let result = StaffEntity::find()
            .filter(staff::Column::Email.eq(email.to_lowercase()))
            .one(&self.db)
            .await?;

        Ok(result.map(Staff::from))
    }

    async fn list(&self, include_inactive: bool) -> AppResult<Vec<Staff>> {
        let mut query = StaffEntity::find().filter(staff::Column::DeletedAt.is_null());
        if !include_inactive {
            query = query.filter(staff::Column::Active.eq(true));
        }

        let models = query
            .order_by_asc(staff::Column::LastName)
            .order_by_asc(staff::Column::FirstName)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Staff::from).collect())
    }

    async fn create(&self, data: NewStaff) -> AppResult<Staff> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(data.first_name.trim().to_string()),
            last_name: Set(data.last_name.trim().to_string()),
            email: Set(data.email.trim().to_lowercase()),
            phone: Set(data.phone),
            role: Set(data.role.as_str().to_string()),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_write(e, "A staff member with this email"))?;
        Ok(Staff::from(model))
    }

    async fn update(&self, id: Uuid, changes: StaffChanges) -> AppResult<Staff> {
        let mut active: ActiveModel = self.find_active_model(id).await?.into();

        if let Some(first_name) = changes.first_name {
            active.first_name = Set(first_name.trim().to_string());
        }
        if let Some(last_name) = changes.last_name {
            active.last_name = Set(last_name.trim().to_string());
        }
        if let Some(phone) = changes.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(role) = changes.role {
            active.role = Set(role.as_str().to_string());
        }
        if let Some(flag) = changes.active {
            active.active = Set(flag);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Staff::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut active: ActiveModel = self.find_active_model(id).await?.into();
        let now = chrono::Utc::now();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);

        active.update(&self.db).await?;
        Ok(())
    }

    async fn restore(&self, id: Uuid) -> AppResult<Staff> {
        let model = StaffEntity::find_by_id(id)
            .filter(staff::Column::DeletedAt.is_not_null())
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::validation("Staff member is not deleted or does not exist"))?;

        let mut active: ActiveModel = model.into();
        active.deleted_at = Set(None);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Staff::from(model))
    }
}
