//! Student repository with soft delete support.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::student::{self, ActiveModel, Entity as StudentEntity};
use super::page::fetch_page;
use crate::domain::student::normalize_document;
use crate::domain::{NewStudent, Student, StudentChanges, StudentFilter};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const DUPLICATE_DOCUMENT: &str = "A student with this document";

/// Student repository trait for dependency injection.
///
/// Query methods exclude soft-deleted rows unless their name says otherwise.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Student>>;

    async fn find_by_id_with_deleted(&self, id: Uuid) -> AppResult<Option<Student>>;

    /// Lookup by normalized document across every row, deleted included
    async fn find_by_document_with_deleted(&self, document: &str) -> AppResult<Option<Student>>;

    /// Rows for the given ids, deleted included (for labelling reports)
    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Student>>;

    async fn list(
        &self,
        filter: StudentFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<Student>, u64)>;

    /// Non-deleted members of a family, oldest first
    async fn list_by_family(&self, family_group_id: Uuid) -> AppResult<Vec<Student>>;

    async fn create(&self, data: NewStudent) -> AppResult<Student>;

    async fn update(&self, id: Uuid, changes: StudentChanges) -> AppResult<Student>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn restore(&self, id: Uuid) -> AppResult<Student>;
}

pub struct StudentStore {
    db: DatabaseConnection,
}

impl StudentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_active_model(&self, id: Uuid) -> AppResult<student::Model> {
        StudentEntity::find_by_id(id)
            .filter(student::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }
}

fn search_condition(term: &str) -> Condition {
    let pattern = format!("%{}%", term.trim().to_lowercase());
    let lower = |col: student::Column| Expr::expr(Func::lower(Expr::col(col)));

    Condition::any()
        .add(lower(student::Column::FirstName).like(pattern.clone()))
        .add(lower(student::Column::LastName).like(pattern.clone()))
        .add(student::Column::Document.like(normalize_document(&pattern)))
}

#[async_trait]
impl StudentRepository for StudentStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Student>> {
        let result = StudentEntity::find_by_id(id)
            .filter(student::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;

        Ok(result.map(Student::from))
    }

    async fn find_by_id_with_deleted(&self, id: Uuid) -> AppResult<Option<Student>> {
        let result = StudentEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Student::from))
    }

    async fn find_by_document_with_deleted(&self, document: &str) -> AppResult<Option<Student>> {
        let result = StudentEntity::find()
            .filter(student::Column::Document.eq(normalize_document(document)))
            .one(&self.db)
            .await?;

        Ok(result.map(Student::from))
    }

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Student>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = StudentEntity::find()
            .filter(student::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Student::from).collect())
    }

    async fn list(
        &self,
        filter: StudentFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<Student>, u64)> {
        let mut query = StudentEntity::find().filter(student::Column::DeletedAt.is_null());

        if let Some(term) = filter.search.as_deref().filter(|t| !t.trim().is_empty()) {
            query = query.filter(search_condition(term));
        }
        if let Some(family_group_id) = filter.family_group_id {
            query = query.filter(student::Column::FamilyGroupId.eq(family_group_id));
        }
        if let Some(active) = filter.active {
            query = query.filter(student::Column::Active.eq(active));
        }

        let query = query
            .order_by_asc(student::Column::LastName)
            .order_by_asc(student::Column::FirstName)
            .order_by_asc(student::Column::Id);

        let (models, total) = fetch_page(&self.db, query, &page).await?;
        Ok((models.into_iter().map(Student::from).collect(), total))
    }

    async fn list_by_family(&self, family_group_id: Uuid) -> AppResult<Vec<Student>> {
        let models = StudentEntity::find()
            .filter(student::Column::FamilyGroupId.eq(family_group_id))
            .filter(student::Column::DeletedAt.is_null())
            .order_by_asc(student::Column::CreatedAt)
            .order_by_asc(student::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Student::from).collect())
    }

    async fn create(&self, data: NewStudent) -> AppResult<Student> {
        let now = chrono::Utc::now();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(data.first_name.trim().to_string()),
            last_name: Set(data.last_name.trim().to_string()),
            document: Set(data.document.as_deref().map(normalize_document)),
            birth_date: Set(data.birth_date),
            phone: Set(data.phone),
            email: Set(data.email.map(|e| e.trim().to_lowercase())),
            family_group_id: Set(data.family_group_id),
            notes: Set(data.notes),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(&self.db)
        .await
        .map_err(|e| AppError::from_write(e, DUPLICATE_DOCUMENT))?;

        Ok(Student::from(model))
    }

    async fn update(&self, id: Uuid, changes: StudentChanges) -> AppResult<Student> {
        let mut active: ActiveModel = self.find_active_model(id).await?.into();

        if let Some(first_name) = changes.first_name {
            active.first_name = Set(first_name.trim().to_string());
        }
        if let Some(last_name) = changes.last_name {
            active.last_name = Set(last_name.trim().to_string());
        }
        if let Some(document) = changes.document {
            active.document = Set(Some(normalize_document(&document)));
        }
        if let Some(birth_date) = changes.birth_date {
            active.birth_date = Set(Some(birth_date));
        }
        if let Some(phone) = changes.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(email) = changes.email {
            active.email = Set(Some(email.trim().to_lowercase()));
        }
        if changes.clear_family {
            active.family_group_id = Set(None);
        } else if let Some(family_group_id) = changes.family_group_id {
            active.family_group_id = Set(Some(family_group_id));
        }
        if let Some(notes) = changes.notes {
            active.notes = Set(Some(notes));
        }
        if let Some(flag) = changes.active {
            active.active = Set(flag);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| AppError::from_write(e, DUPLICATE_DOCUMENT))?;
        Ok(Student::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut active: ActiveModel = self.find_active_model(id).await?.into();
        let now = chrono::Utc::now();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);

        active.update(&self.db).await?;
        Ok(())
    }

    async fn restore(&self, id: Uuid) -> AppResult<Student> {
        let model = StudentEntity::find_by_id(id)
            .filter(student::Column::DeletedAt.is_not_null())
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::validation("Student is not deleted or does not exist"))?;

        let mut active: ActiveModel = model.into();
        active.deleted_at = Set(None);
        active.updated_at = Set(chrono::Utc::now());

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| AppError::from_write(e, DUPLICATE_DOCUMENT))?;
        Ok(Student::from(model))
    }
}
