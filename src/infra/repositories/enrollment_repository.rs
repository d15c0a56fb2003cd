//! Enrollment repository.
//!
//! The `pub(crate)` functions take any connection so the transactional
//! enrollment path can reuse them.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::enrollment::{self, ActiveModel, Entity as EnrollmentEntity};
use crate::domain::Enrollment;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Open enrollment of a student in a workshop, if any
    async fn find_open(&self, student_id: Uuid, workshop_id: Uuid) -> AppResult<Option<Enrollment>>;

    async fn list_by_workshop(&self, workshop_id: Uuid, open_only: bool) -> AppResult<Vec<Enrollment>>;

    async fn list_by_student(&self, student_id: Uuid, open_only: bool) -> AppResult<Vec<Enrollment>>;

    /// Open enrollments of any of the given students
    async fn list_open_for_students(&self, student_ids: Vec<Uuid>) -> AppResult<Vec<Enrollment>>;

    /// Every open enrollment in the school
    async fn list_open(&self) -> AppResult<Vec<Enrollment>>;

    /// Close an open enrollment on `left_on`
    async fn withdraw(&self, id: Uuid, left_on: NaiveDate) -> AppResult<Enrollment>;

    /// Close every open enrollment of a student, returning how many were closed
    async fn close_all_for_student(&self, student_id: Uuid, left_on: NaiveDate) -> AppResult<u64>;

    /// Close every open enrollment in a workshop, returning how many were closed
    async fn close_all_for_workshop(&self, workshop_id: Uuid, left_on: NaiveDate) -> AppResult<u64>;
}

pub struct EnrollmentStore {
    db: DatabaseConnection,
}

impl EnrollmentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn into_enrollments(models: Vec<enrollment::Model>) -> Vec<Enrollment> {
    models.into_iter().map(Enrollment::from).collect()
}

pub(crate) async fn find_open<C: ConnectionTrait>(
    db: &C,
    student_id: Uuid,
    workshop_id: Uuid,
) -> AppResult<Option<Enrollment>> {
    let result = EnrollmentEntity::find()
        .filter(enrollment::Column::StudentId.eq(student_id))
        .filter(enrollment::Column::WorkshopId.eq(workshop_id))
        .filter(enrollment::Column::LeftOn.is_null())
        .one(db)
        .await?;

    Ok(result.map(Enrollment::from))
}

pub(crate) async fn count_open<C: ConnectionTrait>(db: &C, workshop_id: Uuid) -> AppResult<u64> {
    let count = EnrollmentEntity::find()
        .filter(enrollment::Column::WorkshopId.eq(workshop_id))
        .filter(enrollment::Column::LeftOn.is_null())
        .count(db)
        .await?;

    Ok(count)
}

pub(crate) async fn insert<C: ConnectionTrait>(
    db: &C,
    student_id: Uuid,
    workshop_id: Uuid,
    enrolled_on: NaiveDate,
) -> AppResult<Enrollment> {
    let model = ActiveModel {
        id: Set(Uuid::new_v4()),
        student_id: Set(student_id),
        workshop_id: Set(workshop_id),
        enrolled_on: Set(enrolled_on),
        left_on: Set(None),
        created_at: Set(chrono::Utc::now()),
    }
    .insert(db)
    .await
    .map_err(|e| AppError::from_write(e, "An open enrollment for this student and workshop"))?;

    Ok(Enrollment::from(model))
}

#[async_trait]
impl EnrollmentRepository for EnrollmentStore {
    async fn find_open(&self, student_id: Uuid, workshop_id: Uuid) -> AppResult<Option<Enrollment>> {
        find_open(&self.db, student_id, workshop_id).await
    }

    async fn list_by_workshop(&self, workshop_id: Uuid, open_only: bool) -> AppResult<Vec<Enrollment>> {
        let mut query = EnrollmentEntity::find().filter(enrollment::Column::WorkshopId.eq(workshop_id));
        if open_only {
            query = query.filter(enrollment::Column::LeftOn.is_null());
        }
        let models = query
            .order_by_asc(enrollment::Column::EnrolledOn)
            .all(&self.db)
            .await?;

        Ok(into_enrollments(models))
    }

    async fn list_by_student(&self, student_id: Uuid, open_only: bool) -> AppResult<Vec<Enrollment>> {
        let mut query = EnrollmentEntity::find().filter(enrollment::Column::StudentId.eq(student_id));
        if open_only {
            query = query.filter(enrollment::Column::LeftOn.is_null());
        }
        let models = query
            .order_by_desc(enrollment::Column::EnrolledOn)
            .all(&self.db)
            .await?;

        Ok(into_enrollments(models))
    }

    async fn list_open_for_students(&self, student_ids: Vec<Uuid>) -> AppResult<Vec<Enrollment>> {
        if student_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = EnrollmentEntity::find()
            .filter(enrollment::Column::StudentId.is_in(student_ids))
            .filter(enrollment::Column::LeftOn.is_null())
            .all(&self.db)
            .await?;

        Ok(into_enrollments(models))
    }

    async fn list_open(&self) -> AppResult<Vec<Enrollment>> {
        let models = EnrollmentEntity::find()
            .filter(enrollment::Column::LeftOn.is_null())
            .all(&self.db)
            .await?;

        Ok(into_enrollments(models))
    }

    async fn withdraw(&self, id: Uuid, left_on: NaiveDate) -> AppResult<Enrollment> {
        let model = EnrollmentEntity::find_by_id(id)
            .filter(enrollment::Column::LeftOn.is_null())
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = model.into();
        active.left_on = Set(Some(left_on));

        let model = active.update(&self.db).await?;
        Ok(Enrollment::from(model))
    }

    async fn close_all_for_student(&self, student_id: Uuid, left_on: NaiveDate) -> AppResult<u64> {
        close_open(&self.db, enrollment::Column::StudentId, student_id, left_on).await
    }

    async fn close_all_for_workshop(&self, workshop_id: Uuid, left_on: NaiveDate) -> AppResult<u64> {
        close_open(&self.db, enrollment::Column::WorkshopId, workshop_id, left_on).await
    }
}

/// Closes the open enrollments whose `owner` column equals `owner_id`.
async fn close_open<C: ConnectionTrait>(
    db: &C,
    owner: enrollment::Column,
    owner_id: Uuid,
    left_on: NaiveDate,
) -> AppResult<u64> {
    let started = EnrollmentEntity::update_many()
        .col_expr(enrollment::Column::LeftOn, Expr::value(left_on))
        .filter(owner.eq(owner_id))
        .filter(enrollment::Column::LeftOn.is_null())
        .filter(enrollment::Column::EnrolledOn.lte(left_on))
        .exec(db)
        .await?;

    // Enrollments that had not started yet close on their own start date
    let upcoming = EnrollmentEntity::update_many()
        .col_expr(
            enrollment::Column::LeftOn,
            Expr::col(enrollment::Column::EnrolledOn).into(),
        )
        .filter(owner.eq(owner_id))
        .filter(enrollment::Column::LeftOn.is_null())
        .exec(db)
        .await?;

    Ok(started.rows_affected + upcoming.rows_affected)
}
