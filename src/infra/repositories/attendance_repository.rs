//! Attendance repository.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::attendance::{self, ActiveModel, Entity as AttendanceEntity};
use crate::domain::{Attendance, AttendanceChanges, AttendanceFilter, AttendanceMark};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Attendance>>;

    /// Records matching the filter, ordered by class date then student
    async fn list(&self, filter: AttendanceFilter) -> AppResult<Vec<Attendance>>;

    /// Class dates already recorded for a student in a workshop
    async fn recorded_dates(&self, student_id: Uuid, workshop_id: Uuid) -> AppResult<Vec<NaiveDate>>;

    async fn update(
        &self,
        id: Uuid,
        changes: AttendanceChanges,
        recorded_by: Uuid,
    ) -> AppResult<Attendance>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct AttendanceStore {
    db: DatabaseConnection,
}

impl AttendanceStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Insert or overwrite one class sheet. Returns the stored rows.
pub(crate) async fn upsert_class<C: ConnectionTrait>(
    db: &C,
    workshop_id: Uuid,
    class_date: NaiveDate,
    marks: Vec<AttendanceMark>,
    recorded_by: Uuid,
) -> AppResult<Vec<Attendance>> {
    if marks.is_empty() {
        return Ok(Vec::new());
    }

    let now = chrono::Utc::now();
    let student_ids: Vec<Uuid> = marks.iter().map(|m| m.student_id).collect();
    let rows = marks.into_iter().map(|mark| ActiveModel {
        id: Set(Uuid::new_v4()),
        student_id: Set(mark.student_id),
        workshop_id: Set(workshop_id),
        class_date: Set(class_date),
        status: Set(mark.status.as_str().to_string()),
        notes: Set(mark.notes),
        recorded_by: Set(Some(recorded_by)),
        created_at: Set(now),
        updated_at: Set(now),
    });

    AttendanceEntity::insert_many(rows)
        .on_conflict(
            OnConflict::columns([
                attendance::Column::StudentId,
                attendance::Column::WorkshopId,
                attendance::Column::ClassDate,
            ])
            .update_columns([
                attendance::Column::Status,
                attendance::Column::Notes,
                attendance::Column::RecordedBy,
                attendance::Column::UpdatedAt,
            ])
            .to_owned(),
        )
        .exec_without_returning(db)
        .await
        .map_err(|e| AppError::from_write(e, "Attendance record"))?;

    let models = AttendanceEntity::find()
        .filter(attendance::Column::WorkshopId.eq(workshop_id))
        .filter(attendance::Column::ClassDate.eq(class_date))
        .filter(attendance::Column::StudentId.is_in(student_ids))
        .order_by_asc(attendance::Column::StudentId)
        .all(db)
        .await?;

    Ok(models.into_iter().map(Attendance::from).collect())
}

#[async_trait]
impl AttendanceRepository for AttendanceStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Attendance>> {
        let result = AttendanceEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Attendance::from))
    }

    async fn list(&self, filter: AttendanceFilter) -> AppResult<Vec<Attendance>> {
        let mut query = AttendanceEntity::find();
        if let Some(workshop_id) = filter.workshop_id {
            query = query.filter(attendance::Column::WorkshopId.eq(workshop_id));
        }
        if let Some(student_id) = filter.student_id {
            query = query.filter(attendance::Column::StudentId.eq(student_id));
        }
        if let Some(from) = filter.from {
            query = query.filter(attendance::Column::ClassDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(attendance::Column::ClassDate.lte(to));
        }

        let models = query
            .order_by_asc(attendance::Column::ClassDate)
            .order_by_asc(attendance::Column::StudentId)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Attendance::from).collect())
    }

    async fn recorded_dates(&self, student_id: Uuid, workshop_id: Uuid) -> AppResult<Vec<NaiveDate>> {
        let dates = AttendanceEntity::find()
            .select_only()
            .column(attendance::Column::ClassDate)
            .filter(attendance::Column::StudentId.eq(student_id))
            .filter(attendance::Column::WorkshopId.eq(workshop_id))
            .into_tuple::<NaiveDate>()
            .all(&self.db)
            .await?;

        Ok(dates)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: AttendanceChanges,
        recorded_by: Uuid,
    ) -> AppResult<Attendance> {
        let model = AttendanceEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = model.into();
        apply_changes(&mut active, changes, recorded_by);

        let model = active.update(&self.db).await?;
        Ok(Attendance::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = AttendanceEntity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

fn apply_changes(active: &mut ActiveModel, changes: AttendanceChanges, recorded_by: Uuid) {
    if let Some(status) = changes.status {
        active.status = Set(status.as_str().to_string());
    }
    if changes.clear_notes {
        active.notes = Set(None);
    } else if let Some(notes) = changes.notes {
        active.notes = Set(Some(notes));
    }
    active.recorded_by = Set(Some(recorded_by));
    active.updated_at = Set(chrono::Utc::now());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AttendanceStatus;
    use sea_orm::ActiveValue;

    fn stored() -> ActiveModel {
        attendance::Model {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            workshop_id: Uuid::new_v4(),
            class_date: NaiveDate::from_ymd_opt(2024, 9, 16).unwrap(),
            status: "absent".to_string(),
            notes: Some("llegó con fiebre".to_string()),
            recorded_by: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
        .into()
    }

    #[test]
    fn test_clear_notes_sets_null() {
        let mut active = stored();
        apply_changes(
            &mut active,
            AttendanceChanges {
                clear_notes: true,
                ..Default::default()
            },
            Uuid::new_v4(),
        );
        assert_eq!(active.notes, ActiveValue::Set(None));
        assert!(!active.status.is_set());
    }

    #[test]
    fn test_omitted_notes_are_kept() {
        let mut active = stored();
        apply_changes(
            &mut active,
            AttendanceChanges {
                status: Some(AttendanceStatus::Justified),
                ..Default::default()
            },
            Uuid::new_v4(),
        );
        assert!(!active.notes.is_set());
        assert_eq!(active.status, ActiveValue::Set("justified".to_string()));
    }
}
