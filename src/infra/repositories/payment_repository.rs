//! Payment repository. Payments are voided, never deleted.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::payment::{self, ActiveModel, Entity as PaymentEntity};
use super::page::fetch_page;
use crate::domain::{BillingPeriod, NewPayment, Payment, PaymentFilter};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Payment>>;

    /// Newest first
    async fn list(
        &self,
        filter: PaymentFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<Payment>, u64)>;

    /// Non-voided payments for a billing period
    async fn list_for_period(&self, period: BillingPeriod) -> AppResult<Vec<Payment>>;

    async fn create(
        &self,
        data: NewPayment,
        paid_on: NaiveDate,
        recorded_by: Uuid,
    ) -> AppResult<Payment>;

    async fn void(&self, id: Uuid, reason: String) -> AppResult<Payment>;
}

pub struct PaymentStore {
    db: DatabaseConnection,
}

impl PaymentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn period_filter(period: BillingPeriod) -> sea_orm::Condition {
    sea_orm::Condition::all()
        .add(payment::Column::PeriodYear.eq(period.year))
        .add(payment::Column::PeriodMonth.eq(period.month as i32))
}

#[async_trait]
impl PaymentRepository for PaymentStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Payment>> {
        let result = PaymentEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Payment::from))
    }

    async fn list(
        &self,
        filter: PaymentFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<Payment>, u64)> {
        let mut query = PaymentEntity::find();
        if let Some(student_id) = filter.student_id {
            query = query.filter(payment::Column::StudentId.eq(student_id));
        }
        if let Some(year) = filter.year {
            query = query.filter(payment::Column::PeriodYear.eq(year));
        }
        if let Some(month) = filter.month {
            query = query.filter(payment::Column::PeriodMonth.eq(month as i32));
        }
        if !filter.include_voided {
            query = query.filter(payment::Column::VoidedAt.is_null());
        }

        let query = query
            .order_by_desc(payment::Column::PaidOn)
            .order_by_desc(payment::Column::CreatedAt);

        let (models, total) = fetch_page(&self.db, query, &page).await?;
        Ok((models.into_iter().map(Payment::from).collect(), total))
    }

    async fn list_for_period(&self, period: BillingPeriod) -> AppResult<Vec<Payment>> {
        let models = PaymentEntity::find()
            .filter(period_filter(period))
            .filter(payment::Column::VoidedAt.is_null())
            .order_by_asc(payment::Column::PaidOn)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Payment::from).collect())
    }

    async fn create(
        &self,
        data: NewPayment,
        paid_on: NaiveDate,
        recorded_by: Uuid,
    ) -> AppResult<Payment> {
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(data.student_id),
            period_year: Set(data.period.year),
            period_month: Set(data.period.month as i32),
            amount: Set(data.amount),
            method: Set(data.method.as_str().to_string()),
            paid_on: Set(paid_on),
            notes: Set(data.notes),
            recorded_by: Set(Some(recorded_by)),
            created_at: Set(chrono::Utc::now()),
            voided_at: Set(None),
            void_reason: Set(None),
        }
        .insert(&self.db)
        .await
        .map_err(|e| AppError::from_write(e, "Payment"))?;

        Ok(Payment::from(model))
    }

    async fn void(&self, id: Uuid, reason: String) -> AppResult<Payment> {
        let model = PaymentEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;
        if model.voided_at.is_some() {
            return Err(AppError::conflict("Payment is already voided"));
        }

        let mut active: ActiveModel = model.into();
        active.voided_at = Set(Some(chrono::Utc::now()));
        active.void_reason = Set(Some(reason));

        let model = active.update(&self.db).await?;
        Ok(Payment::from(model))
    }
}
