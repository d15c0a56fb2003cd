//! Payments.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::audit_service::record;
use crate::domain::{
    AuditAction, CurrentStaff, NewAuditEntry, NewPayment, Payment, PaymentFilter, VoidPayment,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Clock, UnitOfWork};
use crate::types::{Paginated, PaginationParams};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const ENTITY: &str = "payment";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PaymentService: Send + Sync {
    async fn list_payments(
        &self,
        filter: PaymentFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<Payment>>;

    async fn register_payment(&self, actor: &CurrentStaff, data: NewPayment) -> AppResult<Payment>;

    /// Void a payment; it stays listed with its reason
    async fn void_payment(&self, actor: &CurrentStaff, id: Uuid, data: VoidPayment) -> AppResult<Payment>;
}

pub struct PaymentManager<U: UnitOfWork> {
    uow: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U: UnitOfWork> PaymentManager<U> {
    pub fn new(uow: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self { uow, clock }
    }
}

#[async_trait]
impl<U: UnitOfWork> PaymentService for PaymentManager<U> {
    async fn list_payments(
        &self,
        filter: PaymentFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<Payment>> {
        if let Some(month) = filter.month {
            if !(1..=12).contains(&month) {
                return Err(AppError::validation("Month must be between 1 and 12"));
            }
        }
        let (payments, total) = self.uow.payments().list(filter, page).await?;
        Ok(Paginated::new(payments, &page, total))
    }

    async fn register_payment(&self, actor: &CurrentStaff, mut data: NewPayment) -> AppResult<Payment> {
        actor.require_payments()?;

        data.period = data.period.checked()?;
        let paid_on = data.paid_on.unwrap_or_else(|| self.clock.today());
        if paid_on > self.clock.today() {
            return Err(AppError::validation("Payment date cannot be in the future"));
        }
        if self.uow.students().find_by_id(data.student_id).await?.is_none() {
            return Err(AppError::validation("Student does not exist"));
        }

        let payment = self.uow.payments().create(data, paid_on, actor.id).await?;
        record(
            &*self.uow,
            NewAuditEntry::new(actor.id, AuditAction::Create, ENTITY, payment.id).with_details(&payment),
        )
        .await;

        tracing::info!(
            payment_id = %payment.id,
            student_id = %payment.student_id,
            period = %payment.period,
            amount = payment.amount,
            "Payment registered"
        );
        Ok(payment)
    }

    async fn void_payment(&self, actor: &CurrentStaff, id: Uuid, data: VoidPayment) -> AppResult<Payment> {
        actor.require_admin()?;

        let reason = data.trimmed_reason()?.to_string();
        let existing = self.uow.payments().find_by_id(id).await?.ok_or_not_found()?;
        if existing.is_voided() {
            return Err(AppError::conflict("Payment is already voided"));
        }

        let payment = self.uow.payments().void(id, reason.clone()).await?;
        record(
            &*self.uow,
            NewAuditEntry::new(actor.id, AuditAction::Void, ENTITY, id)
                .with_details(&serde_json::json!({ "reason": reason })),
        )
        .await;
        Ok(payment)
    }
}
