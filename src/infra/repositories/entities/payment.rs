//! Payment (`pagos`) entity.

use sea_orm::entity::prelude::*;

use crate::domain::{BillingPeriod, Payment, PaymentMethod};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pagos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: Uuid,
    pub period_year: i32,
    pub period_month: i32,
    pub amount: i64,
    pub method: String,
    pub paid_on: Date,
    pub notes: Option<String>,
    pub recorded_by: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub voided_at: Option<DateTimeUtc>,
    pub void_reason: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Payment {
    fn from(model: Model) -> Self {
        Payment {
            id: model.id,
            student_id: model.student_id,
            period: BillingPeriod {
                year: model.period_year,
                month: model.period_month as u32,
            },
            amount: model.amount,
            method: PaymentMethod::from(model.method.as_str()),
            paid_on: model.paid_on,
            notes: model.notes,
            recorded_by: model.recorded_by,
            created_at: model.created_at,
            voided_at: model.voided_at,
            void_reason: model.void_reason,
        }
    }
}
