//! Pricing tier (`tarifas`) entity.

use sea_orm::entity::prelude::*;

use crate::domain::PricingTier;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tarifas")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub workshop_count: i32,
    pub monthly_amount: i64,
    pub active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PricingTier {
    fn from(model: Model) -> Self {
        PricingTier {
            id: model.id,
            name: model.name,
            workshop_count: model.workshop_count,
            monthly_amount: model.monthly_amount,
            active: model.active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
