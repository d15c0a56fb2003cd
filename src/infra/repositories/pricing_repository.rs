//! Pricing tier repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use super::entities::pricing_tier::{self, ActiveModel, Entity as PricingTierEntity};
use crate::domain::{NewPricingTier, PricingTier, PricingTierChanges};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const DUPLICATE_TIER: &str = "An active tier for this number of workshops";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PricingRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<PricingTier>>;

    /// Every tier, active or not, by package size
    async fn list(&self) -> AppResult<Vec<PricingTier>>;

    async fn create(&self, data: NewPricingTier) -> AppResult<PricingTier>;

    async fn update(&self, id: Uuid, changes: PricingTierChanges) -> AppResult<PricingTier>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct PricingStore {
    db: DatabaseConnection,
}

impl PricingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PricingRepository for PricingStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<PricingTier>> {
        let result = PricingTierEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(PricingTier::from))
    }

    async fn list(&self) -> AppResult<Vec<PricingTier>> {
        let models = PricingTierEntity::find()
            .order_by_asc(pricing_tier::Column::WorkshopCount)
            .order_by_desc(pricing_tier::Column::Active)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(PricingTier::from).collect())
    }

    async fn create(&self, data: NewPricingTier) -> AppResult<PricingTier> {
        let now = chrono::Utc::now();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(data.name.trim().to_string()),
            workshop_count: Set(data.workshop_count),
            monthly_amount: Set(data.monthly_amount),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| AppError::from_write(e, DUPLICATE_TIER))?;

        Ok(PricingTier::from(model))
    }

    async fn update(&self, id: Uuid, changes: PricingTierChanges) -> AppResult<PricingTier> {
        let model = PricingTierEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = model.into();
        if let Some(name) = changes.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(workshop_count) = changes.workshop_count {
            active.workshop_count = Set(workshop_count);
        }
        if let Some(monthly_amount) = changes.monthly_amount {
            active.monthly_amount = Set(monthly_amount);
        }
        if let Some(flag) = changes.active {
            active.active = Set(flag);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| AppError::from_write(e, DUPLICATE_TIER))?;
        Ok(PricingTier::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = PricingTierEntity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
