//! Pricing tiers and monthly fee quotes.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use super::audit_service::record;
use crate::domain::{
    full_price_payer, quote_fee, AuditAction, CurrentStaff, FeeQuote, NewAuditEntry,
    NewPricingTier, PricingTier, PricingTierChanges,
};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const ENTITY: &str = "pricing_tier";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PricingService: Send + Sync {
    async fn list_tiers(&self) -> AppResult<Vec<PricingTier>>;

    async fn get_tier(&self, id: Uuid) -> AppResult<PricingTier>;

    async fn create_tier(&self, actor: &CurrentStaff, data: NewPricingTier) -> AppResult<PricingTier>;

    async fn update_tier(
        &self,
        actor: &CurrentStaff,
        id: Uuid,
        changes: PricingTierChanges,
    ) -> AppResult<PricingTier>;

    async fn delete_tier(&self, actor: &CurrentStaff, id: Uuid) -> AppResult<()>;

    /// Monthly fee of a student given their open enrollments
    async fn quote_fee(&self, student_id: Uuid) -> AppResult<FeeQuote>;
}

pub struct PricingManager<U: UnitOfWork> {
    uow: Arc<U>,
    sibling_discount_percent: u8,
}

impl<U: UnitOfWork> PricingManager<U> {
    pub fn new(uow: Arc<U>, sibling_discount_percent: u8) -> Self {
        Self {
            uow,
            sibling_discount_percent,
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> PricingService for PricingManager<U> {
    async fn list_tiers(&self) -> AppResult<Vec<PricingTier>> {
        self.uow.pricing().list().await
    }

    async fn get_tier(&self, id: Uuid) -> AppResult<PricingTier> {
        self.uow.pricing().find_by_id(id).await?.ok_or_not_found()
    }

    async fn create_tier(&self, actor: &CurrentStaff, data: NewPricingTier) -> AppResult<PricingTier> {
        actor.require_admin()?;

        let tier = self.uow.pricing().create(data).await?;
        record(
            &*self.uow,
            NewAuditEntry::new(actor.id, AuditAction::Create, ENTITY, tier.id).with_details(&tier),
        )
        .await;
        Ok(tier)
    }

    async fn update_tier(
        &self,
        actor: &CurrentStaff,
        id: Uuid,
        changes: PricingTierChanges,
    ) -> AppResult<PricingTier> {
        actor.require_admin()?;

        let tier = self.uow.pricing().update(id, changes).await?;
        record(
            &*self.uow,
            NewAuditEntry::new(actor.id, AuditAction::Update, ENTITY, tier.id).with_details(&tier),
        )
        .await;
        Ok(tier)
    }

    async fn delete_tier(&self, actor: &CurrentStaff, id: Uuid) -> AppResult<()> {
        actor.require_admin()?;

        let tier = self.get_tier(id).await?;
        self.uow.pricing().delete(id).await?;
        record(
            &*self.uow,
            NewAuditEntry::new(actor.id, AuditAction::Delete, ENTITY, id).with_details(&tier),
        )
        .await;
        Ok(())
    }

    async fn quote_fee(&self, student_id: Uuid) -> AppResult<FeeQuote> {
        let student = self
            .uow
            .students()
            .find_by_id(student_id)
            .await?
            .ok_or_not_found()?;

        let workshops: HashSet<Uuid> = self
            .uow
            .enrollments()
            .list_by_student(student.id, true)
            .await?
            .into_iter()
            .map(|e| e.workshop_id)
            .collect();

        let sibling = match student.family_group_id {
            Some(family_id) if !workshops.is_empty() => {
                let members = self.uow.students().list_by_family(family_id).await?;
                let member_ids = members.iter().map(|m| m.id).collect();
                let enrolled: HashSet<Uuid> = self
                    .uow
                    .enrollments()
                    .list_open_for_students(member_ids)
                    .await?
                    .into_iter()
                    .map(|e| e.student_id)
                    .collect();
                full_price_payer(&members, &enrolled).is_some_and(|payer| payer != student.id)
            }
            _ => false,
        };

        let tiers = self.uow.pricing().list().await?;
        Ok(quote_fee(
            &tiers,
            workshops.len() as u32,
            sibling,
            self.sibling_discount_percent,
        ))
    }
}
