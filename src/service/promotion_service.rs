use crate::domain::promotion::{
    discount_is_valid, window_is_valid, NewPromotion, Promotion, PromotionUpdate,
};
use crate::repo::events_repo::EventsRepo;
use crate::repo::promotions_repo::PromotionsRepo;
use anyhow::Result;
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Clone)]
pub struct PromotionService {
    pub promotions_repo: PromotionsRepo,
    pub events_repo: EventsRepo,
}

impl PromotionService {
    pub async fn list(&self) -> Result<Vec<Promotion>> {
        self.promotions_repo.list().await
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Promotion>> {
        self.promotions_repo.find(id).await
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<Promotion>> {
        self.promotions_repo.find_by_code(code).await
    }

    pub async fn by_event(&self, event_id: Uuid) -> Result<Vec<Promotion>> {
        self.promotions_repo.by_event(event_id).await
    }

    pub async fn by_organizer(&self, organizer_id: Uuid) -> Result<Vec<Promotion>> {
        self.promotions_repo.by_organizer(organizer_id).await
    }

    pub async fn active(&self) -> Result<Vec<Promotion>> {
        self.promotions_repo.active().await
    }

    /// Rejects inverted windows, out-of-range discounts and unknown
    /// events before any write. Codes are normalized to upper-case here;
    /// lookups afterwards are case-sensitive as stored.
    pub async fn create(&self, data: &NewPromotion) -> Result<Option<Promotion>> {
        if !window_is_valid(data.start_date, data.end_date) || !discount_is_valid(data.discount_percentage) {
            return Ok(None);
        }
        if self.events_repo.find(data.event_id).await?.is_none() {
            return Ok(None);
        }

        let promotion = Promotion {
            id: Uuid::new_v4(),
            code: data.code.trim().to_uppercase(),
            description: data.description.clone().unwrap_or_default(),
            discount_percentage: data.discount_percentage,
            start_date: data.start_date,
            end_date: data.end_date,
            is_active: true,
            event_id: data.event_id,
            created_at: chrono::Utc::now(),
            updated_at: None,
        };

        self.promotions_repo.insert(&promotion).await?;
        Ok(Some(promotion))
    }

    pub async fn update(&self, id: Uuid, data: &PromotionUpdate) -> Result<bool> {
        if !window_is_valid(data.start_date, data.end_date) || !discount_is_valid(data.discount_percentage) {
            return Ok(false);
        }
        self.promotions_repo.update(id, data).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        self.promotions_repo.soft_delete(id).await
    }

    pub async fn validate(&self, code: &str, event_id: Uuid) -> Result<bool> {
        self.promotions_repo.validate_code(code, event_id).await
    }

    /// Discount against an arbitrary amount; zero when the code is
    /// unknown, inactive or outside its window.
    pub async fn discount_amount(&self, code: &str, original: Decimal) -> Result<Decimal> {
        let Some(promotion) = self.promotions_repo.find_by_code(code).await? else {
            return Ok(Decimal::ZERO);
        };

        let now = chrono::Utc::now();
        if !promotion.is_active || now < promotion.start_date || now > promotion.end_date {
            return Ok(Decimal::ZERO);
        }

        Ok(promotion.discount_amount(original))
    }

    pub async fn is_owned_by_organizer(&self, promotion_id: Uuid, organizer_id: Uuid) -> Result<bool> {
        self.promotions_repo.is_owned_by_organizer(promotion_id, organizer_id).await
    }
}
