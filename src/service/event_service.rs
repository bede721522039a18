use crate::domain::event::{Event, EventSearch, EventUpdate, NewEvent};
use crate::domain::promotion::discounted_price;
use crate::repo::events_repo::EventsRepo;
use crate::repo::promotions_repo::PromotionsRepo;
use anyhow::Result;
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Clone)]
pub struct EventService {
    pub events_repo: EventsRepo,
    pub promotions_repo: PromotionsRepo,
}

impl EventService {
    pub async fn list_active(&self) -> Result<Vec<Event>> {
        self.events_repo.list_active().await
    }

    pub async fn list_all(&self) -> Result<Vec<Event>> {
        self.events_repo.list_all().await
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Event>> {
        self.events_repo.find(id).await
    }

    pub async fn by_organizer(&self, organizer_id: Uuid) -> Result<Vec<Event>> {
        self.events_repo.by_organizer(organizer_id).await
    }

    pub async fn upcoming(&self) -> Result<Vec<Event>> {
        self.events_repo.upcoming().await
    }

    pub async fn search(&self, filter: &EventSearch) -> Result<Vec<Event>> {
        self.events_repo.search(filter).await
    }

    pub async fn create(&self, data: &NewEvent) -> Result<Option<Event>> {
        if data.capacity <= 0 || data.base_price < Decimal::ZERO {
            return Ok(None);
        }
        Ok(Some(self.events_repo.insert(data).await?))
    }

    pub async fn update(&self, id: Uuid, data: &EventUpdate) -> Result<bool> {
        self.events_repo.update(id, data).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        self.events_repo.soft_delete(id).await
    }

    pub async fn check_availability(&self, event_id: Uuid, requested: i32) -> Result<bool> {
        Ok(self
            .events_repo
            .find(event_id)
            .await?
            .map(|e| e.can_sell(requested))
            .unwrap_or(false))
    }

    /// Base price, discounted when the code is valid for this event at the
    /// present moment. An unknown event prices at zero, matching the
    /// not-found sentinel convention of the service layer.
    pub async fn calculate_price(&self, event_id: Uuid, promotion_code: Option<&str>) -> Result<Decimal> {
        let Some(event) = self.events_repo.find(event_id).await? else {
            return Ok(Decimal::ZERO);
        };

        match promotion_code.filter(|c| !c.is_empty()) {
            Some(code) => {
                let promotion = self.promotions_repo.find_by_code(code).await?;
                Ok(discounted_price(
                    event.base_price,
                    promotion.as_ref(),
                    event_id,
                    chrono::Utc::now(),
                ))
            }
            None => Ok(event.base_price),
        }
    }

    pub async fn reserve_tickets(&self, event_id: Uuid, count: i32) -> Result<bool> {
        if count <= 0 {
            return Ok(false);
        }
        self.events_repo.try_reserve(event_id, count).await
    }

    pub async fn release_tickets(&self, event_id: Uuid, count: i32) -> Result<bool> {
        if count <= 0 {
            return Ok(false);
        }
        self.events_repo.release(event_id, count).await
    }
}
