use crate::domain::promotion::discounted_price;
use crate::domain::ticket::{generate_qr_code, Ticket, TicketStatus};
use crate::repo::events_repo::EventsRepo;
use crate::repo::promotions_repo::PromotionsRepo;
use crate::repo::tickets_repo::TicketsRepo;
use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct TicketService {
    pub pool: PgPool,
    pub tickets_repo: TicketsRepo,
    pub events_repo: EventsRepo,
    pub promotions_repo: PromotionsRepo,
}

impl TicketService {
    pub async fn find(&self, id: Uuid) -> Result<Option<Ticket>> {
        self.tickets_repo.find(id).await
    }

    pub async fn find_by_qr(&self, qr_code: &str) -> Result<Option<Ticket>> {
        self.tickets_repo.find_by_qr(qr_code).await
    }

    pub async fn by_customer(&self, customer_id: Uuid) -> Result<Vec<Ticket>> {
        self.tickets_repo.by_customer(customer_id).await
    }

    pub async fn by_event(&self, event_id: Uuid) -> Result<Vec<Ticket>> {
        self.tickets_repo.by_event(event_id).await
    }

    /// One ticket per call; a request for N tickets loops N times and
    /// reports partial success. Returns None when the event is missing,
    /// inactive or sold out.
    ///
    /// Inventory decrement and ticket insert commit together: the
    /// conditional UPDATE inside the transaction is what makes two racing
    /// purchases of the last seat impossible to both succeed.
    pub async fn purchase_ticket(
        &self,
        event_id: Uuid,
        customer_id: Uuid,
        promotion_code: Option<&str>,
    ) -> Result<Option<Ticket>> {
        let Some(event) = self.events_repo.find(event_id).await? else {
            return Ok(None);
        };
        if !event.can_sell(1) {
            return Ok(None);
        }

        let now = chrono::Utc::now();
        let price = match promotion_code.filter(|c| !c.is_empty()) {
            Some(code) => {
                let promotion = self.promotions_repo.find_by_code(code).await?;
                discounted_price(event.base_price, promotion.as_ref(), event_id, now)
            }
            None => event.base_price,
        };

        let ticket = Ticket {
            id: Uuid::new_v4(),
            qr_code: generate_qr_code(),
            price,
            seat_number: String::new(),
            status: TicketStatus::Active,
            purchase_date: now,
            event_id,
            customer_id,
            created_at: now,
            updated_at: None,
        };

        let mut tx = self.pool.begin().await?;
        if !EventsRepo::try_reserve_tx(&mut tx, event_id, 1).await? {
            tx.rollback().await?;
            return Ok(None);
        }
        TicketsRepo::insert_tx(&mut tx, &ticket).await?;
        tx.commit().await?;

        Ok(Some(ticket))
    }

    /// Allowed only from Active; the freed seat goes back to the event.
    pub async fn cancel_ticket(&self, ticket_id: Uuid) -> Result<bool> {
        let Some(ticket) = self.tickets_repo.find(ticket_id).await? else {
            return Ok(false);
        };

        if !self
            .tickets_repo
            .update_status_if(ticket_id, TicketStatus::Active, TicketStatus::Cancelled)
            .await?
        {
            return Ok(false);
        }

        if !self.events_repo.release(ticket.event_id, 1).await? {
            tracing::warn!("could not return inventory for event {} after cancel", ticket.event_id);
        }

        Ok(true)
    }

    /// No status precondition; refunding a ticket always frees its seat.
    pub async fn refund_ticket(&self, ticket_id: Uuid) -> Result<bool> {
        let Some(ticket) = self.tickets_repo.find(ticket_id).await? else {
            return Ok(false);
        };

        if !self.tickets_repo.update_status(ticket_id, TicketStatus::Refunded).await? {
            return Ok(false);
        }

        if !self.events_repo.release(ticket.event_id, 1).await? {
            tracing::warn!("could not return inventory for event {} after refund", ticket.event_id);
        }

        Ok(true)
    }

    /// Gate-entry scan: valid while the ticket is Active and the event is
    /// still in the future. Read-only; nothing marks a ticket Used.
    pub async fn validate_ticket(&self, qr_code: &str) -> Result<bool> {
        let Some(ticket) = self.tickets_repo.find_by_qr(qr_code).await? else {
            return Ok(false);
        };
        if ticket.status != TicketStatus::Active {
            return Ok(false);
        }

        Ok(self
            .events_repo
            .find(ticket.event_id)
            .await?
            .map(|e| e.date > chrono::Utc::now())
            .unwrap_or(false))
    }
}
