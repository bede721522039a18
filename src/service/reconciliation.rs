use crate::domain::payment::PaymentStatus;
use crate::gateways::{parse_payment_ids, GatewayEvent};
use crate::repo::events_repo::EventsRepo;
use crate::repo::payments_repo::PaymentsRepo;
use crate::repo::tickets_repo::TicketsRepo;
use crate::repo::users_repo::UsersRepo;
use crate::repo::webhook_events_repo::WebhookEventsRepo;
use crate::service::mailer::Mailer;
use anyhow::Result;
use uuid::Uuid;

/// Applies gateway-reported payment outcomes to local state.
///
/// Per payment the machine is Pending -> Completed | Failed; a dispute
/// force-fails regardless of current status. The event id is recorded
/// before any side effect, so a redelivered event is a logged no-op.
#[derive(Clone)]
pub struct ReconciliationService {
    pub payments_repo: PaymentsRepo,
    pub tickets_repo: TicketsRepo,
    pub events_repo: EventsRepo,
    pub users_repo: UsersRepo,
    pub webhook_events_repo: WebhookEventsRepo,
    pub mailer: Mailer,
}

impl ReconciliationService {
    pub async fn handle(&self, event: GatewayEvent) -> Result<()> {
        if !self.webhook_events_repo.try_record(&event.id, &event.event_type).await? {
            tracing::info!("webhook event {} already processed, skipping", event.id);
            return Ok(());
        }

        match event.event_type.as_str() {
            "checkout.session.completed" => self.handle_checkout_completed(&event).await,
            "payment_intent.succeeded" => self.handle_intent_succeeded(&event).await,
            "payment_intent.payment_failed" => self.handle_intent_failed(&event).await,
            "charge.dispute.created" => self.handle_charge_disputed(&event).await,
            other => {
                tracing::info!("unhandled webhook event type: {}", other);
                Ok(())
            }
        }
    }

    async fn handle_checkout_completed(&self, event: &GatewayEvent) -> Result<()> {
        let session = event.checkout_session()?;

        let Some(raw_ids) = session.metadata.get("payment_ids") else {
            tracing::warn!("no payment_ids in metadata for session {}", session.id);
            return Ok(());
        };

        let payment_ids = parse_payment_ids(raw_ids);
        let mut updated = 0;

        for payment_id in payment_ids {
            let Some(payment) = self.payments_repo.find(payment_id).await? else {
                tracing::warn!("payment {} from session metadata not found", payment_id);
                continue;
            };

            if !self
                .payments_repo
                .update_status_if_pending(payment_id, PaymentStatus::Completed)
                .await?
            {
                tracing::warn!("payment {} not pending, leaving as-is", payment_id);
                continue;
            }

            if let Some(intent_id) = &session.payment_intent {
                self.payments_repo.attach_intent(payment_id, intent_id).await?;
            }

            updated += 1;
            self.queue_confirmation_email(payment.ticket_id).await;
        }

        tracing::info!("session {}: {} payment(s) marked completed", session.id, updated);
        Ok(())
    }

    async fn handle_intent_succeeded(&self, event: &GatewayEvent) -> Result<()> {
        let intent = event.payment_intent()?;

        if let Some(payment) = self.payments_repo.find_by_intent(&intent.id).await? {
            if self
                .payments_repo
                .update_status_if_pending(payment.id, PaymentStatus::Completed)
                .await?
            {
                tracing::info!("payment {} completed for intent {}", payment.id, intent.id);
            }
        }

        Ok(())
    }

    async fn handle_intent_failed(&self, event: &GatewayEvent) -> Result<()> {
        let intent = event.payment_intent()?;

        if let Some(payment) = self.payments_repo.find_by_intent(&intent.id).await? {
            if self
                .payments_repo
                .update_status_if_pending(payment.id, PaymentStatus::Failed)
                .await?
            {
                tracing::info!("payment {} failed for intent {}", payment.id, intent.id);
            }
        }

        Ok(())
    }

    /// Disputes fail the payment unconditionally, even out of Completed.
    /// The ticket itself stays untouched.
    async fn handle_charge_disputed(&self, event: &GatewayEvent) -> Result<()> {
        let charge = event.charge()?;

        let Some(intent_id) = &charge.payment_intent else {
            tracing::warn!("disputed charge {} carries no intent reference", charge.id);
            return Ok(());
        };

        if let Some(payment) = self.payments_repo.find_by_intent(intent_id).await? {
            self.payments_repo
                .update_status(payment.id, PaymentStatus::Failed)
                .await?;
            tracing::warn!("payment {} failed due to dispute on charge {}", payment.id, charge.id);
        }

        Ok(())
    }

    /// Confirmation emails must never fail the hook: lookup problems are
    /// logged and the send itself runs detached.
    async fn queue_confirmation_email(&self, ticket_id: Uuid) {
        let lookups = async {
            let ticket = self.tickets_repo.find(ticket_id).await?;
            let Some(ticket) = ticket else { return Ok(None) };
            let user = self.users_repo.find(ticket.customer_id).await?;
            let event = self.events_repo.find(ticket.event_id).await?;
            anyhow::Ok(user.zip(event).map(|(user, event)| (ticket, user, event)))
        };

        match lookups.await {
            Ok(Some((ticket, user, event))) => {
                let mailer = self.mailer.clone();
                tokio::spawn(async move {
                    mailer.send_ticket_confirmation(&user, &ticket, &event).await;
                });
            }
            Ok(None) => {
                tracing::warn!("could not assemble confirmation email for ticket {}", ticket_id)
            }
            Err(e) => tracing::warn!("confirmation email lookups failed for ticket {}: {}", ticket_id, e),
        }
    }
}
