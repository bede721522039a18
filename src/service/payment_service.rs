use crate::domain::payment::{generate_transaction_id, Payment, PaymentMethod, PaymentStatus};
use crate::gateways::CheckoutGateway;
use crate::repo::payments_repo::PaymentsRepo;
use crate::repo::tickets_repo::TicketsRepo;
use anyhow::Result;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct PaymentService {
    pub payments_repo: PaymentsRepo,
    pub tickets_repo: TicketsRepo,
    pub gateway: Arc<dyn CheckoutGateway>,
}

impl PaymentService {
    pub async fn find(&self, id: Uuid) -> Result<Option<Payment>> {
        self.payments_repo.find(id).await
    }

    pub async fn by_customer(&self, customer_id: Uuid) -> Result<Vec<Payment>> {
        self.payments_repo.by_customer(customer_id).await
    }

    pub async fn by_ticket(&self, ticket_id: Uuid) -> Result<Vec<Payment>> {
        self.payments_repo.by_ticket(ticket_id).await
    }

    /// Creates the Pending row that a later webhook (or an explicit status
    /// call for offline methods) settles. Returns None when the ticket
    /// does not exist; the caller keeps the id for webhook correlation.
    pub async fn process_payment(
        &self,
        ticket_id: Uuid,
        customer_id: Uuid,
        method: PaymentMethod,
        amount: Decimal,
    ) -> Result<Option<Payment>> {
        if self.tickets_repo.find(ticket_id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now();
        let payment = Payment {
            id: Uuid::new_v4(),
            amount,
            payment_date: now,
            status: PaymentStatus::Pending,
            transaction_id: generate_transaction_id(now),
            payment_method: method,
            ticket_id,
            customer_id,
            gateway_intent_id: None,
            created_at: now,
            updated_at: None,
        };

        self.payments_repo.insert(&payment).await?;
        Ok(Some(payment))
    }

    /// Unconditional overwrite, used by the admin surface and the offline
    /// settlement path.
    pub async fn update_status(&self, payment_id: Uuid, status: PaymentStatus) -> Result<bool> {
        self.payments_repo.update_status(payment_id, status).await
    }

    pub async fn complete_if_pending(&self, payment_id: Uuid) -> Result<bool> {
        self.payments_repo
            .update_status_if_pending(payment_id, PaymentStatus::Completed)
            .await
    }

    pub async fn fail_if_pending(&self, payment_id: Uuid) -> Result<bool> {
        self.payments_repo
            .update_status_if_pending(payment_id, PaymentStatus::Failed)
            .await
    }

    pub async fn attach_intent(&self, payment_id: Uuid, gateway_intent_id: &str) -> Result<bool> {
        self.payments_repo.attach_intent(payment_id, gateway_intent_id).await
    }

    /// Finds the newest Completed payment for the ticket and books the
    /// refund: a gateway-side refund when an intent id is on file (failure
    /// logged, not fatal), a negated-amount Completed row, and the original
    /// flipped to Refunded. False when nothing refundable exists.
    pub async fn process_refund(&self, ticket_id: Uuid) -> Result<bool> {
        let payments = self.payments_repo.by_ticket(ticket_id).await?;
        let Some(original) = payments.iter().find(|p| p.status == PaymentStatus::Completed) else {
            return Ok(false);
        };

        if let Some(intent_id) = &original.gateway_intent_id {
            match self.gateway.create_refund(intent_id, original.amount).await {
                Some(refund_id) => {
                    tracing::info!("gateway refund {} issued for payment {}", refund_id, original.id)
                }
                None => tracing::warn!(
                    "gateway refund failed for payment {}; recording local refund anyway",
                    original.id
                ),
            }
        }

        let now = chrono::Utc::now();
        let refund = Payment {
            id: Uuid::new_v4(),
            amount: -original.amount,
            payment_date: now,
            status: PaymentStatus::Completed,
            transaction_id: generate_transaction_id(now),
            payment_method: original.payment_method,
            ticket_id,
            customer_id: original.customer_id,
            gateway_intent_id: None,
            created_at: now,
            updated_at: None,
        };

        self.payments_repo.insert(&refund).await?;
        self.payments_repo
            .update_status(original.id, PaymentStatus::Refunded)
            .await?;

        Ok(true)
    }

    pub async fn validate_payment(&self, transaction_id: &str) -> Result<bool> {
        Ok(self
            .payments_repo
            .find_by_transaction_id(transaction_id)
            .await?
            .map(|p| p.status == PaymentStatus::Completed)
            .unwrap_or(false))
    }

    pub async fn total_revenue(&self) -> Result<Decimal> {
        self.payments_repo.total_revenue().await
    }

    pub async fn revenue_by_organizer(&self, organizer_id: Uuid) -> Result<Decimal> {
        self.payments_repo.revenue_by_organizer(organizer_id).await
    }
}
