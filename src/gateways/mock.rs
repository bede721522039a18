use crate::gateways::{CheckoutGateway, CheckoutSessionRequest};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Stand-in gateway for local runs without credentials.
pub struct MockGateway {
    pub checkout_base: String,
    pub behavior: String,
}

#[async_trait::async_trait]
impl CheckoutGateway for MockGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_checkout_session(&self, request: CheckoutSessionRequest) -> Option<String> {
        if self.behavior == "ALWAYS_FAILURE" {
            return None;
        }

        tracing::info!(
            "mock checkout session for {} payment(s), amount {}",
            request.payment_ids.len(),
            request.amount
        );
        Some(format!("{}/session/{}", self.checkout_base, Uuid::new_v4().simple()))
    }

    async fn create_refund(&self, gateway_intent_id: &str, _amount: Decimal) -> Option<String> {
        if self.behavior == "ALWAYS_FAILURE" {
            return None;
        }

        tracing::info!("mock refund for intent {}", gateway_intent_id);
        Some(format!("re_mock_{}", Uuid::new_v4().simple()))
    }
}
