use crate::domain::payment::{Payment, PaymentMethod, PaymentStatus};
use anyhow::Result;
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

const PAYMENT_COLUMNS: &str = "id, amount, payment_date, status, transaction_id, payment_method, \
     ticket_id, customer_id, gateway_intent_id, created_at, updated_at";

#[derive(Clone)]
pub struct PaymentsRepo {
    pub pool: PgPool,
}

fn row_to_payment(r: &PgRow) -> Payment {
    let status: String = r.get("status");
    let method: String = r.get("payment_method");
    Payment {
        id: r.get("id"),
        amount: r.get("amount"),
        payment_date: r.get("payment_date"),
        status: PaymentStatus::parse(&status).unwrap_or(PaymentStatus::Failed),
        transaction_id: r.get("transaction_id"),
        payment_method: PaymentMethod::parse(&method).unwrap_or(PaymentMethod::CreditCard),
        ticket_id: r.get("ticket_id"),
        customer_id: r.get("customer_id"),
        gateway_intent_id: r.get("gateway_intent_id"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    }
}

impl PaymentsRepo {
    pub async fn find(&self, id: Uuid) -> Result<Option<Payment>> {
        let row = sqlx::query(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1 AND deleted_at IS NULL",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_payment))
    }

    pub async fn by_customer(&self, customer_id: Uuid) -> Result<Vec<Payment>> {
        let rows = sqlx::query(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE customer_id = $1 AND deleted_at IS NULL ORDER BY created_at DESC",
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_payment).collect())
    }

    pub async fn by_ticket(&self, ticket_id: Uuid) -> Result<Vec<Payment>> {
        let rows = sqlx::query(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE ticket_id = $1 AND deleted_at IS NULL ORDER BY created_at DESC",
        ))
        .bind(ticket_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_payment).collect())
    }

    pub async fn find_by_transaction_id(&self, transaction_id: &str) -> Result<Option<Payment>> {
        let row = sqlx::query(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE transaction_id = $1 AND deleted_at IS NULL",
        ))
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_payment))
    }

    pub async fn find_by_intent(&self, gateway_intent_id: &str) -> Result<Option<Payment>> {
        let row = sqlx::query(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE gateway_intent_id = $1 AND deleted_at IS NULL",
        ))
        .bind(gateway_intent_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_payment))
    }

    pub async fn insert(&self, payment: &Payment) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, amount, payment_date, status, transaction_id, payment_method,
                ticket_id, customer_id, gateway_intent_id, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(payment.id)
        .bind(payment.amount)
        .bind(payment.payment_date)
        .bind(payment.status.as_str())
        .bind(&payment.transaction_id)
        .bind(payment.payment_method.as_str())
        .bind(payment.ticket_id)
        .bind(payment.customer_id)
        .bind(payment.gateway_intent_id.as_deref())
        .bind(payment.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update_status(&self, payment_id: Uuid, status: PaymentStatus) -> Result<bool> {
        let res = sqlx::query(
            "UPDATE payments SET status = $2, updated_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(payment_id)
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }

    /// The webhook guard: the row moves out of PENDING exactly once, no
    /// matter how many deliveries race.
    pub async fn update_status_if_pending(&self, payment_id: Uuid, status: PaymentStatus) -> Result<bool> {
        let res = sqlx::query(
            "UPDATE payments SET status = $2, updated_at = now() WHERE id = $1 AND status = 'PENDING' AND deleted_at IS NULL",
        )
        .bind(payment_id)
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }

    pub async fn attach_intent(&self, payment_id: Uuid, gateway_intent_id: &str) -> Result<bool> {
        let res = sqlx::query(
            "UPDATE payments SET gateway_intent_id = $2, updated_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(payment_id)
        .bind(gateway_intent_id)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }

    /// Refund rows carry a negative amount and the COMPLETED status, so a
    /// plain sum over COMPLETED nets them out.
    pub async fn total_revenue(&self) -> Result<Decimal> {
        let row = sqlx::query(
            "SELECT COALESCE(SUM(amount), 0) AS total FROM payments WHERE status = 'COMPLETED' AND deleted_at IS NULL",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("total"))
    }

    pub async fn revenue_by_organizer(&self, organizer_id: Uuid) -> Result<Decimal> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(SUM(p.amount), 0) AS total
            FROM payments p
            JOIN tickets t ON t.id = p.ticket_id
            JOIN events e ON e.id = t.event_id
            WHERE p.status = 'COMPLETED' AND p.deleted_at IS NULL AND e.organizer_id = $1
            "#,
        )
        .bind(organizer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("total"))
    }
}
