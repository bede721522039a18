use crate::domain::ticket::{Ticket, TicketStatus};
use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

const TICKET_COLUMNS: &str =
    "id, qr_code, price, seat_number, status, purchase_date, event_id, customer_id, created_at, updated_at";

#[derive(Clone)]
pub struct TicketsRepo {
    pub pool: PgPool,
}

fn row_to_ticket(r: &PgRow) -> Ticket {
    let status: String = r.get("status");
    Ticket {
        id: r.get("id"),
        qr_code: r.get("qr_code"),
        price: r.get("price"),
        seat_number: r.get("seat_number"),
        status: TicketStatus::parse(&status).unwrap_or(TicketStatus::Cancelled),
        purchase_date: r.get("purchase_date"),
        event_id: r.get("event_id"),
        customer_id: r.get("customer_id"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    }
}

impl TicketsRepo {
    pub async fn find(&self, id: Uuid) -> Result<Option<Ticket>> {
        let row = sqlx::query(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE id = $1 AND deleted_at IS NULL",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_ticket))
    }

    pub async fn find_by_qr(&self, qr_code: &str) -> Result<Option<Ticket>> {
        let row = sqlx::query(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE qr_code = $1 AND deleted_at IS NULL",
        ))
        .bind(qr_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_ticket))
    }

    pub async fn by_customer(&self, customer_id: Uuid) -> Result<Vec<Ticket>> {
        let rows = sqlx::query(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE customer_id = $1 AND deleted_at IS NULL ORDER BY created_at DESC",
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_ticket).collect())
    }

    pub async fn by_event(&self, event_id: Uuid) -> Result<Vec<Ticket>> {
        let rows = sqlx::query(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE event_id = $1 AND deleted_at IS NULL ORDER BY created_at DESC",
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_ticket).collect())
    }

    pub async fn insert_tx(tx: &mut Transaction<'_, Postgres>, ticket: &Ticket) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tickets (
                id, qr_code, price, seat_number, status, purchase_date,
                event_id, customer_id, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(ticket.id)
        .bind(&ticket.qr_code)
        .bind(ticket.price)
        .bind(&ticket.seat_number)
        .bind(ticket.status.as_str())
        .bind(ticket.purchase_date)
        .bind(ticket.event_id)
        .bind(ticket.customer_id)
        .bind(ticket.created_at)
        .execute(tx.as_mut())
        .await?;

        Ok(())
    }

    pub async fn update_status(&self, ticket_id: Uuid, status: TicketStatus) -> Result<bool> {
        let res = sqlx::query(
            "UPDATE tickets SET status = $2, updated_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(ticket_id)
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }

    /// Guarded transition; 0 rows means the ticket was missing or not in
    /// the expected state.
    pub async fn update_status_if(
        &self,
        ticket_id: Uuid,
        from: TicketStatus,
        to: TicketStatus,
    ) -> Result<bool> {
        let res = sqlx::query(
            "UPDATE tickets SET status = $3, updated_at = now() WHERE id = $1 AND status = $2 AND deleted_at IS NULL",
        )
        .bind(ticket_id)
        .bind(from.as_str())
        .bind(to.as_str())
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }
}
