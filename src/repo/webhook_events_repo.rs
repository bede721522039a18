use anyhow::Result;
use sqlx::PgPool;

#[derive(Clone)]
pub struct WebhookEventsRepo {
    pub pool: PgPool,
}

impl WebhookEventsRepo {
    /// Records a gateway event id before any side effect runs. Returns
    /// false when the id was already seen, making redelivery a no-op.
    pub async fn try_record(&self, event_id: &str, event_type: &str) -> Result<bool> {
        let res = sqlx::query(
            "INSERT INTO webhook_events (event_id, event_type) VALUES ($1, $2) ON CONFLICT (event_id) DO NOTHING",
        )
        .bind(event_id)
        .bind(event_type)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }
}
