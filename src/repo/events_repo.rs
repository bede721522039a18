use crate::domain::event::{Event, EventSearch, EventUpdate, NewEvent};
use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

const EVENT_COLUMNS: &str = "id, title, description, date, location, category, capacity, \
     available_tickets, base_price, image_url, is_active, organizer_id, created_at, updated_at";

#[derive(Clone)]
pub struct EventsRepo {
    pub pool: PgPool,
}

fn row_to_event(r: &PgRow) -> Event {
    Event {
        id: r.get("id"),
        title: r.get("title"),
        description: r.get("description"),
        date: r.get("date"),
        location: r.get("location"),
        category: r.get("category"),
        capacity: r.get("capacity"),
        available_tickets: r.get("available_tickets"),
        base_price: r.get("base_price"),
        image_url: r.get("image_url"),
        is_active: r.get("is_active"),
        organizer_id: r.get("organizer_id"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    }
}

impl EventsRepo {
    pub async fn list_active(&self) -> Result<Vec<Event>> {
        let rows = sqlx::query(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE is_active = true AND deleted_at IS NULL ORDER BY created_at DESC",
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_event).collect())
    }

    pub async fn list_all(&self) -> Result<Vec<Event>> {
        let rows = sqlx::query(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE deleted_at IS NULL ORDER BY created_at DESC",
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_event).collect())
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Event>> {
        let row = sqlx::query(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1 AND deleted_at IS NULL",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_event))
    }

    pub async fn by_organizer(&self, organizer_id: Uuid) -> Result<Vec<Event>> {
        let rows = sqlx::query(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE organizer_id = $1 AND deleted_at IS NULL ORDER BY created_at DESC",
        ))
        .bind(organizer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_event).collect())
    }

    pub async fn upcoming(&self) -> Result<Vec<Event>> {
        let rows = sqlx::query(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE is_active = true AND deleted_at IS NULL AND date > now() ORDER BY date ASC",
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_event).collect())
    }

    pub async fn search(&self, filter: &EventSearch) -> Result<Vec<Event>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {EVENT_COLUMNS} FROM events
            WHERE is_active = true AND deleted_at IS NULL
              AND ($1::text IS NULL OR category ILIKE '%' || $1 || '%')
              AND ($2::timestamptz IS NULL OR date_trunc('day', date) = date_trunc('day', $2::timestamptz))
              AND ($3::text IS NULL OR location ILIKE '%' || $3 || '%')
              AND ($4::text IS NULL OR title ILIKE '%' || $4 || '%' OR description ILIKE '%' || $4 || '%')
            ORDER BY date DESC
            "#,
        ))
        .bind(filter.category.as_deref())
        .bind(filter.date)
        .bind(filter.location.as_deref())
        .bind(filter.term.as_deref())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_event).collect())
    }

    pub async fn insert(&self, data: &NewEvent) -> Result<Event> {
        let event = Event {
            id: Uuid::new_v4(),
            title: data.title.clone(),
            description: data.description.clone(),
            date: data.date,
            location: data.location.clone(),
            category: data.category.clone(),
            capacity: data.capacity,
            available_tickets: data.capacity,
            base_price: data.base_price,
            image_url: data.image_url.clone().unwrap_or_default(),
            is_active: true,
            organizer_id: data.organizer_id,
            created_at: chrono::Utc::now(),
            updated_at: None,
        };

        sqlx::query(
            r#"
            INSERT INTO events (
                id, title, description, date, location, category, capacity,
                available_tickets, base_price, image_url, is_active, organizer_id, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.location)
        .bind(&event.category)
        .bind(event.capacity)
        .bind(event.available_tickets)
        .bind(event.base_price)
        .bind(&event.image_url)
        .bind(event.is_active)
        .bind(event.organizer_id)
        .bind(event.created_at)
        .execute(&self.pool)
        .await?;

        Ok(event)
    }

    pub async fn update(&self, id: Uuid, data: &EventUpdate) -> Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE events
            SET title = $2, description = $3, date = $4, location = $5, category = $6,
                base_price = $7, image_url = COALESCE($8, image_url), is_active = $9,
                updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.date)
        .bind(&data.location)
        .bind(&data.category)
        .bind(data.base_price)
        .bind(data.image_url.as_deref())
        .bind(data.is_active)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool> {
        let res = sqlx::query(
            "UPDATE events SET deleted_at = now(), updated_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }

    /// Conditional decrement: succeeds only when enough inventory is left,
    /// so concurrent purchases can never drive the counter negative.
    pub async fn try_reserve(&self, event_id: Uuid, count: i32) -> Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE events
            SET available_tickets = available_tickets - $2, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL AND is_active = true AND available_tickets >= $2
            "#,
        )
        .bind(event_id)
        .bind(count)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }

    pub async fn try_reserve_tx(
        tx: &mut Transaction<'_, Postgres>,
        event_id: Uuid,
        count: i32,
    ) -> Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE events
            SET available_tickets = available_tickets - $2, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL AND is_active = true AND available_tickets >= $2
            "#,
        )
        .bind(event_id)
        .bind(count)
        .execute(tx.as_mut())
        .await?;

        Ok(res.rows_affected() == 1)
    }

    /// Returns inventory after a cancel or refund, capped at capacity.
    pub async fn release(&self, event_id: Uuid, count: i32) -> Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE events
            SET available_tickets = available_tickets + $2, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL AND available_tickets + $2 <= capacity
            "#,
        )
        .bind(event_id)
        .bind(count)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }
}
