use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Admin/organizer CSV rollups. Queries here are read-only; the CSV
/// builders are plain string formatting with a fixed header per report.
#[derive(Clone)]
pub struct ReportService {
    pub pool: PgPool,
}

#[derive(Debug, Clone)]
pub struct SalesRow {
    pub ticket_id: Uuid,
    pub event_title: String,
    pub customer_email: String,
    pub price: Decimal,
    pub ticket_status: String,
    pub payment_status: String,
    pub purchase_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub loyalty_points: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct EventRow {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
    pub available_tickets: i32,
    pub base_price: Decimal,
    pub is_active: bool,
    pub tickets_sold: i64,
}

#[derive(Debug, Clone)]
pub struct RevenueRow {
    pub organizer_id: Uuid,
    pub organizer_email: String,
    pub events_count: i64,
    pub tickets_sold: i64,
    pub revenue: Decimal,
}

impl ReportService {
    pub async fn sales(&self) -> Result<Vec<SalesRow>> {
        let rows = sqlx::query(
            r#"
            SELECT t.id AS ticket_id, e.title AS event_title, u.email AS customer_email,
                   t.price, t.status AS ticket_status,
                   COALESCE(
                       (SELECT p.status FROM payments p
                        WHERE p.ticket_id = t.id AND p.deleted_at IS NULL
                        ORDER BY p.created_at DESC LIMIT 1),
                       'PENDING') AS payment_status,
                   t.purchase_date
            FROM tickets t
            JOIN events e ON e.id = t.event_id
            JOIN users u ON u.id = t.customer_id
            WHERE t.deleted_at IS NULL
            ORDER BY t.purchase_date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| SalesRow {
                ticket_id: r.get("ticket_id"),
                event_title: r.get("event_title"),
                customer_email: r.get("customer_email"),
                price: r.get("price"),
                ticket_status: r.get("ticket_status"),
                payment_status: r.get("payment_status"),
                purchase_date: r.get("purchase_date"),
            })
            .collect())
    }

    pub async fn users(&self) -> Result<Vec<UserRow>> {
        let rows = sqlx::query(
            r#"
            SELECT id, email, first_name || ' ' || last_name AS full_name, role, loyalty_points, is_active
            FROM users
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| UserRow {
                id: r.get("id"),
                email: r.get("email"),
                full_name: r.get("full_name"),
                role: r.get("role"),
                loyalty_points: r.get("loyalty_points"),
                is_active: r.get("is_active"),
            })
            .collect())
    }

    pub async fn events(&self) -> Result<Vec<EventRow>> {
        let rows = sqlx::query(
            r#"
            SELECT e.id, e.title, e.category, e.date, e.location, e.capacity,
                   e.available_tickets, e.base_price, e.is_active,
                   (SELECT COUNT(*) FROM tickets t
                    WHERE t.event_id = e.id AND t.deleted_at IS NULL) AS tickets_sold
            FROM events e
            WHERE e.deleted_at IS NULL
            ORDER BY e.date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| EventRow {
                id: r.get("id"),
                title: r.get("title"),
                category: r.get("category"),
                date: r.get("date"),
                location: r.get("location"),
                capacity: r.get("capacity"),
                available_tickets: r.get("available_tickets"),
                base_price: r.get("base_price"),
                is_active: r.get("is_active"),
                tickets_sold: r.get("tickets_sold"),
            })
            .collect())
    }

    pub async fn revenue(&self) -> Result<Vec<RevenueRow>> {
        let rows = sqlx::query(
            r#"
            SELECT u.id AS organizer_id, u.email AS organizer_email,
                   COUNT(DISTINCT e.id) AS events_count,
                   COUNT(t.id) AS tickets_sold,
                   COALESCE(SUM(p.amount) FILTER (WHERE p.status = 'COMPLETED'), 0) AS revenue
            FROM users u
            JOIN events e ON e.organizer_id = u.id AND e.deleted_at IS NULL
            LEFT JOIN tickets t ON t.event_id = e.id AND t.deleted_at IS NULL
            LEFT JOIN payments p ON p.ticket_id = t.id AND p.deleted_at IS NULL
            WHERE u.deleted_at IS NULL
            GROUP BY u.id, u.email
            ORDER BY revenue DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| RevenueRow {
                organizer_id: r.get("organizer_id"),
                organizer_email: r.get("organizer_email"),
                events_count: r.get("events_count"),
                tickets_sold: r.get("tickets_sold"),
                revenue: r.get("revenue"),
            })
            .collect())
    }
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn sales_csv(rows: &[SalesRow]) -> String {
    let mut out = String::from("ticket_id,event,customer,price,ticket_status,payment_status,purchase_date\n");
    for row in rows {
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            row.ticket_id,
            csv_field(&row.event_title),
            csv_field(&row.customer_email),
            row.price,
            row.ticket_status,
            row.payment_status,
            row.purchase_date.format("%Y-%m-%d %H:%M:%S"),
        ));
    }
    out
}

pub fn users_csv(rows: &[UserRow]) -> String {
    let mut out = String::from("user_id,email,name,role,loyalty_points,is_active\n");
    for row in rows {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            row.id,
            csv_field(&row.email),
            csv_field(&row.full_name),
            row.role,
            row.loyalty_points,
            row.is_active,
        ));
    }
    out
}

pub fn events_csv(rows: &[EventRow]) -> String {
    let mut out = String::from(
        "event_id,title,category,date,location,capacity,available_tickets,base_price,is_active,tickets_sold\n",
    );
    for row in rows {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{}\n",
            row.id,
            csv_field(&row.title),
            csv_field(&row.category),
            row.date.format("%Y-%m-%d %H:%M:%S"),
            csv_field(&row.location),
            row.capacity,
            row.available_tickets,
            row.base_price,
            row.is_active,
            row.tickets_sold,
        ));
    }
    out
}

pub fn revenue_csv(rows: &[RevenueRow]) -> String {
    let mut out = String::from("organizer_id,organizer_email,events,tickets_sold,revenue\n");
    for row in rows {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            row.organizer_id,
            csv_field(&row.organizer_email),
            row.events_count,
            row.tickets_sold,
            row.revenue,
        ));
    }
    out
}
