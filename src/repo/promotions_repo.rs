use crate::domain::promotion::{NewPromotion, Promotion, PromotionUpdate};
use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

const PROMOTION_COLUMNS: &str = "id, code, description, discount_percentage, start_date, end_date, \
     is_active, event_id, created_at, updated_at";

#[derive(Clone)]
pub struct PromotionsRepo {
    pub pool: PgPool,
}

fn row_to_promotion(r: &PgRow) -> Promotion {
    Promotion {
        id: r.get("id"),
        code: r.get("code"),
        description: r.get("description"),
        discount_percentage: r.get("discount_percentage"),
        start_date: r.get("start_date"),
        end_date: r.get("end_date"),
        is_active: r.get("is_active"),
        event_id: r.get("event_id"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    }
}

impl PromotionsRepo {
    pub async fn list(&self) -> Result<Vec<Promotion>> {
        let rows = sqlx::query(&format!(
            "SELECT {PROMOTION_COLUMNS} FROM promotions WHERE deleted_at IS NULL ORDER BY created_at DESC",
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_promotion).collect())
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Promotion>> {
        let row = sqlx::query(&format!(
            "SELECT {PROMOTION_COLUMNS} FROM promotions WHERE id = $1 AND deleted_at IS NULL",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_promotion))
    }

    /// Codes are stored upper-cased; the lookup is case-sensitive as stored.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<Promotion>> {
        let row = sqlx::query(&format!(
            "SELECT {PROMOTION_COLUMNS} FROM promotions WHERE code = $1 AND deleted_at IS NULL",
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_promotion))
    }

    pub async fn by_event(&self, event_id: Uuid) -> Result<Vec<Promotion>> {
        let rows = sqlx::query(&format!(
            "SELECT {PROMOTION_COLUMNS} FROM promotions WHERE event_id = $1 AND deleted_at IS NULL ORDER BY created_at DESC",
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_promotion).collect())
    }

    pub async fn by_organizer(&self, organizer_id: Uuid) -> Result<Vec<Promotion>> {
        let rows = sqlx::query(
            r#"
            SELECT p.id, p.code, p.description, p.discount_percentage, p.start_date,
                   p.end_date, p.is_active, p.event_id, p.created_at, p.updated_at
            FROM promotions p
            JOIN events e ON e.id = p.event_id
            WHERE e.organizer_id = $1 AND p.deleted_at IS NULL
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(organizer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_promotion).collect())
    }

    pub async fn active(&self) -> Result<Vec<Promotion>> {
        let rows = sqlx::query(&format!(
            "SELECT {PROMOTION_COLUMNS} FROM promotions WHERE deleted_at IS NULL AND is_active = true AND start_date <= now() AND end_date >= now() ORDER BY created_at DESC",
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_promotion).collect())
    }

    pub async fn insert(&self, promotion: &Promotion) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO promotions (
                id, code, description, discount_percentage, start_date, end_date,
                is_active, event_id, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(promotion.id)
        .bind(&promotion.code)
        .bind(&promotion.description)
        .bind(promotion.discount_percentage)
        .bind(promotion.start_date)
        .bind(promotion.end_date)
        .bind(promotion.is_active)
        .bind(promotion.event_id)
        .bind(promotion.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update(&self, id: Uuid, data: &PromotionUpdate) -> Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE promotions
            SET description = $2, discount_percentage = $3, start_date = $4, end_date = $5,
                is_active = $6, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(&data.description)
        .bind(data.discount_percentage)
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(data.is_active)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool> {
        let res = sqlx::query(
            "UPDATE promotions SET deleted_at = now(), updated_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }

    pub async fn validate_code(&self, code: &str, event_id: Uuid) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT 1 AS hit FROM promotions
            WHERE code = $1 AND event_id = $2 AND deleted_at IS NULL
              AND is_active = true AND start_date <= now() AND end_date >= now()
            "#,
        )
        .bind(code)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    pub async fn is_owned_by_organizer(&self, promotion_id: Uuid, organizer_id: Uuid) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT 1 AS hit FROM promotions p
            JOIN events e ON e.id = p.event_id
            WHERE p.id = $1 AND e.organizer_id = $2 AND p.deleted_at IS NULL
            "#,
        )
        .bind(promotion_id)
        .bind(organizer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }
}
