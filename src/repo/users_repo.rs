use crate::domain::user::{User, UserRole};
use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct UsersRepo {
    pub pool: PgPool,
}

fn row_to_user(r: &PgRow) -> User {
    let role: String = r.get("role");
    User {
        id: r.get("id"),
        email: r.get("email"),
        first_name: r.get("first_name"),
        last_name: r.get("last_name"),
        role: UserRole::parse(&role).unwrap_or(UserRole::Customer),
        loyalty_points: r.get("loyalty_points"),
        is_active: r.get("is_active"),
        created_at: r.get("created_at"),
    }
}

impl UsersRepo {
    pub async fn find(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, email, first_name, last_name, role, loyalty_points, is_active, created_at \
             FROM users WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_user))
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(
            "SELECT id, email, first_name, last_name, role, loyalty_points, is_active, created_at \
             FROM users WHERE deleted_at IS NULL ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_user).collect())
    }
}
