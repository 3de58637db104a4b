use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, Month, OffsetDateTime};
use uuid::Uuid;

use crate::error::ApiError;

/// Journal row. Identity is the `(user_id, date)` pair; the surrogate id
/// exists only for foreign-key hygiene.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Journal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: Date,
    pub color: String,
    pub content: String,
    pub is_private: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// `[year-01-01, (year+1)-01-01)` as a half-open date range.
pub fn year_bounds(year: i32) -> Result<(Date, Date), ApiError> {
    let start = Date::from_calendar_date(year, Month::January, 1)
        .map_err(|_| ApiError::Validation(format!("Invalid year: {year}")))?;
    let end = year
        .checked_add(1)
        .and_then(|next| Date::from_calendar_date(next, Month::January, 1).ok())
        .ok_or_else(|| ApiError::Validation(format!("Invalid year: {year}")))?;
    Ok((start, end))
}

impl Journal {
    /// All entries of one user, ascending by date.
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<Journal>> {
        sqlx::query_as::<_, Journal>(
            r#"
            SELECT id, user_id, date, color, content, is_private, created_at, updated_at
            FROM journals
            WHERE user_id = $1
            ORDER BY date ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    /// Entries whose date falls in the half-open range `[start, end)`.
    pub async fn list_by_user_between(
        db: &PgPool,
        user_id: Uuid,
        start: Date,
        end: Date,
    ) -> sqlx::Result<Vec<Journal>> {
        sqlx::query_as::<_, Journal>(
            r#"
            SELECT id, user_id, date, color, content, is_private, created_at, updated_at
            FROM journals
            WHERE user_id = $1 AND date >= $2 AND date < $3
            ORDER BY date ASC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await
    }

    /// Atomic insert-or-replace keyed by `(user_id, date)`. Concurrent
    /// writers for the same key cannot produce a duplicate row: the unique
    /// constraint resolves the race inside one statement.
    pub async fn upsert(
        db: &PgPool,
        user_id: Uuid,
        date: Date,
        color: &str,
        content: &str,
        is_private: bool,
    ) -> sqlx::Result<Journal> {
        sqlx::query_as::<_, Journal>(
            r#"
            INSERT INTO journals (user_id, date, color, content, is_private)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, date) DO UPDATE
            SET color = EXCLUDED.color,
                content = EXCLUDED.content,
                is_private = EXCLUDED.is_private,
                updated_at = now()
            RETURNING id, user_id, date, color, content, is_private, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(color)
        .bind(content)
        .bind(is_private)
        .fetch_one(db)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn year_bounds_are_half_open() {
        let (start, end) = year_bounds(2025).unwrap();
        assert_eq!(start, date!(2025 - 01 - 01));
        assert_eq!(end, date!(2026 - 01 - 01));
        // Dec 31 is the last date inside the range
        assert!(date!(2025 - 12 - 31) >= start && date!(2025 - 12 - 31) < end);
    }

    #[test]
    fn year_bounds_reject_out_of_range_years() {
        assert!(year_bounds(i32::MAX).is_err());
    }
}
