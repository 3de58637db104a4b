use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        jwt::{AuthUser, OptionalAuthUser},
        repo_types::User,
    },
    error::ApiError,
    state::AppState,
};

use super::dto::{format_date, parse_date, JournalEntryResponse, UpsertJournalRequest, YearQuery};
use super::repo::{year_bounds, Journal};
use super::window;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/journals", post(upsert_journal))
        .route("/journals/:username", get(list_journals))
        .route("/journals/:username/years", get(list_years))
}

/// Entry-level privacy: owners see everything, everyone else only the
/// entries not flagged private.
fn visible_to(entries: Vec<Journal>, caller: Option<Uuid>, owner: Uuid) -> Vec<Journal> {
    let is_owner = caller == Some(owner);
    entries
        .into_iter()
        .filter(|e| is_owner || !e.is_private)
        .collect()
}

/// Distinct years of the given entries, newest first. Runs over the
/// already-privacy-filtered list so a year holding only private entries is
/// not revealed to strangers.
fn years_of(entries: &[Journal]) -> Vec<i32> {
    let mut years: Vec<i32> = entries.iter().map(|e| e.date.year()).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

fn to_response(entry: Journal) -> JournalEntryResponse {
    JournalEntryResponse {
        date: format_date(entry.date),
        color: entry.color,
        content: entry.content,
        is_private: entry.is_private,
    }
}

async fn resolve_username(state: &AppState, username: &str) -> Result<User, ApiError> {
    User::find_by_username(&state.db, username)
        .await?
        .ok_or_else(|| {
            warn!(%username, "unknown username");
            ApiError::NotFound("User not found".into())
        })
}

/// GET /journals/:username[?year=YYYY], entries ascending by date.
/// Private entries are visible to their owner only.
#[instrument(skip(state))]
pub async fn list_journals(
    State(state): State<AppState>,
    OptionalAuthUser(caller): OptionalAuthUser,
    Path(username): Path<String>,
    Query(query): Query<YearQuery>,
) -> Result<Json<Vec<JournalEntryResponse>>, ApiError> {
    let user = resolve_username(&state, &username).await?;

    let entries = match query.year {
        Some(year) => {
            let (start, end) = year_bounds(year)?;
            Journal::list_by_user_between(&state.db, user.id, start, end).await?
        }
        None => Journal::list_by_user(&state.db, user.id).await?,
    };

    let items = visible_to(entries, caller, user.id)
        .into_iter()
        .map(to_response)
        .collect();
    Ok(Json(items))
}

/// GET /journals/:username/years, newest year first. Years are derived
/// from the entries visible to the caller, same gate as the listing.
#[instrument(skip(state))]
pub async fn list_years(
    State(state): State<AppState>,
    OptionalAuthUser(caller): OptionalAuthUser,
    Path(username): Path<String>,
) -> Result<Json<Vec<i32>>, ApiError> {
    let user = resolve_username(&state, &username).await?;
    let entries = Journal::list_by_user(&state.db, user.id).await?;
    let years = years_of(&visible_to(entries, caller, user.id));
    Ok(Json(years))
}

/// POST /journals. Atomic upsert keyed by (owner, date), guarded by the
/// edit-window policy. The owner is the verified token subject.
#[instrument(skip(state, payload))]
pub async fn upsert_journal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpsertJournalRequest>,
) -> Result<Json<JournalEntryResponse>, ApiError> {
    if payload.color.trim().is_empty() {
        return Err(ApiError::Validation("Color must not be empty".into()));
    }
    let date = parse_date(&payload.date)?;

    let today = window::today();
    if let Err(violation) = window::check(date, today) {
        warn!(user_id = %user_id, date = %payload.date, reason = violation.reason(), "write outside edit window");
        return Err(violation.into());
    }

    let entry = Journal::upsert(
        &state.db,
        user_id,
        date,
        payload.color.trim(),
        &payload.content,
        payload.is_private,
    )
    .await?;

    info!(user_id = %user_id, date = %payload.date, "journal upserted");
    Ok(Json(to_response(entry)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use time::OffsetDateTime;

    fn entry(d: time::Date, private: bool) -> Journal {
        Journal {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            date: d,
            color: "teal".into(),
            content: "entry".into(),
            is_private: private,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn projection_renders_plain_date() {
        let res = to_response(entry(date!(2025 - 06 - 08), false));
        assert_eq!(res.date, "2025-06-08");
        assert_eq!(res.color, "teal");
    }

    #[test]
    fn private_entries_hidden_from_non_owners() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let entries = || {
            vec![
                entry(date!(2025 - 06 - 07), false),
                entry(date!(2025 - 06 - 08), true),
            ]
        };

        assert_eq!(visible_to(entries(), None, owner).len(), 1);
        assert_eq!(visible_to(entries(), Some(stranger), owner).len(), 1);
        assert_eq!(visible_to(entries(), Some(owner), owner).len(), 2);
    }

    #[test]
    fn years_are_distinct_and_descending() {
        let entries = vec![
            entry(date!(2024 - 03 - 01), false),
            entry(date!(2025 - 06 - 07), false),
            entry(date!(2025 - 06 - 08), false),
        ];
        assert_eq!(years_of(&entries), vec![2025, 2024]);
    }

    #[test]
    fn only_private_years_hidden_from_non_owners() {
        let owner = Uuid::new_v4();
        // 2025 holds only private entries, 2024 has a public one
        let entries = || {
            vec![
                entry(date!(2024 - 03 - 01), false),
                entry(date!(2025 - 06 - 07), true),
                entry(date!(2025 - 06 - 08), true),
            ]
        };

        assert_eq!(years_of(&visible_to(entries(), None, owner)), vec![2024]);
        assert_eq!(
            years_of(&visible_to(entries(), Some(owner), owner)),
            vec![2025, 2024]
        );
    }
}
