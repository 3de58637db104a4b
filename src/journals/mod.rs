use axum::Router;

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod repo;
pub mod window;

pub fn router() -> Router<AppState> {
    handlers::router()
}
