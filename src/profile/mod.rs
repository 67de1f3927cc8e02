pub mod dto;
pub mod handlers;
pub mod repo;
pub mod target;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
