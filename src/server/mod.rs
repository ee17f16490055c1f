//! HTTP surface of the navigator: the current view as JSON plus the three
//! user actions (select, load more, restore breadcrumb).

mod assets;
mod routes;

pub use routes::{ApiError, AppState, StateResponse, router, serve};
