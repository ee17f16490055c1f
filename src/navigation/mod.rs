//! Re-centering the view: the navigation state machine, breadcrumbs, and
//! incremental lane expansion.

mod controller;
mod expansion;
mod history;
mod shared;

pub use controller::{
    NavigationController, NavigationOptions, NavigationOutcome, NavigationPhase, NavigationState,
    NavigationTicket, PendingFetch, Selection,
};
pub use expansion::{Expansion, load_more};
pub use history::{DEFAULT_MAX_BREADCRUMBS, NavigationHistory};
pub use shared::{SharedController, navigate_shared, select_shared};

use crate::fetch::FetchError;
use crate::model::{Lane, UnknownLane};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("Could not load node {id}: {source}")]
    FocalLookup {
        id: String,
        #[source]
        source: FetchError,
    },
    #[error("Node {0} is not part of the current view")]
    NotSelectable(String),
    #[error("Still navigating to {0}, try again once it is shown")]
    InFlight(String),
    #[error("Lane {0} has no more neighbors to load")]
    NoPlaceholder(Lane),
    #[error("Breadcrumb {index} does not exist ({len} stored)")]
    BreadcrumbOutOfRange { index: usize, len: usize },
    #[error(transparent)]
    UnknownLane(#[from] UnknownLane),
}
