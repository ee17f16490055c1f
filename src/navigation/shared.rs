//! Driving a controller that several callers share.
//!
//! The lock is only held for the synchronous steps of a transition, so a
//! second selection can start while the first one is still waiting on the
//! network. Whichever request started last wins.

use super::controller::{NavigationController, NavigationOutcome, NavigationTicket, Selection};
use super::NavigationError;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type SharedController = Arc<Mutex<NavigationController>>;

pub async fn select_shared(
    shared: &SharedController,
    view_node_id: &str,
) -> Result<NavigationOutcome, NavigationError> {
    let selection = shared.lock().await.select(view_node_id)?;
    match selection {
        Selection::Navigate(ticket) => drive(shared, ticket).await,
        Selection::Expanded(expansion) => Ok(NavigationOutcome::Expanded(expansion)),
        Selection::Unchanged => Ok(NavigationOutcome::Unchanged),
    }
}

pub async fn navigate_shared(
    shared: &SharedController,
    id: &str,
) -> Result<NavigationOutcome, NavigationError> {
    let ticket = shared.lock().await.begin_navigation(id);
    drive(shared, ticket).await
}

async fn drive(
    shared: &SharedController,
    ticket: NavigationTicket,
) -> Result<NavigationOutcome, NavigationError> {
    let options = shared.lock().await.options().clone();
    tokio::time::sleep(options.shrink_delay).await;

    let pending = shared.lock().await.start_fetching(&ticket);
    let Some(pending) = pending else {
        return Ok(NavigationOutcome::Discarded {
            focal_id: ticket.focal_id().to_string(),
        });
    };

    let result = pending.resolve().await;
    let outcome = shared.lock().await.complete_navigation(&ticket, result)?;

    if matches!(outcome, NavigationOutcome::Committed { .. }) {
        tokio::time::sleep(options.expand_delay).await;
        shared.lock().await.finish_expanding(&ticket);
    }
    Ok(outcome)
}
