use super::expansion::{Expansion, load_more};
use super::history::{DEFAULT_MAX_BREADCRUMBS, NavigationHistory};
use super::NavigationError;
use crate::fetch::{FetchError, GraphDataCache, NeighborhoodFetcher};
use crate::layout::{LayoutOptions, layout};
use crate::model::{Lane, Neighborhood, ViewGraph, ViewNodeKind, strip_presentation};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct NavigationOptions {
    pub max_breadcrumbs: usize,
    /// Time the outgoing view gets to shrink before any fetch starts.
    pub shrink_delay: Duration,
    /// Time the incoming view gets to expand before the controller is idle.
    pub expand_delay: Duration,
}

impl Default for NavigationOptions {
    fn default() -> Self {
        Self {
            max_breadcrumbs: DEFAULT_MAX_BREADCRUMBS,
            shrink_delay: Duration::from_millis(250),
            expand_delay: Duration::from_millis(350),
        }
    }
}

impl NavigationOptions {
    pub fn immediate() -> Self {
        Self {
            shrink_delay: Duration::ZERO,
            expand_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationPhase {
    Idle,
    Shrinking,
    Fetching,
    Expanding,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationState {
    /// The focal node the user most recently asked for.
    pub focal_id: Option<String>,
    /// Focal node of the view that was on screen when navigation started.
    pub previous_focal_id: Option<String>,
    pub phase: NavigationPhase,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            focal_id: None,
            previous_focal_id: None,
            phase: NavigationPhase::Idle,
        }
    }
}

/// Tag of one navigation request. Only the most recent ticket may commit.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationTicket {
    focal_id: String,
    token: u64,
    pushed_breadcrumb: bool,
    /// Oldest breadcrumb dropped to make room for this request's snapshot.
    evicted: Option<ViewGraph>,
}

impl NavigationTicket {
    pub fn focal_id(&self) -> &str {
        &self.focal_id
    }

    pub fn token(&self) -> u64 {
        self.token
    }
}

/// Data source for a navigation, detached from the controller so it can be
/// awaited without holding it.
pub enum PendingFetch {
    Cached(Arc<Neighborhood>),
    Remote {
        fetcher: NeighborhoodFetcher,
        focal_id: String,
    },
}

impl PendingFetch {
    pub fn is_cached(&self) -> bool {
        matches!(self, PendingFetch::Cached(_))
    }

    pub async fn resolve(self) -> Result<Arc<Neighborhood>, FetchError> {
        match self {
            PendingFetch::Cached(neighborhood) => Ok(neighborhood),
            PendingFetch::Remote { fetcher, focal_id } => {
                fetcher.fetch(&focal_id).await.map(Arc::new)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NavigationOutcome {
    /// A new view was laid out and is now current.
    Committed { focal_id: String },
    /// A newer request superseded this one; its result was dropped.
    Discarded { focal_id: String },
    /// A breadcrumb view was put back on screen.
    Restored { focal_id: String },
    /// A placeholder was selected and its lane grew.
    Expanded(Expansion),
    Unchanged,
}

/// What selecting a view node asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Navigate(NavigationTicket),
    Expanded(Expansion),
    Unchanged,
}

/// Owns the current view and everything needed to move it to another focal
/// node: the neighborhood cache, the breadcrumbs, and the transition phase.
pub struct NavigationController {
    fetcher: NeighborhoodFetcher,
    cache: GraphDataCache,
    history: NavigationHistory,
    layout: LayoutOptions,
    options: NavigationOptions,
    state: NavigationState,
    view: ViewGraph,
    token: u64,
    last_error: Option<String>,
}

impl NavigationController {
    pub fn new(
        fetcher: NeighborhoodFetcher,
        layout: LayoutOptions,
        options: NavigationOptions,
    ) -> Self {
        Self {
            fetcher,
            cache: GraphDataCache::new(),
            history: NavigationHistory::new(options.max_breadcrumbs),
            layout,
            options,
            state: NavigationState::default(),
            view: ViewGraph::default(),
            token: 0,
            last_error: None,
        }
    }

    pub fn with_cache(mut self, cache: GraphDataCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn current_view(&self) -> &ViewGraph {
        &self.view
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn breadcrumbs(&self) -> &NavigationHistory {
        &self.history
    }

    pub fn cache(&self) -> &GraphDataCache {
        &self.cache
    }

    pub fn layout_options(&self) -> &LayoutOptions {
        &self.layout
    }

    pub fn options(&self) -> &NavigationOptions {
        &self.options
    }

    /// Message of the last navigation that failed, cleared by the next attempt.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Show `id` as the first focal node.
    pub async fn open(&mut self, id: &str) -> Result<NavigationOutcome, NavigationError> {
        self.navigate_to(id).await
    }

    /// Re-center on an arbitrary node id.
    pub async fn navigate_to(&mut self, id: &str) -> Result<NavigationOutcome, NavigationError> {
        let ticket = self.begin_navigation(id);
        self.drive(ticket).await
    }

    /// Handle a click on a view node: neighbors become the new focal node,
    /// placeholders grow their lane, the focal node itself is ignored.
    pub async fn on_node_selected(
        &mut self,
        view_node_id: &str,
    ) -> Result<NavigationOutcome, NavigationError> {
        match self.select(view_node_id)? {
            Selection::Navigate(ticket) => self.drive(ticket).await,
            Selection::Expanded(expansion) => Ok(NavigationOutcome::Expanded(expansion)),
            Selection::Unchanged => Ok(NavigationOutcome::Unchanged),
        }
    }

    /// Reveal the next page of `lane`. Refused while the outgoing view is
    /// shrinking or being replaced, since it is already stored as a breadcrumb.
    pub fn on_load_more(&mut self, lane: Lane) -> Result<Expansion, NavigationError> {
        if matches!(
            self.state.phase,
            NavigationPhase::Shrinking | NavigationPhase::Fetching
        ) {
            let pending = self.state.focal_id.clone().unwrap_or_default();
            return Err(NavigationError::InFlight(pending));
        }

        let expansion = load_more(
            &mut self.view,
            lane,
            self.layout.page_size(),
            self.layout.row_spacing,
        )?;
        debug!(lane = %lane, added = expansion.added, remaining = expansion.remaining, "expanded lane");
        Ok(expansion)
    }

    /// Put breadcrumb `index` back on screen and drop every later breadcrumb.
    /// Any navigation still in flight is superseded.
    pub fn on_breadcrumb_selected(
        &mut self,
        index: usize,
    ) -> Result<NavigationOutcome, NavigationError> {
        let entry = self.history.restore(index)?;
        self.token += 1;

        let focal_id = entry.focal_id.clone();
        self.state = NavigationState {
            focal_id: Some(focal_id.clone()),
            previous_focal_id: self.committed_focal(),
            phase: NavigationPhase::Idle,
        };
        self.view = entry;
        self.last_error = None;

        info!(node_id = %focal_id, index, "restored breadcrumb");
        Ok(NavigationOutcome::Restored { focal_id })
    }

    /// Resolve a selection without awaiting anything.
    pub fn select(&mut self, view_node_id: &str) -> Result<Selection, NavigationError> {
        let entry = self
            .view
            .find(view_node_id)
            .ok_or_else(|| NavigationError::NotSelectable(view_node_id.to_string()))?;

        match &entry.kind {
            ViewNodeKind::Placeholder { lane, .. } => {
                let lane = *lane;
                Ok(Selection::Expanded(self.on_load_more(lane)?))
            }
            ViewNodeKind::Focal { .. } => Ok(Selection::Unchanged),
            ViewNodeKind::Neighbor { node, .. } if node.id == self.view.focal_id => {
                Ok(Selection::Unchanged)
            }
            ViewNodeKind::Neighbor { node, .. } => {
                let id = node.id.clone();
                Ok(Selection::Navigate(self.begin_navigation(&id)))
            }
        }
    }

    /// Enter `Shrinking`: record the outgoing view and issue a new ticket.
    ///
    /// The outgoing view is pushed as a breadcrumb unless it equals the newest
    /// one already stored.
    pub fn begin_navigation(&mut self, id: &str) -> NavigationTicket {
        let focal_id = strip_presentation(id).to_string();
        self.token += 1;

        let mut pushed_breadcrumb = false;
        let mut evicted = None;
        if !self.view.is_empty() && self.history.top() != Some(&self.view) {
            evicted = self.history.push(self.view.clone());
            pushed_breadcrumb = true;
        }

        self.state = NavigationState {
            focal_id: Some(focal_id.clone()),
            previous_focal_id: self.committed_focal(),
            phase: NavigationPhase::Shrinking,
        };
        self.last_error = None;

        debug!(node_id = %focal_id, token = self.token, "navigation started");
        NavigationTicket {
            focal_id,
            token: self.token,
            pushed_breadcrumb,
            evicted,
        }
    }

    /// Enter `Fetching` once the shrink delay is over. Returns `None` when the
    /// ticket was superseded in the meantime.
    pub fn start_fetching(&mut self, ticket: &NavigationTicket) -> Option<PendingFetch> {
        if !self.is_current(ticket) {
            debug!(node_id = %ticket.focal_id, token = ticket.token, "stale navigation, not fetching");
            return None;
        }

        self.state.phase = NavigationPhase::Fetching;
        Some(match self.cache.get(&ticket.focal_id) {
            Some(neighborhood) => PendingFetch::Cached(neighborhood),
            None => PendingFetch::Remote {
                fetcher: self.fetcher.clone(),
                focal_id: ticket.focal_id.clone(),
            },
        })
    }

    /// Accept the fetch result for `ticket`.
    ///
    /// Successful results are cached even when stale, but only the current
    /// ticket lays out and commits a view (entering `Expanding`). A failed
    /// focal lookup on the current ticket leaves the committed view untouched,
    /// undoes the breadcrumb push made for it, and is returned as an error.
    pub fn complete_navigation(
        &mut self,
        ticket: &NavigationTicket,
        result: Result<Arc<Neighborhood>, FetchError>,
    ) -> Result<NavigationOutcome, NavigationError> {
        let current = self.is_current(ticket);
        let focal_id = ticket.focal_id.clone();

        let neighborhood = match result {
            Ok(neighborhood) => neighborhood,
            Err(_) if !current => {
                debug!(node_id = %focal_id, "stale navigation failed, ignoring");
                return Ok(NavigationOutcome::Discarded { focal_id });
            }
            Err(source) => {
                warn!(node_id = %focal_id, error = %source, "navigation failed");
                // A current ticket means nothing was pushed after its snapshot
                if ticket.pushed_breadcrumb {
                    self.history.pop();
                    if let Some(evicted) = ticket.evicted.clone() {
                        self.history.push_front(evicted);
                    }
                }
                self.state.focal_id = self.committed_focal();
                self.state.phase = NavigationPhase::Idle;

                let error = NavigationError::FocalLookup {
                    id: focal_id,
                    source,
                };
                self.last_error = Some(error.to_string());
                return Err(error);
            }
        };

        if !self.cache.contains(&focal_id) {
            self.cache.put(&focal_id, neighborhood.clone());
        }

        if !current {
            debug!(node_id = %focal_id, token = ticket.token, "discarding stale neighborhood");
            return Ok(NavigationOutcome::Discarded { focal_id });
        }

        self.state.phase = NavigationPhase::Expanding;
        let mut view = layout(&neighborhood.focal, &neighborhood, &self.layout);
        if let Some(previous) = &self.state.previous_focal_id {
            view.mark_came_from(previous);
        }
        self.view = view;

        info!(
            node_id = %focal_id,
            nodes = self.view.nodes.len(),
            breadcrumbs = self.history.len(),
            "committed view"
        );
        Ok(NavigationOutcome::Committed { focal_id })
    }

    /// Leave `Expanding` once the expand delay is over.
    pub fn finish_expanding(&mut self, ticket: &NavigationTicket) {
        if self.is_current(ticket) && self.state.phase == NavigationPhase::Expanding {
            self.state.phase = NavigationPhase::Idle;
        }
    }

    pub fn is_current(&self, ticket: &NavigationTicket) -> bool {
        ticket.token == self.token
    }

    async fn drive(&mut self, ticket: NavigationTicket) -> Result<NavigationOutcome, NavigationError> {
        tokio::time::sleep(self.options.shrink_delay).await;

        let Some(pending) = self.start_fetching(&ticket) else {
            return Ok(NavigationOutcome::Discarded {
                focal_id: ticket.focal_id,
            });
        };
        let result = pending.resolve().await;
        let outcome = self.complete_navigation(&ticket, result)?;

        if matches!(outcome, NavigationOutcome::Committed { .. }) {
            tokio::time::sleep(self.options.expand_delay).await;
            self.finish_expanding(&ticket);
        }
        Ok(outcome)
    }

    fn committed_focal(&self) -> Option<String> {
        (!self.view.is_empty()).then(|| self.view.focal_id.clone())
    }
}
