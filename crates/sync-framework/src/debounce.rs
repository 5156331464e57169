//! # Query Debouncer
//!
//! Turns the bursty input of a list screen (keystrokes in the search box, filter
//! picks, page clicks) into a bounded stream of fetches that always reflects the
//! latest intent.
//!
//! ## State machine
//!
//! ```text
//!            search input                 window elapsed
//!   Idle ───────────────────▶ Pending ─────────────────────▶ Inflight
//!    ▲                        │  ▲ search input                 │
//!    │                        │  └──(timer restarted)           │
//!    └────────────────────────┴─────── fetch settled ◀──────────┘
//! ```
//!
//! - A search-term change resets the page to 1 and (re)starts the delay window. The
//!   previous timer is dropped outright, so superseded keystrokes never fetch.
//! - When the window elapses the fetch uses the filter state *as it is then*, not as
//!   it was when the window opened.
//! - Page changes of server-paginated resources, filter changes and explicit
//!   refreshes skip the window and fetch immediately, discarding a pending timer.
//! - Mounting performs one immediate fetch with the default filter state.
//!
//! In-flight fetches are never aborted. A newer fetch simply takes a newer request
//! token, and the store discards the older result when it lands. Tokens are taken
//! on the debouncer's own loop before the fetch task is spawned, so their order is
//! the order of the inputs regardless of how the runtime schedules the tasks.

use crate::coordinator::MutationCoordinator;
use crate::error::SyncError;
use crate::filter::{FilterState, FilterValue};
use crate::resource::{PaginationMode, Resource};
use crate::settings::SyncSettings;
use crate::store::FetchOutcome;
use std::pin::Pin;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::Sleep;
use tracing::{debug, info, warn};

/// Observable phase of a debouncer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    /// No timer armed and no fetch outstanding.
    Idle,
    /// A search timer is armed.
    Pending,
    /// At least one fetch is waiting on the gateway and no timer is armed.
    Inflight,
}

/// User input forwarded to a debouncer.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryEvent {
    Search(String),
    SetFilter { key: String, value: FilterValue },
    ClearFilter(String),
    /// Server-paginated resources fetch the new page at once. Client-paginated
    /// resources already hold the whole list and the projection slices it, so only
    /// the filter state changes.
    Page(u32),
    Refresh,
}

/// Owns the filter state and the timer of one list screen.
pub struct QueryDebouncer<R: Resource> {
    coordinator: MutationCoordinator<R>,
    events: mpsc::Receiver<QueryEvent>,
    filters: watch::Sender<FilterState>,
    state: watch::Sender<DebounceState>,
    window: Duration,
    timer: Option<Pin<Box<Sleep>>>,
    inflight: JoinSet<Result<FetchOutcome, SyncError>>,
}

impl<R: Resource> QueryDebouncer<R> {
    /// Creates a debouncer and the handle a screen uses to feed it.
    pub fn new(
        coordinator: MutationCoordinator<R>,
        settings: &SyncSettings,
    ) -> (Self, QueryHandle) {
        let (events_tx, events) = mpsc::channel(settings.buffer_size.max(1));
        let (filters, filters_rx) = watch::channel(FilterState::default());
        let (state, state_rx) = watch::channel(DebounceState::Idle);
        let debouncer = Self {
            coordinator,
            events,
            filters,
            state,
            window: settings.debounce(),
            timer: None,
            inflight: JoinSet::new(),
        };
        let handle = QueryHandle {
            events: events_tx,
            filters: filters_rx,
            state: state_rx,
        };
        (debouncer, handle)
    }

    /// Creates a debouncer and spawns it on the current runtime.
    pub fn spawn(
        coordinator: MutationCoordinator<R>,
        settings: &SyncSettings,
    ) -> (QueryHandle, JoinHandle<()>) {
        let (debouncer, handle) = Self::new(coordinator, settings);
        (handle, tokio::spawn(debouncer.run()))
    }

    /// Runs until the handle is dropped or closed, then lets outstanding fetches land.
    pub async fn run(mut self) {
        let resource = R::NAME;
        info!(resource, window_ms = self.window.as_millis() as u64, "Debouncer started");

        self.fetch_now("mount").await;
        self.publish_state();

        loop {
            tokio::select! {
                event = self.events.recv() => match event {
                    Some(event) => self.handle(event).await,
                    None => break,
                },
                () = wait_for_timer(&mut self.timer) => {
                    self.timer = None;
                    self.fetch_now("search").await;
                }
                Some(joined) = self.inflight.join_next(), if !self.inflight.is_empty() => {
                    log_settled(resource, joined);
                }
            }
            self.publish_state();
        }

        self.timer = None;
        while let Some(joined) = self.inflight.join_next().await {
            log_settled(resource, joined);
        }
        self.publish_state();
        info!(resource, "Debouncer stopped");
    }

    async fn handle(&mut self, event: QueryEvent) {
        debug!(resource = R::NAME, ?event, "Query event");
        match event {
            QueryEvent::Search(term) => {
                if self.filters.send_if_modified(|f| f.set_search_term(term)) {
                    self.timer = Some(Box::pin(tokio::time::sleep(self.window)));
                }
            }
            QueryEvent::SetFilter { key, value } => {
                if self.filters.send_if_modified(|f| f.set_filter(key, value)) {
                    self.fetch_now("filter").await;
                }
            }
            QueryEvent::ClearFilter(key) => {
                if self.filters.send_if_modified(|f| f.clear_filter(&key)) {
                    self.fetch_now("filter").await;
                }
            }
            QueryEvent::Page(page) => {
                let changed = self.filters.send_if_modified(|f| f.set_page(page));
                if changed && R::PAGINATION == PaginationMode::Server {
                    self.fetch_now("page").await;
                }
            }
            QueryEvent::Refresh => self.fetch_now("refresh").await,
        }
    }

    /// Disarms the timer, takes a request token and starts a fetch with the
    /// current filter state.
    async fn fetch_now(&mut self, reason: &'static str) {
        self.timer = None;
        let filters = self.filters.borrow().clone();
        let token = match self.coordinator.collection().begin_fetch().await {
            Ok(token) => token,
            Err(error) => {
                warn!(resource = R::NAME, reason, %error, "Cannot start fetch");
                return;
            }
        };
        debug!(
            resource = R::NAME,
            reason,
            %token,
            search = filters.search_term(),
            page = filters.page(),
            "Issuing fetch"
        );
        let coordinator = self.coordinator.clone();
        self.inflight
            .spawn(async move { coordinator.fetch_with_token(token, &filters).await });
    }

    fn publish_state(&self) {
        let next = if self.timer.is_some() {
            DebounceState::Pending
        } else if !self.inflight.is_empty() {
            DebounceState::Inflight
        } else {
            DebounceState::Idle
        };
        self.state.send_if_modified(|current| {
            let changed = *current != next;
            *current = next;
            changed
        });
    }
}

async fn wait_for_timer(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(sleep) => sleep.as_mut().await,
        None => std::future::pending().await,
    }
}

fn log_settled(
    resource: &'static str,
    joined: Result<Result<FetchOutcome, SyncError>, tokio::task::JoinError>,
) {
    match joined {
        Ok(Ok(outcome)) => debug!(resource, ?outcome, "Fetch settled"),
        Ok(Err(error)) => warn!(resource, %error, "Fetch failed"),
        Err(error) => warn!(resource, %error, "Fetch task aborted"),
    }
}

/// Screen-side handle of a running [`QueryDebouncer`].
#[derive(Clone)]
pub struct QueryHandle {
    events: mpsc::Sender<QueryEvent>,
    filters: watch::Receiver<FilterState>,
    state: watch::Receiver<DebounceState>,
}

impl QueryHandle {
    pub async fn send(&self, event: QueryEvent) -> Result<(), SyncError> {
        self.events
            .send(event)
            .await
            .map_err(|_| SyncError::ActorClosed)
    }

    pub async fn search(&self, term: impl Into<String>) -> Result<(), SyncError> {
        self.send(QueryEvent::Search(term.into())).await
    }

    pub async fn set_filter(
        &self,
        key: impl Into<String>,
        value: FilterValue,
    ) -> Result<(), SyncError> {
        self.send(QueryEvent::SetFilter {
            key: key.into(),
            value,
        })
        .await
    }

    pub async fn clear_filter(&self, key: impl Into<String>) -> Result<(), SyncError> {
        self.send(QueryEvent::ClearFilter(key.into())).await
    }

    pub async fn set_page(&self, page: u32) -> Result<(), SyncError> {
        self.send(QueryEvent::Page(page)).await
    }

    pub async fn refresh(&self) -> Result<(), SyncError> {
        self.send(QueryEvent::Refresh).await
    }

    /// The filter state as the debouncer currently sees it.
    pub fn filters(&self) -> FilterState {
        self.filters.borrow().clone()
    }

    pub fn state(&self) -> DebounceState {
        *self.state.borrow()
    }

    /// Waits until the debouncer reports `target`.
    pub async fn wait_for_state(&mut self, target: DebounceState) -> Result<(), SyncError> {
        self.state
            .wait_for(|state| *state == target)
            .await
            .map(|_| ())
            .map_err(|_| SyncError::ActorClosed)
    }
}
