//! Search/pagination state for the book list and its synchronization with the
//! backend list endpoint.

use std::sync::Arc;

use shared::{domain::Book, protocol::ListBooksQuery};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, warn};

use crate::{
    error::{ClientError, ClientErrorKind},
    BookApi,
};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch books";
pub const UNEXPECTED_FORMAT_MESSAGE: &str = "Unexpected response format";

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub search: String,
    /// Zero-based; the wire page is one-based.
    pub page_index: u32,
    pub page_size: u32,
}

impl ListQuery {
    pub fn new(page_size: u32) -> Self {
        Self {
            search: String::new(),
            page_index: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn to_wire(&self) -> ListBooksQuery {
        ListBooksQuery {
            q: self.search.clone(),
            page: self.page_index.saturating_add(1),
            limit: self.page_size,
        }
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

pub fn total_pages(total_items: u64, page_size: u32) -> u64 {
    total_items.div_ceil(u64::from(page_size.max(1)))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListSnapshot {
    pub query: ListQuery,
    pub books: Vec<Book>,
    pub total_items: u64,
    pub loading: bool,
    pub error: Option<String>,
}

impl ListSnapshot {
    fn empty(query: ListQuery) -> Self {
        Self {
            query,
            books: Vec::new(),
            total_items: 0,
            loading: false,
            error: None,
        }
    }

    pub fn total_pages(&self) -> u64 {
        total_pages(self.total_items, self.query.page_size)
    }

    /// One-based running row number across pages for the row at `row_index`.
    pub fn serial_number(&self, row_index: usize) -> u64 {
        row_index as u64 + 1 + u64::from(self.query.page_index) * u64::from(self.query.page_size)
    }

    /// The current page starts beyond the last item, e.g. after rows were
    /// deleted elsewhere. Such a page is rendered empty rather than clamped.
    pub fn is_past_end(&self) -> bool {
        self.total_items > 0 && u64::from(self.query.page_index) >= self.total_pages()
    }

    pub fn last_page_index(&self) -> u32 {
        u32::try_from(self.total_pages().saturating_sub(1)).unwrap_or(u32::MAX)
    }

    pub fn has_next_page(&self) -> bool {
        u64::from(self.query.page_index) + 1 < self.total_pages()
    }

    pub fn has_prev_page(&self) -> bool {
        self.query.page_index > 0
    }
}

#[derive(Debug, Clone)]
pub enum ListEvent {
    Loading(ListQuery),
    Updated(ListSnapshot),
    Failed {
        message: String,
        kind: ClientErrorKind,
    },
}

struct ListState {
    snapshot: ListSnapshot,
    latest_generation: u64,
}

/// Owns the list query and the last applied result.
///
/// Every mutation issues exactly one list request tagged with a generation
/// number. Only the response for the most recently issued generation is
/// applied; older responses are dropped on arrival.
pub struct ListController {
    api: Arc<dyn BookApi>,
    state: Mutex<ListState>,
    events: broadcast::Sender<ListEvent>,
}

impl ListController {
    pub fn new(api: Arc<dyn BookApi>, page_size: u32) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Arc::new(Self {
            api,
            state: Mutex::new(ListState {
                snapshot: ListSnapshot::empty(ListQuery::new(page_size)),
                latest_generation: 0,
            }),
            events,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ListEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> ListSnapshot {
        self.state.lock().await.snapshot.clone()
    }

    /// Changing the filter invalidates prior page offsets, so the page index
    /// goes back to 0.
    pub async fn set_search(&self, text: impl Into<String>) -> ListSnapshot {
        let text = text.into();
        self.fetch_with(move |query| {
            query.search = text;
            query.page_index = 0;
        })
        .await
    }

    pub async fn set_page(&self, page_index: u32) -> ListSnapshot {
        self.fetch_with(move |query| query.page_index = page_index)
            .await
    }

    /// Replaces search and page together with a single fetch, e.g. when a view
    /// is opened on a remembered query.
    pub async fn set_query(&self, search: impl Into<String>, page_index: u32) -> ListSnapshot {
        let search = search.into();
        self.fetch_with(move |query| {
            query.search = search;
            query.page_index = page_index;
        })
        .await
    }

    /// Re-fetch with the current query (initial load, or after a create).
    pub async fn refresh(&self) -> ListSnapshot {
        self.fetch_with(|_| {}).await
    }

    async fn fetch_with<F>(&self, update: F) -> ListSnapshot
    where
        F: FnOnce(&mut ListQuery),
    {
        let (generation, wire) = {
            let mut state = self.state.lock().await;
            update(&mut state.snapshot.query);
            state.latest_generation += 1;
            state.snapshot.loading = true;
            let _ = self
                .events
                .send(ListEvent::Loading(state.snapshot.query.clone()));
            (state.latest_generation, state.snapshot.query.to_wire())
        };

        debug!(
            generation,
            q = %wire.q,
            page = wire.page,
            limit = wire.limit,
            "issuing book list request"
        );
        let outcome = self.api.list_books(&wire).await;

        let mut state = self.state.lock().await;
        if generation != state.latest_generation {
            debug!(
                generation,
                latest = state.latest_generation,
                "discarding stale book list response"
            );
            return state.snapshot.clone();
        }

        state.snapshot.loading = false;
        match outcome {
            Ok(page) => {
                state.snapshot.books = page.data;
                state.snapshot.total_items = page.total_items;
                state.snapshot.error = None;
                let _ = self
                    .events
                    .send(ListEvent::Updated(state.snapshot.clone()));
            }
            Err(err) => {
                warn!(generation, "book list request failed: {err}");
                let message = list_error_message(&err).to_string();
                state.snapshot.error = Some(message.clone());
                let _ = self.events.send(ListEvent::Failed {
                    message,
                    kind: err.kind(),
                });
            }
        }
        state.snapshot.clone()
    }
}

fn list_error_message(err: &ClientError) -> &'static str {
    match err.kind() {
        ClientErrorKind::Format => UNEXPECTED_FORMAT_MESSAGE,
        _ => FETCH_FAILED_MESSAGE,
    }
}

#[cfg(test)]
#[path = "tests/list_sync_tests.rs"]
mod tests;
