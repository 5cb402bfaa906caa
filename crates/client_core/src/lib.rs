use async_trait::async_trait;
use shared::protocol::{BookPage, CreateBookRequest, ListBooksQuery};

pub mod config;
pub mod error;
pub mod form;
pub mod list_sync;
pub mod transport;

pub use config::{load_settings, Settings};
pub use error::{ClientError, ClientErrorKind};
pub use form::{BookDraft, DraftField, FormController};
pub use list_sync::{ListController, ListEvent, ListQuery, ListSnapshot};
pub use transport::HttpBookApi;

/// Outbound calls to the backend book collection.
///
/// Implementations normalize every failure into a [`ClientError`]; they never
/// retry.
#[async_trait]
pub trait BookApi: Send + Sync {
    async fn list_books(&self, query: &ListBooksQuery) -> Result<BookPage, ClientError>;
    async fn create_book(&self, request: &CreateBookRequest) -> Result<(), ClientError>;
}

#[cfg(test)]
#[path = "tests/fake_api.rs"]
mod fake_api;
