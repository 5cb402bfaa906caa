use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    error::extract_error_message,
    protocol::{BookPage, CreateBookRequest, ListBooksQuery},
};
use tracing::{debug, info};
use url::Url;

use crate::{config::Settings, error::ClientError, BookApi};

/// `BookApi` over HTTP against the backend's `/api/books` collection.
pub struct HttpBookApi {
    http: Client,
    books_url: Url,
}

impl HttpBookApi {
    pub fn new(settings: &Settings) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Self::with_client(http, settings)
    }

    pub fn with_client(http: Client, settings: &Settings) -> Result<Self, ClientError> {
        Ok(Self {
            http,
            books_url: settings.books_endpoint()?,
        })
    }

    pub fn books_url(&self) -> &Url {
        &self.books_url
    }
}

#[async_trait]
impl BookApi for HttpBookApi {
    async fn list_books(&self, query: &ListBooksQuery) -> Result<BookPage, ClientError> {
        debug!(q = %query.q, page = query.page, limit = query.limit, "GET {}", self.books_url);
        let response = self
            .http
            .get(self.books_url.clone())
            .query(query)
            .send()
            .await?;
        let body = success_body(response).await?;
        decode_book_page(&body)
    }

    async fn create_book(&self, request: &CreateBookRequest) -> Result<(), ClientError> {
        debug!(name = %request.name, "POST {}", self.books_url);
        let response = self
            .http
            .post(self.books_url.clone())
            .json(request)
            .send()
            .await?;
        success_body(response).await?;
        info!(name = %request.name, "book created");
        Ok(())
    }
}

async fn success_body(response: Response) -> Result<String, ClientError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        return Ok(body);
    }
    Err(ClientError::Server {
        status: status.as_u16(),
        message: extract_error_message(&body),
    })
}

pub(crate) fn decode_book_page(body: &str) -> Result<BookPage, ClientError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|err| ClientError::Format(format!("body is not JSON: {err}")))?;
    if !value.get("data").is_some_and(serde_json::Value::is_array) {
        return Err(ClientError::Format("`data` is missing or not an array".into()));
    }
    serde_json::from_value(value).map_err(|err| ClientError::Format(err.to_string()))
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
