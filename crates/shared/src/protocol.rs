use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{iso_date, Book};

pub const BOOKS_PATH: &str = "api/books";

/// Query string of `GET /api/books`. `page` is one-based on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListBooksQuery {
    pub q: String,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookPage {
    pub data: Vec<Book>,
    #[serde(rename = "totalItems")]
    pub total_items: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    pub name: String,
    pub description: String,
    #[serde(with = "iso_date")]
    pub publish_date: NaiveDate,
    pub price: f64,
}
