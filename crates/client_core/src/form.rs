//! Draft state and submission for the add-book form.

use std::{fmt, str::FromStr, sync::Arc};

use shared::{domain::parse_iso_date, protocol::CreateBookRequest};
use tracing::{info, warn};

use crate::{error::ClientError, BookApi};

pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in all fields";
pub const INVALID_DATE_MESSAGE: &str = "Publish date must be a valid date (YYYY-MM-DD)";
pub const INVALID_PRICE_MESSAGE: &str = "Price must be a non-negative number";
pub const ADD_FAILED_MESSAGE: &str = "Failed to add book";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Description,
    PublishDate,
    Price,
}

impl DraftField {
    pub const ALL: [DraftField; 4] = [
        DraftField::Name,
        DraftField::Description,
        DraftField::PublishDate,
        DraftField::Price,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DraftField::Name => "Name",
            DraftField::Description => "Description",
            DraftField::PublishDate => "Publish Date",
            DraftField::Price => "Price",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DraftField {
    type Err = ClientError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(DraftField::Name),
            "description" => Ok(DraftField::Description),
            "publishdate" | "publish_date" | "publish-date" => Ok(DraftField::PublishDate),
            "price" => Ok(DraftField::Price),
            other => Err(ClientError::Validation(format!("unknown field '{other}'"))),
        }
    }
}

/// Unsaved form values. `price: None` means unset; `Some(0.0)` is a real price.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookDraft {
    pub name: String,
    pub description: String,
    pub publish_date: String,
    pub price: Option<f64>,
    pub error: Option<String>,
}

impl BookDraft {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.description.is_empty()
            && self.publish_date.is_empty()
            && self.price.is_none()
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn to_request(&self) -> Result<CreateBookRequest, ClientError> {
        let name = self.name.trim();
        let description = self.description.trim();
        let publish_date = self.publish_date.trim();
        let missing_text = name.is_empty() || description.is_empty() || publish_date.is_empty();
        let Some(price) = self.price.filter(|_| !missing_text) else {
            return Err(ClientError::Validation(MISSING_FIELDS_MESSAGE.into()));
        };

        let publish_date = parse_iso_date(publish_date)
            .map_err(|_| ClientError::Validation(INVALID_DATE_MESSAGE.into()))?;
        if !is_valid_price(price) {
            return Err(ClientError::Validation(INVALID_PRICE_MESSAGE.into()));
        }

        Ok(CreateBookRequest {
            name: name.to_string(),
            description: description.to_string(),
            publish_date,
            price,
        })
    }
}

fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price >= 0.0
}

fn parse_price(raw: &str) -> Result<Option<f64>, ClientError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(price) if is_valid_price(price) => Ok(Some(price)),
        _ => Err(ClientError::Validation(INVALID_PRICE_MESSAGE.into())),
    }
}

pub type OnCreated = Box<dyn Fn() + Send + Sync>;

/// Owns one draft and submits it to the backend.
///
/// The list is not owned here: a successful create only fires `on_created`,
/// which the hosting view wires to its list refresh.
pub struct FormController {
    api: Arc<dyn BookApi>,
    draft: BookDraft,
    on_created: OnCreated,
}

impl FormController {
    pub fn new<F>(api: Arc<dyn BookApi>, on_created: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            api,
            draft: BookDraft::default(),
            on_created: Box::new(on_created),
        }
    }

    pub fn draft(&self) -> &BookDraft {
        &self.draft
    }

    /// Text input for any field. Blank price text unsets the price; text that
    /// is not a non-negative number is rejected and the draft is left as is.
    pub fn set_field(&mut self, field: DraftField, value: &str) -> Result<(), ClientError> {
        match field {
            DraftField::Name => self.draft.name = value.to_string(),
            DraftField::Description => self.draft.description = value.to_string(),
            DraftField::PublishDate => self.draft.publish_date = value.to_string(),
            DraftField::Price => self.draft.price = parse_price(value)?,
        }
        Ok(())
    }

    pub fn set_price(&mut self, price: Option<f64>) {
        self.draft.price = price;
    }

    /// Cancel/close: drop whatever was typed.
    pub fn reset(&mut self) {
        self.draft.clear();
    }

    pub async fn submit(&mut self) -> Result<(), ClientError> {
        let request = match self.draft.to_request() {
            Ok(request) => request,
            Err(err) => {
                self.draft.error = Some(err.to_string());
                return Err(err);
            }
        };

        match self.api.create_book(&request).await {
            Ok(()) => {
                info!(name = %request.name, "book submitted");
                self.draft.clear();
                (self.on_created)();
                Ok(())
            }
            Err(err) => {
                warn!("book submission failed: {err}");
                let message = err.server_message().unwrap_or(ADD_FAILED_MESSAGE);
                self.draft.error = Some(message.to_string());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
