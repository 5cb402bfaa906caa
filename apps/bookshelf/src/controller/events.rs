//! Worker-to-shell events and error modeling for the terminal front end.

use client_core::{ClientError, ClientErrorKind, ListQuery, ListSnapshot};

pub enum UiEvent {
    Info(String),
    ListLoading(ListQuery),
    ListUpdated(ListSnapshot),
    BookAdded,
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    ListBooks,
    AddBook,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: ClientErrorKind,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn new(context: UiErrorContext, category: ClientErrorKind, message: impl Into<String>) -> Self {
        Self {
            category,
            context,
            message: message.into(),
        }
    }

    /// `display` is what the user sees; the category comes from `err`.
    pub fn from_client_error(
        context: UiErrorContext,
        err: &ClientError,
        display: impl Into<String>,
    ) -> Self {
        Self::new(context, err.kind(), display)
    }

    pub fn category(&self) -> ClientErrorKind {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Follow-up advice shown under the message, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match (self.context, self.category) {
            (UiErrorContext::BackendStartup, _) => {
                Some("Check --api-url / bookshelf.toml and restart the shell.")
            }
            (_, ClientErrorKind::Transport) => {
                Some("Server unreachable; check the API URL and network, then retry.")
            }
            (UiErrorContext::AddBook, ClientErrorKind::Validation) => {
                Some("Run `add` again; blank answers keep the previous values.")
            }
            (UiErrorContext::AddBook, ClientErrorKind::Server) => {
                Some("Your draft was kept; run `add` to correct it and resubmit.")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_point_at_connectivity() {
        let err = UiError::new(
            UiErrorContext::ListBooks,
            ClientErrorKind::Transport,
            "Failed to fetch books",
        );
        assert_eq!(err.category(), ClientErrorKind::Transport);
        assert!(err.hint().is_some_and(|hint| hint.contains("unreachable")));
    }

    #[test]
    fn format_errors_have_no_hint() {
        let err = UiError::from_client_error(
            UiErrorContext::ListBooks,
            &ClientError::Format("`data` is not an array".into()),
            "Unexpected response format",
        );
        assert_eq!(err.message(), "Unexpected response format");
        assert_eq!(err.context(), UiErrorContext::ListBooks);
        assert_eq!(err.hint(), None);
    }

    #[test]
    fn rejected_submission_mentions_kept_draft() {
        let err = UiError::from_client_error(
            UiErrorContext::AddBook,
            &ClientError::Server {
                status: 409,
                message: Some("duplicate".into()),
            },
            "duplicate",
        );
        assert!(err.hint().is_some_and(|hint| hint.contains("draft was kept")));
    }
}
