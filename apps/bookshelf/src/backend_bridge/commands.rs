//! Backend commands queued from the shell to the backend worker.

pub enum BackendCommand {
    Search {
        text: String,
    },
    GoToPage {
        page_index: u32,
    },
    NextPage,
    PrevPage,
    Refresh,
    /// `None` keeps the value already in the draft, so a rejected submission
    /// can be corrected field by field.
    AddBook {
        name: Option<String>,
        description: Option<String>,
        publish_date: Option<String>,
        price: Option<String>,
    },
    DiscardDraft,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Search { .. } => "search",
            BackendCommand::GoToPage { .. } => "go_to_page",
            BackendCommand::NextPage => "next_page",
            BackendCommand::PrevPage => "prev_page",
            BackendCommand::Refresh => "refresh",
            BackendCommand::AddBook { .. } => "add_book",
            BackendCommand::DiscardDraft => "discard_draft",
        }
    }
}
