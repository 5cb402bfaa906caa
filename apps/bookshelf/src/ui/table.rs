use std::fmt::Write as _;

use client_core::ListSnapshot;
use shared::domain::ISO_DATE_FORMAT;

const NAME_WIDTH: usize = 28;
const DESCRIPTION_WIDTH: usize = 40;

fn clip(text: &str, width: usize) -> String {
    let text = text.replace(['\n', '\r'], " ");
    if text.chars().count() <= width {
        return text;
    }
    let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

pub fn render_snapshot(snapshot: &ListSnapshot) -> String {
    let mut out = String::new();

    if !snapshot.query.search.is_empty() {
        let _ = writeln!(out, "search: \"{}\"", snapshot.query.search);
    }
    if let Some(error) = &snapshot.error {
        let _ = writeln!(out, "error: {error}");
    }

    if snapshot.books.is_empty() {
        if snapshot.is_past_end() {
            let _ = writeln!(
                out,
                "page {} is past the last page; use `page {}`",
                snapshot.query.page_index + 1,
                snapshot.last_page_index() + 1
            );
        } else {
            let _ = writeln!(out, "no books found");
        }
    } else {
        let _ = writeln!(
            out,
            "{:>5}  {:<NAME_WIDTH$}  {:<DESCRIPTION_WIDTH$}  {:<12}  {:>9}",
            "S.No", "Name", "Description", "Publish Date", "Price"
        );
        for (row, book) in snapshot.books.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>5}  {:<NAME_WIDTH$}  {:<DESCRIPTION_WIDTH$}  {:<12}  {:>9.2}",
                snapshot.serial_number(row),
                clip(&book.name, NAME_WIDTH),
                clip(&book.description, DESCRIPTION_WIDTH),
                book.publish_date.format(ISO_DATE_FORMAT).to_string(),
                book.price
            );
        }
    }

    let _ = write!(
        out,
        "page {} of {} ({} books)",
        snapshot.query.page_index + 1,
        snapshot.total_pages().max(1),
        snapshot.total_items
    );
    out
}
