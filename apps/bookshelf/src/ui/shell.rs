//! Line-oriented interactive shell over the backend worker.

use std::{
    io::{self, BufRead, Write},
    thread,
};

use anyhow::{Context, Result};
use client_core::Settings;
use crossbeam_channel::{bounded, Receiver};

use crate::{
    backend_bridge::{commands::BackendCommand, runtime},
    controller::{
        events::{UiErrorContext, UiEvent},
        orchestration::dispatch_backend_command,
    },
    ui::table::render_snapshot,
};

const HELP: &str = "\
commands:
  search <text>   filter by name or description (blank clears the filter)
  page <n>        jump to page n (1-based)
  next | prev     move one page
  refresh         re-fetch the current page
  add             add a book (blank answers keep the previous draft values)
  cancel          discard the add-book draft
  help            show this help
  quit            leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellInput {
    Empty,
    Search(String),
    Page(u32),
    Next,
    Prev,
    Refresh,
    Add,
    Cancel,
    Help,
    Quit,
}

pub fn parse_line(line: &str) -> Result<ShellInput, String> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command.to_ascii_lowercase().as_str() {
        "" => Ok(ShellInput::Empty),
        "search" | "s" => Ok(ShellInput::Search(rest.to_string())),
        "page" | "p" => match rest.parse::<u32>() {
            Ok(page) if page >= 1 => Ok(ShellInput::Page(page - 1)),
            _ => Err(format!("`page` expects a page number starting at 1, got '{rest}'")),
        },
        "next" | "n" => Ok(ShellInput::Next),
        "prev" => Ok(ShellInput::Prev),
        "refresh" | "r" => Ok(ShellInput::Refresh),
        "add" | "a" => Ok(ShellInput::Add),
        "cancel" => Ok(ShellInput::Cancel),
        "help" | "?" => Ok(ShellInput::Help),
        "quit" | "exit" | "q" => Ok(ShellInput::Quit),
        other => Err(format!("unknown command '{other}'; type `help`")),
    }
}

pub fn run(settings: Settings) -> Result<()> {
    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);

    let worker = runtime::launch(settings, cmd_rx, ui_tx);
    let printer = thread::spawn(move || print_events(ui_rx));

    println!("{HELP}");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut status = String::new();

    loop {
        prompt("> ")?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed to read from stdin")?;

        let cmd = match parse_line(&line) {
            Ok(ShellInput::Empty) => continue,
            Ok(ShellInput::Quit) => break,
            Ok(ShellInput::Help) => {
                println!("{HELP}");
                continue;
            }
            Ok(ShellInput::Search(text)) => BackendCommand::Search { text },
            Ok(ShellInput::Page(page_index)) => BackendCommand::GoToPage { page_index },
            Ok(ShellInput::Next) => BackendCommand::NextPage,
            Ok(ShellInput::Prev) => BackendCommand::PrevPage,
            Ok(ShellInput::Refresh) => BackendCommand::Refresh,
            Ok(ShellInput::Cancel) => BackendCommand::DiscardDraft,
            Ok(ShellInput::Add) => {
                let mut answers = Vec::with_capacity(4);
                for label in ["Name", "Description", "Publish Date (YYYY-MM-DD)", "Price"] {
                    prompt(&format!("{label}: "))?;
                    let answer = match lines.next() {
                        Some(answer) => answer.context("failed to read from stdin")?,
                        None => String::new(),
                    };
                    answers.push(Some(answer).filter(|answer| !answer.trim().is_empty()));
                }
                let mut answers = answers.into_iter();
                BackendCommand::AddBook {
                    name: answers.next().flatten(),
                    description: answers.next().flatten(),
                    publish_date: answers.next().flatten(),
                    price: answers.next().flatten(),
                }
            }
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        dispatch_backend_command(&cmd_tx, cmd, &mut status);
        if !status.is_empty() {
            println!("{status}");
            status.clear();
        }
    }

    drop(cmd_tx);
    if worker.join().is_err() {
        tracing::error!("backend worker panicked");
    }
    if printer.join().is_err() {
        tracing::error!("event printer panicked");
    }
    Ok(())
}

fn prompt(text: &str) -> Result<()> {
    let mut stdout = io::stdout();
    stdout.write_all(text.as_bytes())?;
    stdout.flush().context("failed to flush stdout")
}

fn print_events(ui_rx: Receiver<UiEvent>) {
    for event in ui_rx.iter() {
        match event {
            UiEvent::Info(message) => println!("{message}"),
            UiEvent::ListLoading(query) => {
                tracing::debug!(search = %query.search, page = query.page_index + 1, "loading");
                println!("loading...");
            }
            UiEvent::ListUpdated(snapshot) => println!("{}", render_snapshot(&snapshot)),
            UiEvent::BookAdded => println!("Book added successfully"),
            UiEvent::Error(err) => {
                tracing::debug!(category = ?err.category(), context = ?err.context(), "ui error");
                let label = match err.context() {
                    UiErrorContext::BackendStartup => "startup error",
                    UiErrorContext::ListBooks => "list error",
                    UiErrorContext::AddBook => "add error",
                };
                println!("{label}: {}", err.message());
                if let Some(hint) = err.hint() {
                    println!("  {hint}");
                }
            }
        }
    }
}
