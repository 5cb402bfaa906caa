//! Backend worker: owns the tokio runtime, the list and form controllers, and
//! turns queued commands into controller calls.

use std::{sync::Arc, thread};

use client_core::{
    BookApi, ClientErrorKind, DraftField, FormController, HttpBookApi, ListController, ListEvent,
    Settings,
};
use crossbeam_channel::{Receiver, Sender};
use tokio::{runtime::Handle, sync::broadcast::error::RecvError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(
    settings: Settings,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::new(
                    UiErrorContext::BackendStartup,
                    ClientErrorKind::Config,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(run_worker(settings, cmd_rx, ui_tx));
    })
}

async fn run_worker(settings: Settings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    let http_api = match HttpBookApi::new(&settings) {
        Ok(api) => api,
        Err(err) => {
            tracing::error!("failed to build book API client: {err}");
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_client_error(
                UiErrorContext::BackendStartup,
                &err,
                format!("backend worker startup failure: {err}"),
            )));
            return;
        }
    };
    let _ = ui_tx.try_send(UiEvent::Info(format!(
        "Using book catalog at {}",
        http_api.books_url()
    )));
    let api: Arc<dyn BookApi> = Arc::new(http_api);

    let list = ListController::new(api.clone(), settings.page_size);
    let forwarder = tokio::spawn(forward_list_events(list.subscribe(), ui_tx.clone()));
    let mut form = FormController::new(api, {
        let list = list.clone();
        let handle = Handle::current();
        move || {
            let list = list.clone();
            handle.spawn(async move {
                list.refresh().await;
            });
        }
    });

    spawn_list_fetch(&list, |list| async move { list.refresh().await });

    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            BackendCommand::Search { text } => {
                spawn_list_fetch(&list, move |list| async move { list.set_search(text).await });
            }
            BackendCommand::GoToPage { page_index } => {
                spawn_list_fetch(&list, move |list| async move {
                    list.set_page(page_index).await
                });
            }
            BackendCommand::NextPage => {
                let snapshot = list.snapshot().await;
                if snapshot.has_next_page() {
                    let page_index = snapshot.query.page_index + 1;
                    spawn_list_fetch(&list, move |list| async move {
                        list.set_page(page_index).await
                    });
                } else {
                    let _ = ui_tx.try_send(UiEvent::Info("Already on the last page".into()));
                }
            }
            BackendCommand::PrevPage => {
                let snapshot = list.snapshot().await;
                if snapshot.has_prev_page() {
                    let page_index = snapshot.query.page_index - 1;
                    spawn_list_fetch(&list, move |list| async move {
                        list.set_page(page_index).await
                    });
                } else {
                    let _ = ui_tx.try_send(UiEvent::Info("Already on the first page".into()));
                }
            }
            BackendCommand::Refresh => {
                spawn_list_fetch(&list, |list| async move { list.refresh().await });
            }
            BackendCommand::AddBook {
                name,
                description,
                publish_date,
                price,
            } => {
                let fields = [
                    (DraftField::Name, name),
                    (DraftField::Description, description),
                    (DraftField::PublishDate, publish_date),
                    (DraftField::Price, price),
                ];
                submit_book(&mut form, fields, &ui_tx).await;
            }
            BackendCommand::DiscardDraft => {
                form.reset();
                let _ = ui_tx.try_send(UiEvent::Info("Draft discarded".into()));
            }
        }
    }

    tracing::debug!("command queue closed; stopping backend worker");
    forwarder.abort();
}

/// List fetches run as independent tasks so a slow response never blocks the
/// command queue; the controller drops whichever responses went stale.
fn spawn_list_fetch<F, Fut>(list: &Arc<ListController>, fetch: F)
where
    F: FnOnce(Arc<ListController>) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = client_core::ListSnapshot> + Send + 'static,
{
    let list = list.clone();
    tokio::spawn(async move {
        fetch(list).await;
    });
}

async fn submit_book(
    form: &mut FormController,
    fields: [(DraftField, Option<String>); 4],
    ui_tx: &Sender<UiEvent>,
) {
    for (field, value) in fields {
        let Some(value) = value else {
            continue;
        };
        if let Err(err) = form.set_field(field, &value) {
            tracing::debug!(%field, "rejected draft input");
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_client_error(
                UiErrorContext::AddBook,
                &err,
                err.to_string(),
            )));
            return;
        }
    }

    match form.submit().await {
        Ok(()) => {
            let _ = ui_tx.try_send(UiEvent::BookAdded);
        }
        Err(err) => {
            let display = form
                .draft()
                .error
                .clone()
                .unwrap_or_else(|| err.to_string());
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_client_error(
                UiErrorContext::AddBook,
                &err,
                display,
            )));
        }
    }
}

async fn forward_list_events(
    mut events: tokio::sync::broadcast::Receiver<ListEvent>,
    ui_tx: Sender<UiEvent>,
) {
    loop {
        let event = match events.recv().await {
            Ok(ListEvent::Loading(query)) => UiEvent::ListLoading(query),
            Ok(ListEvent::Updated(snapshot)) => UiEvent::ListUpdated(snapshot),
            Ok(ListEvent::Failed { message, kind }) => {
                UiEvent::Error(UiError::new(UiErrorContext::ListBooks, kind, message))
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "list event forwarder lagged");
                continue;
            }
            Err(RecvError::Closed) => break,
        };
        if ui_tx.try_send(event).is_err() {
            tracing::debug!("ui event queue unavailable; dropping list event");
        }
    }
}
