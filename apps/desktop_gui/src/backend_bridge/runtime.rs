//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread, time::Duration};

use client_core::{
    ControllerSettings, ControllerSnapshot, HttpMovieStore, MovieController, Settings,
};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tokio::sync::watch;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{classify_startup_failure, UiError, UiErrorContext, UiEvent};

const UI_QUEUE_BACKOFF: Duration = Duration::from_millis(50);

/// Pushes controller snapshots into the UI queue. When the queue is full the
/// newest snapshot is retried until it fits, so the UI never settles on a stale view.
pub(crate) async fn forward_snapshots(
    mut snapshots: watch::Receiver<ControllerSnapshot>,
    ui_tx: Sender<UiEvent>,
) {
    loop {
        let mut pending = UiEvent::Snapshot(snapshots.borrow_and_update().clone());
        loop {
            match ui_tx.try_send(pending) {
                Ok(()) => break,
                Err(TrySendError::Disconnected(_)) => return,
                Err(TrySendError::Full(_)) => {
                    tracing::debug!("backend: ui event queue full, holding latest snapshot");
                    tokio::time::sleep(UI_QUEUE_BACKOFF).await;
                    pending = UiEvent::Snapshot(snapshots.borrow_and_update().clone());
                }
            }
        }
        if snapshots.changed().await.is_err() {
            return;
        }
    }
}

pub fn launch(
    settings: Settings,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::new(
                    UiErrorContext::BackendStartup,
                    format!("failed to build backend runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let store = match HttpMovieStore::from_settings(&settings) {
                Ok(store) => store,
                Err(err) => {
                    let message = format!("{err:#}");
                    tracing::error!("backend: could not create movie store: {message}");
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::new(
                        UiErrorContext::BackendStartup,
                        classify_startup_failure(&message),
                    )));
                    return;
                }
            };
            tracing::info!(store = %store.base_url(), "backend: movie store ready");

            let controller =
                MovieController::new(Arc::new(store), ControllerSettings::from(&settings));

            tokio::spawn(forward_snapshots(controller.subscribe(), ui_tx.clone()));

            {
                let controller = controller.clone();
                tokio::spawn(async move { controller.start().await });
            }
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            // Every command runs as its own task so Cancel is not stuck behind a slow fetch.
            while let Ok(cmd) = cmd_rx.recv() {
                tracing::info!(command = cmd.name(), "backend: command received");
                let controller = controller.clone();
                tokio::spawn(async move {
                    match cmd {
                        BackendCommand::FetchMovies => controller.fetch_movies().await,
                        BackendCommand::Retry => controller.retry().await,
                        BackendCommand::Cancel => controller.cancel().await,
                        BackendCommand::AddMovie(movie) => controller.add_movie(movie).await,
                        BackendCommand::DeleteMovie(id) => controller.delete_movie(id).await,
                    }
                });
            }

            tracing::info!("backend: ui command queue closed, shutting down");
            controller.shutdown().await;
        });
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::ViewState;
    use crossbeam_channel::bounded;

    #[tokio::test(start_paused = true)]
    async fn full_queue_delivers_the_newest_snapshot_once_drained() {
        let (ui_tx, ui_rx) = bounded::<UiEvent>(1);
        ui_tx
            .try_send(UiEvent::Info("occupying the queue".to_string()))
            .expect("queue has room");

        let (snapshot_tx, snapshot_rx) = watch::channel(ControllerSnapshot::default());
        let forwarder = tokio::spawn(forward_snapshots(snapshot_rx, ui_tx));

        snapshot_tx.send_replace(ControllerSnapshot {
            view: ViewState::Loading,
            ..ControllerSnapshot::default()
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        snapshot_tx.send_replace(ControllerSnapshot {
            view: ViewState::Loaded(Vec::new()),
            movies: Some(Vec::new()),
            ..ControllerSnapshot::default()
        });

        assert!(matches!(ui_rx.try_recv(), Ok(UiEvent::Info(_))));
        tokio::time::sleep(UI_QUEUE_BACKOFF * 2).await;

        match ui_rx.try_recv() {
            Ok(UiEvent::Snapshot(snapshot)) => {
                assert_eq!(snapshot.view, ViewState::Loaded(Vec::new()))
            }
            other => panic!("expected the newest snapshot, got {other:?}"),
        }

        drop(snapshot_tx);
        drop(ui_rx);
        forwarder.await.expect("forwarder task");
    }
}
