//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext};

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    banner: &mut Option<UiError>,
) {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *banner = Some(UiError::new(
                UiErrorContext::CommandQueue,
                "UI command queue is full; please retry",
            ));
        }
        Err(TrySendError::Disconnected(_)) => {
            *banner = Some(UiError::new(
                UiErrorContext::CommandQueue,
                "Backend command processor disconnected (possible startup/runtime failure); restart the app",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn queued_command_leaves_banner_alone() {
        let (tx, rx) = bounded(1);
        let mut banner = None;
        dispatch_backend_command(&tx, BackendCommand::FetchMovies, &mut banner);
        assert!(banner.is_none());
        assert_eq!(rx.try_recv().ok(), Some(BackendCommand::FetchMovies));
    }

    #[test]
    fn full_queue_sets_banner() {
        let (tx, _rx) = bounded(1);
        let mut banner = None;
        dispatch_backend_command(&tx, BackendCommand::FetchMovies, &mut banner);
        dispatch_backend_command(&tx, BackendCommand::Retry, &mut banner);
        let banner = banner.expect("banner");
        assert_eq!(banner.context(), UiErrorContext::CommandQueue);
        assert!(banner.message().contains("full"));
    }

    #[test]
    fn disconnected_backend_sets_banner() {
        let (tx, rx) = bounded(1);
        drop(rx);
        let mut banner = None;
        dispatch_backend_command(&tx, BackendCommand::Cancel, &mut banner);
        assert!(banner.expect("banner").message().contains("disconnected"));
    }
}
