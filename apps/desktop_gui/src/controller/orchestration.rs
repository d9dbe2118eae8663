//! Command orchestration helpers from UI actions to backend command queue.

use std::time::Instant;

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::reducer::AppState;

/// Queues each command for the backend worker. A command that cannot be
/// queued is resolved immediately as a failure so no flag stays stuck.
pub fn dispatch_backend_commands(
    cmd_tx: &Sender<BackendCommand>,
    commands: Vec<BackendCommand>,
    state: &mut AppState,
    now: Instant,
) {
    for cmd in commands {
        let cmd_name = cmd.name();
        match cmd_tx.try_send(cmd) {
            Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
            Err(TrySendError::Full(cmd)) => {
                let event = cmd.undelivered("UI command queue is full; please retry");
                state.apply(event, now);
            }
            Err(TrySendError::Disconnected(cmd)) => {
                let event = cmd.undelivered(
                    "Backend command processor disconnected (possible startup/runtime failure)",
                );
                state.apply(event, now);
            }
        }
    }
}
