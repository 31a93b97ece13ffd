use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::Distro;
use crate::exec::{CommandRunner, ProcessCommand};
use crate::search_command::guest_command;

const WARMUP_TIMEOUT: Duration = Duration::from_secs(15);

pub fn warmup_command(distro: Distro) -> ProcessCommand {
    guest_command(distro).arg("true")
}

/// Boots the guest in the background so the first real query does not pay
/// for the VM start. Nothing waits on the returned handle in production and
/// its outcome only reaches the log.
pub fn spawn(runner: Arc<dyn CommandRunner>, distro: Distro) -> JoinHandle<()> {
    std::thread::spawn(move || {
        match runner.run(&warmup_command(distro), WARMUP_TIMEOUT) {
            Ok(output) => tracing::debug!(status = ?output.status_code, "guest warm-up finished"),
            Err(error) => tracing::debug!(%error, "guest warm-up failed"),
        }
    })
}
