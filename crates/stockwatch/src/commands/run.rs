//! `stockwatch run`: the long-running watcher.

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use stockwatch_core::Service;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let watch = super::load(global)?.to_watch_config()?;
    info!(
        url = %watch.source.url,
        chat = %watch.bot.chat_id,
        interval = ?watch.poll_interval,
        "watching {}",
        watch.catalog
    );

    let service = Service::new(watch)?;
    let cancel = CancellationToken::new();

    tokio::spawn(cancel_on_interrupt(cancel.clone(), tokio::signal::ctrl_c()));

    let stats = service.run(cancel).await?;
    info!(
        cycles = stats.cycles,
        fetch_failures = stats.fetch_failures,
        notifications = stats.notifications_sent,
        board_updates = stats.board_updates,
        sink_failures = stats.sink_failures,
        "stopped"
    );
    Ok(())
}

/// Cancel `cancel` once `signal` fires. If the handler cannot be installed
/// the watcher keeps running until the process is killed.
async fn cancel_on_interrupt(
    cancel: CancellationToken,
    signal: impl Future<Output = std::io::Result<()>>,
) {
    match signal.await {
        Ok(()) => {
            info!("interrupt received, shutting down");
            cancel.cancel();
        }
        Err(e) => warn!(error = %e, "cannot listen for Ctrl-C; stop the process to exit"),
    }
}
