//! `stockwatch check`: one fetch, rendered against a cold-start state.

use std::io::Write;
use std::sync::Arc;

use tracing::info;

use crate::cli::{CheckArgs, GlobalOpts};
use crate::error::CliError;

pub async fn handle(args: &CheckArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let config = super::load(global)?;
    let source = config.source_config()?;
    let catalog = Arc::new(config.catalog()?);

    let probe = stockwatch_core::probe(&source, catalog, config.notify_scope).await?;
    info!(token = %probe.token, "snapshot fetched");

    let mut out = std::io::stdout().lock();
    if args.changes {
        for line in &probe.reconciliation.lines {
            writeln!(out, "{line}")?;
        }
        writeln!(out)?;
    }
    write!(out, "{}", probe.board)?;
    Ok(())
}
