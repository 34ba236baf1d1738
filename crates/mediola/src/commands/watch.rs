//! `watch`: run the polling coordinator and print each new snapshot.

use std::sync::Arc;

use mediola_core::{Coordinator, GatewayConfig, Snapshot};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::shutters::render_shutters;

pub async fn handle(config: GatewayConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let interval = config.scan_interval;
    let coordinator = Coordinator::new(config)?;
    coordinator.start().await?;

    let mut rx = coordinator.subscribe();
    if !global.quiet {
        eprintln!(
            "Watching {} shutters every {}s (Ctrl-C to stop)",
            coordinator.snapshot().len(),
            interval.as_secs()
        );
    }
    print_snapshot(&rx.borrow_and_update().clone(), global);

    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                break;
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = rx.borrow_and_update().clone();
                print_snapshot(&snapshot, global);
            }
        }
    }

    coordinator.shutdown().await;
    Ok(())
}

fn print_snapshot(snapshot: &Arc<Snapshot>, global: &GlobalOpts) {
    if !global.quiet {
        let at = snapshot
            .fetched_at
            .map_or_else(|| "-".into(), |t| t.format("%H:%M:%S").to_string());
        eprintln!("── snapshot {} at {at} ──", snapshot.version);
    }
    output::print_output(&render_shutters(global, &snapshot.shutters), global.quiet);
}
