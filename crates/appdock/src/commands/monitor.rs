use clap::ArgMatches;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use appdock_core::{InstanceEvent, InstanceEventKind};

use super::helpers::CliContext;

pub(crate) async fn handle_monitor_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(event = "cli.monitor_started");

    let ctx = CliContext::build(matches)?;
    let mut events = ctx.orchestrator.subscribe();
    ctx.orchestrator.start_monitoring();

    println!("Monitoring instances. Press Ctrl-C to stop.");

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    error!(event = "cli.monitor_signal_failed", error = %e);
                }
                break;
            }
            received = events.recv() => {
                match received {
                    Ok(event) => print_event(&event),
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(event = "cli.monitor_lagged", missed = missed);
                        eprintln!("Warning: dropped {} events (receiver lagging)", missed);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    if let Err(e) = ctx.orchestrator.stop_monitoring().await {
        warn!(event = "cli.monitor_stop_failed", error = %e);
    }
    ctx.persist_instances();

    println!("Monitoring stopped.");
    info!(event = "cli.monitor_completed");
    Ok(())
}

fn print_event(event: &InstanceEvent) {
    let label = match event.kind {
        InstanceEventKind::Started => "started",
        InstanceEventKind::Stopped => "stopped",
        InstanceEventKind::StateChanged => "state-changed",
        InstanceEventKind::Activated => "activated",
        InstanceEventKind::Error => "error",
    };
    let transition = match (event.previous_state, event.new_state) {
        (Some(from), Some(to)) => format!(" {} -> {}", from.as_str(), to.as_str()),
        (None, Some(to)) => format!(" -> {}", to.as_str()),
        _ => String::new(),
    };
    let reason = event
        .reason
        .as_deref()
        .map(|r| format!(" ({})", r))
        .unwrap_or_default();

    println!(
        "[{}] {:<13} {} {}{}{}",
        event.timestamp.format("%H:%M:%S"),
        label,
        &event.instance.id[..event.instance.id.len().min(8)],
        event.instance.descriptor.display_name,
        transition,
        reason
    );
}
