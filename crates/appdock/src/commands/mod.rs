use clap::ArgMatches;
use tracing::error;

pub mod helpers;

mod cleanup;
mod launch;
mod list;
mod monitor;
mod switch;
mod terminate;

pub async fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("launch", sub_matches)) => launch::handle_launch_command(sub_matches).await,
        Some(("list", sub_matches)) => list::handle_list_command(sub_matches).await,
        Some(("switch", sub_matches)) => switch::handle_switch_command(sub_matches).await,
        Some(("terminate", sub_matches)) => terminate::handle_terminate_command(sub_matches).await,
        Some(("monitor", sub_matches)) => monitor::handle_monitor_command(sub_matches).await,
        Some(("cleanup", sub_matches)) => cleanup::handle_cleanup_command(sub_matches).await,
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}
