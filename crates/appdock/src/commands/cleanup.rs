use clap::ArgMatches;
use tracing::info;

use super::helpers::CliContext;

pub(crate) async fn handle_cleanup_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(event = "cli.cleanup_started");

    let ctx = CliContext::build(matches)?;

    let removed = ctx.orchestrator.cleanup();
    ctx.persist_instances();

    if removed == 0 {
        println!("No terminated instances past retention.");
    } else {
        println!("Removed {} terminated instance(s).", removed);
    }

    info!(event = "cli.cleanup_completed", removed = removed);
    Ok(())
}
