use clap::ArgMatches;
use tracing::{error, info};

use super::helpers::CliContext;

pub(crate) async fn handle_switch_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let instance_id = matches
        .get_one::<String>("instance-id")
        .ok_or("Instance id argument is required")?;

    info!(event = "cli.switch_started", instance_id = instance_id.as_str());

    let ctx = CliContext::build(matches)?;

    let switched = match ctx.orchestrator.switch_to(instance_id) {
        Ok(switched) => switched,
        Err(e) => {
            eprintln!("Error: {}", e);
            error!(event = "cli.switch_failed", instance_id = instance_id.as_str(), error = %e);
            return Err(e.into());
        }
    };

    ctx.persist_instances();

    if !switched {
        eprintln!(
            "Error: Instance '{}' is not running or has no window to switch to.",
            instance_id
        );
        eprintln!("Tip: Use 'appdock list' to see running instances.");
        error!(event = "cli.switch_failed", instance_id = instance_id.as_str());
        return Err(format!("Cannot switch to instance: {}", instance_id).into());
    }

    println!("Switched to instance {}", instance_id);
    info!(event = "cli.switch_completed", instance_id = instance_id.as_str());
    Ok(())
}
