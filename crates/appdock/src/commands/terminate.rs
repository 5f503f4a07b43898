use clap::ArgMatches;
use tracing::{error, info};

use super::helpers::CliContext;

pub(crate) async fn handle_terminate_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let instance_id = matches
        .get_one::<String>("instance-id")
        .ok_or("Instance id argument is required")?;
    let force = matches.get_flag("force");

    info!(
        event = "cli.terminate_started",
        instance_id = instance_id.as_str(),
        force = force
    );

    let ctx = CliContext::build(matches)?;

    let outcome = if force {
        ctx.orchestrator.force_terminate(instance_id)
    } else {
        ctx.orchestrator.terminate(instance_id)
    };
    let terminated = match outcome {
        Ok(terminated) => terminated,
        Err(e) => {
            eprintln!("Error: {}", e);
            error!(event = "cli.terminate_failed", instance_id = instance_id.as_str(), error = %e);
            return Err(e.into());
        }
    };

    ctx.persist_instances();

    if !terminated {
        eprintln!("Error: Instance '{}' could not be terminated.", instance_id);
        if !force {
            eprintln!("Tip: Retry with --force to kill the process outright.");
        }
        error!(event = "cli.terminate_failed", instance_id = instance_id.as_str());
        return Err(format!("Cannot terminate instance: {}", instance_id).into());
    }

    println!("Terminated instance {}", instance_id);
    info!(event = "cli.terminate_completed", instance_id = instance_id.as_str());
    Ok(())
}
