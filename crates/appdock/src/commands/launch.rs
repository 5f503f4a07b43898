use clap::ArgMatches;
use tracing::{error, info};

use appdock_core::AppCatalog;

use super::helpers::CliContext;

pub(crate) async fn handle_launch_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let app_id = matches
        .get_one::<String>("app-id")
        .ok_or("Application id argument is required")?;

    info!(event = "cli.launch_started", app_id = app_id.as_str());

    let ctx = CliContext::build(matches)?;

    let descriptor = match ctx.catalog.get(app_id) {
        Some(d) => d,
        None => {
            eprintln!("Error: Application '{}' not found in catalog.", app_id);
            eprintln!("Tip: Check ~/.appdock/catalog.toml or pass --catalog.");
            error!(event = "cli.launch_failed", app_id = app_id.as_str());
            return Err(format!("Unknown application: {}", app_id).into());
        }
    };

    let principal = matches
        .get_one::<String>("principal")
        .cloned()
        .unwrap_or_else(|| ctx.principal.clone());

    let result = match ctx.orchestrator.launch(&descriptor, &principal) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            error!(event = "cli.launch_failed", app_id = app_id.as_str(), error = %e);
            return Err(e.into());
        }
    };

    ctx.persist_instances();

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if result.success {
        let instance_id = result.instance_id.as_deref().unwrap_or("-");
        println!("Launched '{}' as instance {}", descriptor.display_name, instance_id);
        if result.pid > 0 {
            println!("  pid: {}", result.pid);
        }
    } else {
        let message = result.error.as_deref().unwrap_or("unknown error");
        eprintln!("Error: Launch failed: {}", message);
    }

    if !result.success {
        let message = result.error.clone().unwrap_or_else(|| "launch failed".to_string());
        error!(
            event = "cli.launch_failed",
            app_id = app_id.as_str(),
            error = message.as_str()
        );
        return Err(message.into());
    }

    info!(
        event = "cli.launch_completed",
        app_id = app_id.as_str(),
        instance_id = result.instance_id.as_deref().unwrap_or(""),
        pid = result.pid
    );
    Ok(())
}
