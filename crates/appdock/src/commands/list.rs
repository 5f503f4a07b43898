use clap::ArgMatches;
use tracing::info;

use crate::table::TableFormatter;

use super::helpers::CliContext;

pub(crate) async fn handle_list_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(event = "cli.list_started");

    let ctx = CliContext::build(matches)?;

    let mut instances = if matches.get_flag("all") {
        ctx.orchestrator.get_all()
    } else if let Some(principal) = matches.get_one::<String>("user") {
        ctx.orchestrator.get_running_for_user(principal)
    } else {
        ctx.orchestrator.get_running()
    };
    instances.sort_by(|a, b| a.started_at.cmp(&b.started_at));

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&instances)?);
    } else if instances.is_empty() {
        println!("No instances found.");
        println!("Tip: Use 'appdock launch <app-id>' to start one.");
    } else {
        let formatter = TableFormatter::new(&instances);
        formatter.print_table(&instances);
    }

    info!(event = "cli.list_completed", count = instances.len());
    Ok(())
}
