use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("appdock")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Launch, track, and switch corporate applications")
        .long_about(
            "appdock launches heterogeneous application kinds (native processes, web pages, \
            browser app-mode windows, folders, Android packages) from a catalog, tracks each \
            launch as an instance with a state machine, and correlates instances with OS windows.",
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("catalog")
                .long("catalog")
                .help("Path to the application catalog TOML (default: ~/.appdock/catalog.toml)")
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("launch")
                .about("Launch an application from the catalog")
                .arg(
                    Arg::new("app-id")
                        .help("Catalog id of the application to launch")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("principal")
                        .long("principal")
                        .short('p')
                        .help("Principal to launch as (default: current user)"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output the launch result as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List tracked application instances")
                .arg(
                    Arg::new("user")
                        .long("user")
                        .short('u')
                        .help("Only instances launched by this principal"),
                )
                .arg(
                    Arg::new("all")
                        .long("all")
                        .help("Include terminated instances")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("switch")
                .about("Bring an instance's window to the foreground")
                .arg(
                    Arg::new("instance-id")
                        .help("Id of the instance to switch to")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("terminate")
                .about("Terminate an instance")
                .arg(
                    Arg::new("instance-id")
                        .help("Id of the instance to terminate")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .short('f')
                        .help("Force kill instead of a graceful stop")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("monitor")
                .about("Run the polling loops and print lifecycle events until Ctrl-C"),
        )
        .subcommand(Command::new("cleanup").about("Reap terminated instances past retention"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_structure_is_valid() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_launch_parses_principal() {
        let matches = build_cli()
            .try_get_matches_from(["appdock", "launch", "editor", "--principal", "alice"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "launch");
        assert_eq!(sub.get_one::<String>("app-id").unwrap(), "editor");
        assert_eq!(sub.get_one::<String>("principal").unwrap(), "alice");
    }

    #[test]
    fn test_terminate_force_flag() {
        let matches = build_cli()
            .try_get_matches_from(["appdock", "terminate", "i-1", "--force"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert!(sub.get_flag("force"));
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(build_cli().try_get_matches_from(["appdock"]).is_err());
    }
}
