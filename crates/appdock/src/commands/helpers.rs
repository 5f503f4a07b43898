//! Shared command plumbing: config, catalog, orchestrator, instance store.

use std::path::PathBuf;

use clap::ArgMatches;
use serde::Deserialize;
use tracing::{debug, warn};

use appdock_core::instances::persistence;
use appdock_core::instances::types::InstanceState;
use appdock_core::process::operations as process_ops;
use appdock_core::{
    AppdockConfig, ApplicationDescriptor, EnvPrincipalProvider, MemoryCatalog, Orchestrator,
    PrincipalProvider,
};
use chrono::Utc;

/// Catalog TOML file shape: a list of `[[applications]]` tables.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    applications: Vec<ApplicationDescriptor>,
}

pub struct CliContext {
    pub orchestrator: Orchestrator,
    pub catalog: MemoryCatalog,
    pub principal: String,
    instances_dir: Option<PathBuf>,
}

impl CliContext {
    /// Build the runtime for one command invocation: load config and
    /// catalog, compose the orchestrator, and restore persisted
    /// instances with a liveness reconciliation pass.
    pub fn build(matches: &ArgMatches) -> Result<Self, Box<dyn std::error::Error>> {
        let config = AppdockConfig::load()?;
        let catalog = load_catalog(matches)?;
        let orchestrator = Orchestrator::with_defaults(&config);
        let principal = EnvPrincipalProvider.current_principal();
        let instances_dir = persistence::default_instances_dir();

        let context = Self {
            orchestrator,
            catalog,
            principal,
            instances_dir,
        };
        context.restore_instances();
        Ok(context)
    }

    /// Load the persisted instance records, reconciling liveness:
    /// a record whose process died while no appdock was running comes
    /// back as `Terminated`.
    fn restore_instances(&self) {
        let Some(dir) = &self.instances_dir else {
            return;
        };
        let (instances, skipped) = match persistence::load_instances_from_files(dir) {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!(event = "cli.instance_store_load_failed", error = %e);
                return;
            }
        };
        if skipped > 0 {
            warn!(event = "cli.instance_store_skipped", skipped = skipped);
        }

        for mut instance in instances {
            if !instance.state.is_terminal() && instance.pid > 0 {
                let alive = process_ops::is_process_running(instance.pid).unwrap_or(false);
                let identity_ok = alive
                    && match (&instance.process, process_ops::get_process_info(instance.pid)) {
                        (Some(meta), Ok(info)) => info.start_time == meta.start_time,
                        _ => alive,
                    };
                if !identity_ok {
                    debug!(
                        event = "cli.restore_stale_instance",
                        instance_id = %instance.id,
                        pid = instance.pid
                    );
                    instance.state = InstanceState::Terminated;
                    instance.ended_at = Some(Utc::now());
                    instance.updated_at = Utc::now();
                }
            }
            if let Err(e) = self.orchestrator.restore(instance) {
                warn!(event = "cli.restore_failed", error = %e);
            }
        }
    }

    /// Write the current registry back to the store and drop files for
    /// instances that no longer exist (reaped by cleanup).
    pub fn persist_instances(&self) {
        let Some(dir) = &self.instances_dir else {
            return;
        };
        if let Err(e) = persistence::ensure_instances_directory(dir) {
            warn!(event = "cli.instance_store_create_failed", error = %e);
            return;
        }

        let current = self.orchestrator.get_all();
        let current_ids: std::collections::HashSet<&str> =
            current.iter().map(|i| i.id.as_str()).collect();

        for instance in &current {
            if let Err(e) = persistence::save_instance_to_file(instance, dir) {
                warn!(
                    event = "cli.instance_store_save_failed",
                    instance_id = %instance.id,
                    error = %e
                );
            }
        }

        if let Ok((stored, _)) = persistence::load_instances_from_files(dir) {
            for stale in stored.iter().filter(|i| !current_ids.contains(i.id.as_str())) {
                if let Err(e) = persistence::remove_instance_file(dir, &stale.id) {
                    warn!(
                        event = "cli.instance_store_remove_failed",
                        instance_id = %stale.id,
                        error = %e
                    );
                }
            }
        }
    }
}

fn catalog_path(matches: &ArgMatches) -> Option<PathBuf> {
    if let Some(path) = matches.get_one::<String>("catalog") {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".appdock").join("catalog.toml"))
}

fn load_catalog(matches: &ArgMatches) -> Result<MemoryCatalog, Box<dyn std::error::Error>> {
    let Some(path) = catalog_path(matches) else {
        return Ok(MemoryCatalog::new(vec![])?);
    };
    if !path.exists() {
        // An explicitly named catalog must exist; the default path may not.
        if matches.get_one::<String>("catalog").is_some() {
            return Err(format!("Catalog file not found: {}", path.display()).into());
        }
        return Ok(MemoryCatalog::new(vec![])?);
    }

    let content = std::fs::read_to_string(&path)?;
    let file: CatalogFile =
        toml::from_str(&content).map_err(|e| format!("{}: {}", path.display(), e))?;
    Ok(MemoryCatalog::new(file.applications)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use appdock_core::AppCatalog;

    #[test]
    fn test_catalog_file_parses() {
        let file: CatalogFile = toml::from_str(
            r#"
[[applications]]
id = "editor"
kind = "native_process"
target = "/usr/bin/gedit"
display_name = "Editor"

[[applications]]
id = "portal"
kind = "web_page"
target = "https://corp.example/portal"
display_name = "Corp Portal"
"#,
        )
        .unwrap();
        assert_eq!(file.applications.len(), 2);

        let catalog = MemoryCatalog::new(file.applications).unwrap();
        assert!(catalog.get("editor").is_some());
        assert!(catalog.get("portal").is_some());
    }

    #[test]
    fn test_empty_catalog_file_parses() {
        let file: CatalogFile = toml::from_str("").unwrap();
        assert!(file.applications.is_empty());
    }
}
