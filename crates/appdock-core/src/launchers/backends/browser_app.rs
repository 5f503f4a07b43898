//! Browser app-mode backend: a chromeless browser window per URL.

use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::catalog::{ApplicationDescriptor, ApplicationKind};
use crate::config::BrowserConfig;
use crate::launchers::errors::LauncherError;
use crate::launchers::traits::LauncherBackend;
use crate::launchers::types::Launched;
use crate::process::operations as process_ops;
use crate::process::ProcessMetadata;

/// Probes the configured browser candidates in order and launches the
/// first one present on PATH with `--app=<url>`.
pub struct BrowserAppLauncher {
    candidates: Vec<String>,
}

impl BrowserAppLauncher {
    pub fn new(config: &BrowserConfig) -> Self {
        Self {
            candidates: config.app_mode_candidates.clone(),
        }
    }

    fn find_browser(&self) -> Result<std::path::PathBuf, LauncherError> {
        for candidate in &self.candidates {
            if let Ok(path) = which::which(candidate) {
                debug!(
                    event = "core.launcher.browser_found",
                    browser = %candidate
                );
                return Ok(path);
            }
        }
        Err(LauncherError::BrowserUnavailable {
            tried: self.candidates.join(", "),
        })
    }
}

impl LauncherBackend for BrowserAppLauncher {
    fn kind_name(&self) -> &'static str {
        "browser_app"
    }

    fn can_launch(&self, descriptor: &ApplicationDescriptor) -> bool {
        descriptor.kind == ApplicationKind::BrowserApp
    }

    fn launch(
        &self,
        descriptor: &ApplicationDescriptor,
        principal: &str,
    ) -> Result<Launched, LauncherError> {
        let browser = self.find_browser()?;

        info!(
            event = "core.launcher.browser_app_launch_started",
            browser = %browser.display(),
            url = %descriptor.target,
            principal = %principal
        );

        let mut child = Command::new(&browser)
            .arg(format!("--app={}", descriptor.target))
            .args(&descriptor.args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| LauncherError::LaunchFailed {
                target: descriptor.target.clone(),
                message: format!("{}: {}", browser.display(), e),
            })?;

        let pid = child.id();
        std::thread::spawn(move || {
            let _ = child.wait();
        });

        // Browsers often forward to an existing instance and exit, so
        // the spawned pid is advisory. Identity capture is best-effort.
        let process = process_ops::get_process_info(pid)
            .ok()
            .map(|info| ProcessMetadata {
                name: info.name,
                start_time: info.start_time,
            });

        Ok(Launched::with_pid(pid, process))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launcher_with(candidates: &[&str]) -> BrowserAppLauncher {
        BrowserAppLauncher {
            candidates: candidates.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn descriptor() -> ApplicationDescriptor {
        ApplicationDescriptor {
            id: "crm".to_string(),
            kind: ApplicationKind::BrowserApp,
            target: "https://corp.example/crm".to_string(),
            args: vec![],
            display_name: "Corp CRM".to_string(),
            working_dir: None,
        }
    }

    #[test]
    fn test_can_launch_only_browser_apps() {
        let launcher = launcher_with(&["msedge"]);
        assert!(launcher.can_launch(&descriptor()));

        let mut web = descriptor();
        web.kind = ApplicationKind::WebPage;
        assert!(!launcher.can_launch(&web));
    }

    #[test]
    fn test_no_candidate_available_fails() {
        let launcher = launcher_with(&["definitely-not-a-browser-9000"]);
        let result = launcher.launch(&descriptor(), "alice");
        assert!(matches!(
            result,
            Err(LauncherError::BrowserUnavailable { .. })
        ));
    }
}
