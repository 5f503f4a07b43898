//! Native desktop process backend.

use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::catalog::{ApplicationDescriptor, ApplicationKind};
use crate::launchers::errors::LauncherError;
use crate::launchers::traits::LauncherBackend;
use crate::launchers::types::Launched;
use crate::process::operations as process_ops;
use crate::process::ProcessMetadata;

/// Spawns the target executable directly and records its identity.
pub struct NativeLauncher;

impl LauncherBackend for NativeLauncher {
    fn kind_name(&self) -> &'static str {
        "native_process"
    }

    fn can_launch(&self, descriptor: &ApplicationDescriptor) -> bool {
        descriptor.kind == ApplicationKind::NativeProcess
    }

    fn launch(
        &self,
        descriptor: &ApplicationDescriptor,
        principal: &str,
    ) -> Result<Launched, LauncherError> {
        info!(
            event = "core.launcher.native_launch_started",
            target = %descriptor.target,
            principal = %principal
        );

        let mut command = Command::new(&descriptor.target);
        command
            .args(&descriptor.args)
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if let Some(dir) = &descriptor.working_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|e| LauncherError::LaunchFailed {
            target: descriptor.target.clone(),
            message: e.to_string(),
        })?;

        let pid = child.id();

        // Reap the child when it exits so it never lingers as a zombie;
        // liveness tracking goes through the process monitor, not wait().
        std::thread::spawn(move || {
            let _ = child.wait();
        });

        // Identity capture is best-effort: a process that exits
        // immediately is still a successful launch.
        let process = match process_ops::get_process_info(pid) {
            Ok(info) => Some(ProcessMetadata {
                name: info.name,
                start_time: info.start_time,
            }),
            Err(e) => {
                debug!(
                    event = "core.launcher.native_identity_unavailable",
                    pid = pid,
                    error = %e
                );
                None
            }
        };

        info!(event = "core.launcher.native_launch_completed", pid = pid);
        Ok(Launched::with_pid(pid, process))
    }
}
