//! Folder backend: opens a directory in the platform file manager.

use std::path::Path;

use tracing::info;

use crate::catalog::{ApplicationDescriptor, ApplicationKind};
use crate::launchers::backends::open_with_system;
use crate::launchers::errors::LauncherError;
use crate::launchers::traits::LauncherBackend;
use crate::launchers::types::Launched;

pub struct FolderLauncher;

impl LauncherBackend for FolderLauncher {
    fn kind_name(&self) -> &'static str {
        "folder"
    }

    fn can_launch(&self, descriptor: &ApplicationDescriptor) -> bool {
        descriptor.kind == ApplicationKind::Folder
    }

    fn launch(
        &self,
        descriptor: &ApplicationDescriptor,
        principal: &str,
    ) -> Result<Launched, LauncherError> {
        if !Path::new(&descriptor.target).is_dir() {
            return Err(LauncherError::TargetNotFound {
                path: descriptor.target.clone(),
            });
        }

        info!(
            event = "core.launcher.folder_launch_started",
            path = %descriptor.target,
            principal = %principal
        );
        open_with_system(&descriptor.target)?;
        Ok(Launched::detached())
    }
}
