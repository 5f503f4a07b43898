//! Web page backend: hands the URL to the platform's default browser.

use tracing::info;

use crate::catalog::{ApplicationDescriptor, ApplicationKind};
use crate::launchers::backends::open_with_system;
use crate::launchers::errors::LauncherError;
use crate::launchers::traits::LauncherBackend;
use crate::launchers::types::Launched;

/// The opener process is transient, so the resulting instance has no
/// pid and is excluded from process polling.
pub struct WebPageLauncher;

impl LauncherBackend for WebPageLauncher {
    fn kind_name(&self) -> &'static str {
        "web_page"
    }

    fn can_launch(&self, descriptor: &ApplicationDescriptor) -> bool {
        descriptor.kind == ApplicationKind::WebPage
    }

    fn launch(
        &self,
        descriptor: &ApplicationDescriptor,
        principal: &str,
    ) -> Result<Launched, LauncherError> {
        info!(
            event = "core.launcher.web_launch_started",
            url = %descriptor.target,
            principal = %principal
        );
        open_with_system(&descriptor.target)?;
        Ok(Launched::detached())
    }
}
