pub mod android;
pub mod browser_app;
pub mod folder;
pub mod native;
pub mod web;

pub use android::AndroidLauncher;
pub use browser_app::BrowserAppLauncher;
pub use folder::FolderLauncher;
pub use native::NativeLauncher;
pub use web::WebPageLauncher;

use std::process::{Command, Stdio};

use crate::launchers::errors::LauncherError;

/// Hand a target (URL or path) to the platform's default opener.
///
/// The opener process is transient and carries no useful identity, so
/// no pid is returned. The child is reaped on a detached thread.
pub(crate) fn open_with_system(target: &str) -> Result<(), LauncherError> {
    let (program, args): (&str, Vec<&str>) = if cfg!(target_os = "macos") {
        ("open", vec![target])
    } else if cfg!(target_os = "windows") {
        ("cmd", vec!["/C", "start", "", target])
    } else {
        ("xdg-open", vec![target])
    };

    let mut child = Command::new(program)
        .args(&args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| LauncherError::LaunchFailed {
            target: target.to_string(),
            message: format!("{}: {}", program, e),
        })?;

    std::thread::spawn(move || {
        let _ = child.wait();
    });
    Ok(())
}
