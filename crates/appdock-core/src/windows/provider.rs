//! OS window access seam.
//!
//! [`WindowProvider`] is the trait the window manager is built against,
//! so tests can inject synthetic window sets. [`SystemWindowProvider`]
//! is the real implementation: enumeration through `xcap`, activation
//! best-effort per platform.

use tracing::debug;

use crate::windows::errors::WindowError;
use crate::windows::types::{WindowHandle, WindowSnapshot};

/// Access to the host OS window list.
pub trait WindowProvider: Send + Sync {
    /// Enumerate all visible windows.
    fn enumerate(&self) -> Result<Vec<WindowSnapshot>, WindowError>;

    /// Bring a window to the foreground.
    fn activate(&self, handle: WindowHandle) -> Result<(), WindowError>;

    /// Request a window close (best-effort).
    fn close(&self, handle: WindowHandle) -> Result<(), WindowError>;

    /// Minimize a window. Best-effort; platforms without a seam report
    /// [`WindowError::ActivationUnsupported`].
    fn minimize(&self, handle: WindowHandle) -> Result<(), WindowError> {
        let _ = handle;
        Err(WindowError::ActivationUnsupported)
    }
}

/// `xcap`-backed provider for the real OS window list.
pub struct SystemWindowProvider;

impl SystemWindowProvider {
    pub fn new() -> Self {
        Self
    }

    fn find_app_name(&self, handle: WindowHandle) -> Result<String, WindowError> {
        let windows = self.enumerate()?;
        windows
            .into_iter()
            .find(|w| w.handle == handle)
            .map(|w| w.class)
            .ok_or(WindowError::NotFound {
                handle: handle.as_u32(),
            })
    }
}

impl Default for SystemWindowProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowProvider for SystemWindowProvider {
    fn enumerate(&self) -> Result<Vec<WindowSnapshot>, WindowError> {
        let windows = xcap::Window::all().map_err(|e| WindowError::EnumerationFailed {
            message: e.to_string(),
        })?;

        let mut skipped_count = 0;
        let result: Vec<WindowSnapshot> = windows
            .into_iter()
            .filter_map(|w| {
                let id = match w.id() {
                    Ok(id) if id != 0 => id,
                    Ok(_) => return None,
                    Err(e) => {
                        debug!(
                            event = "core.window.property_access_failed",
                            property = "id",
                            error = %e
                        );
                        skipped_count += 1;
                        return None;
                    }
                };
                let title = w.title().unwrap_or_default();
                let owner_pid = w.pid().ok();
                let class = w.app_name().unwrap_or_default();
                Some(WindowSnapshot {
                    handle: WindowHandle::from_raw(id),
                    title,
                    owner_pid,
                    class,
                })
            })
            .collect();

        if skipped_count > 0 {
            debug!(
                event = "core.window.enumeration_skipped",
                skipped = skipped_count
            );
        }

        Ok(result)
    }

    #[cfg(target_os = "macos")]
    fn activate(&self, handle: WindowHandle) -> Result<(), WindowError> {
        let app_name = self.find_app_name(handle)?;
        let script = format!("tell application \"{}\" to activate", app_name);
        let output = std::process::Command::new("osascript")
            .arg("-e")
            .arg(&script)
            .output()
            .map_err(|e| WindowError::ActivationFailed {
                handle: handle.as_u32(),
                message: format!("Failed to execute osascript: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(WindowError::ActivationFailed {
                handle: handle.as_u32(),
                message: stderr.trim().to_string(),
            });
        }
        Ok(())
    }

    #[cfg(not(target_os = "macos"))]
    fn activate(&self, handle: WindowHandle) -> Result<(), WindowError> {
        // No portable foreground API on this platform; callers fall back
        // to the kind-specific re-launch path.
        let _ = self.find_app_name(handle)?;
        Err(WindowError::ActivationUnsupported)
    }

    #[cfg(target_os = "macos")]
    fn close(&self, handle: WindowHandle) -> Result<(), WindowError> {
        let app_name = self.find_app_name(handle)?;
        let script = format!(
            "tell application \"System Events\" to tell process \"{}\" to click button 1 of window 1",
            app_name
        );
        let output = std::process::Command::new("osascript")
            .arg("-e")
            .arg(&script)
            .output()
            .map_err(|e| WindowError::ActivationFailed {
                handle: handle.as_u32(),
                message: format!("Failed to execute osascript: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(WindowError::ActivationFailed {
                handle: handle.as_u32(),
                message: stderr.trim().to_string(),
            });
        }
        Ok(())
    }

    #[cfg(not(target_os = "macos"))]
    fn close(&self, handle: WindowHandle) -> Result<(), WindowError> {
        let _ = self.find_app_name(handle)?;
        Err(WindowError::ActivationUnsupported)
    }

    #[cfg(target_os = "macos")]
    fn minimize(&self, handle: WindowHandle) -> Result<(), WindowError> {
        let app_name = self.find_app_name(handle)?;
        let script = format!(
            "tell application \"System Events\" to tell process \"{}\" to set value of attribute \"AXMinimized\" of window 1 to true",
            app_name
        );
        let output = std::process::Command::new("osascript")
            .arg("-e")
            .arg(&script)
            .output()
            .map_err(|e| WindowError::ActivationFailed {
                handle: handle.as_u32(),
                message: format!("Failed to execute osascript: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(WindowError::ActivationFailed {
                handle: handle.as_u32(),
                message: stderr.trim().to_string(),
            });
        }
        Ok(())
    }

    #[cfg(not(target_os = "macos"))]
    fn minimize(&self, handle: WindowHandle) -> Result<(), WindowError> {
        let _ = self.find_app_name(handle)?;
        Err(WindowError::ActivationUnsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_trait_is_object_safe() {
        fn assert_provider(_p: &dyn WindowProvider) {}
        let provider = SystemWindowProvider::new();
        assert_provider(&provider);
    }
}
