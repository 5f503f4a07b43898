use std::time::{Duration, Instant};

use sysinfo::{Pid as SysinfoPid, ProcessesToUpdate, Signal, System};
use tracing::debug;

use crate::process::errors::ProcessError;
use crate::process::types::{Pid, ProcessInfo, ProcessStatus};

/// Minimum length required for prefix matching to prevent false positives
/// with short names like "sh", "vi", "go"
const MIN_PREFIX_MATCH_LENGTH: usize = 5;

/// How often the bounded-wait loops re-check process liveness.
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Check if a process with the given PID is currently running
pub fn is_process_running(pid: u32) -> Result<bool, ProcessError> {
    let mut system = System::new();
    let pid_obj = SysinfoPid::from_u32(pid);
    system.refresh_processes(ProcessesToUpdate::Some(&[pid_obj]), true);
    Ok(system.process(pid_obj).is_some())
}

/// Get basic information about a process
pub fn get_process_info(pid: u32) -> Result<ProcessInfo, ProcessError> {
    let mut system = System::new();
    let pid_obj = SysinfoPid::from_u32(pid);
    system.refresh_processes(ProcessesToUpdate::Some(&[pid_obj]), true);

    match system.process(pid_obj) {
        Some(process) => Ok(ProcessInfo {
            pid: Pid::from_raw(pid),
            name: process.name().to_string_lossy().to_string(),
            status: ProcessStatus::from(process.status()),
            start_time: process.start_time(),
        }),
        None => Err(ProcessError::NotFound { pid }),
    }
}

/// Extract the base name from a path, handling both Unix (/) and Windows (\) separators
fn extract_base_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// Check if a process name matches an expected name
///
/// Uses strict matching to prevent PID reuse accidents:
/// 1. Exact match
/// 2. Base name match after stripping paths
/// 3. Prefix match only for names >= 5 characters (to avoid "sh" matching "bash")
///
/// Returns false rather than risk killing the wrong process.
fn process_name_matches(actual_name: &str, expected_name: &str) -> bool {
    if actual_name == expected_name {
        return true;
    }

    let actual_base = extract_base_name(actual_name);
    let expected_base = extract_base_name(expected_name);

    if actual_base == expected_base {
        return true;
    }

    if expected_base.len() >= MIN_PREFIX_MATCH_LENGTH && actual_base.starts_with(expected_base) {
        debug!(
            "process_name_matches: prefix match - actual='{}', expected='{}'",
            actual_name, expected_name
        );
        return true;
    }

    false
}

/// Validate that a live process still matches the identity captured at
/// launch, guarding against OS PID reuse.
fn validate_identity(
    process: &sysinfo::Process,
    pid: u32,
    expected_name: Option<&str>,
    expected_start_time: Option<u64>,
) -> Result<(), ProcessError> {
    if let Some(name) = expected_name {
        let actual_name = process.name().to_string_lossy().to_string();
        if !process_name_matches(&actual_name, name) {
            return Err(ProcessError::PidReused {
                pid,
                expected: name.to_string(),
                actual: actual_name,
            });
        }
    }

    if let Some(start_time) = expected_start_time
        && process.start_time() != start_time
    {
        return Err(ProcessError::PidReused {
            pid,
            expected: format!("start_time={}", start_time),
            actual: format!("start_time={}", process.start_time()),
        });
    }

    Ok(())
}

/// Forcefully kill a process, validating it matches expected metadata.
pub fn kill_process(
    pid: u32,
    expected_name: Option<&str>,
    expected_start_time: Option<u64>,
) -> Result<(), ProcessError> {
    let mut system = System::new();
    let pid_obj = SysinfoPid::from_u32(pid);
    system.refresh_processes(ProcessesToUpdate::Some(&[pid_obj]), true);

    match system.process(pid_obj) {
        Some(process) => {
            validate_identity(process, pid, expected_name, expected_start_time)?;

            if process.kill() {
                Ok(())
            } else {
                Err(ProcessError::KillFailed {
                    pid,
                    message: "Process kill signal failed".to_string(),
                })
            }
        }
        None => Err(ProcessError::NotFound { pid }),
    }
}

/// Gracefully terminate a process and wait a bounded time for it to exit.
///
/// Sends a termination request (SIGTERM where supported) and polls for
/// exit up to `timeout`. Returns `Ok(true)` if the process exited within
/// the wait, `Ok(false)` if it survived. Never escalates to a forced
/// kill — that is the caller's explicit decision.
pub fn terminate_process(
    pid: u32,
    expected_name: Option<&str>,
    expected_start_time: Option<u64>,
    timeout: Duration,
) -> Result<bool, ProcessError> {
    let mut system = System::new();
    let pid_obj = SysinfoPid::from_u32(pid);
    system.refresh_processes(ProcessesToUpdate::Some(&[pid_obj]), true);

    let Some(process) = system.process(pid_obj) else {
        return Err(ProcessError::NotFound { pid });
    };

    validate_identity(process, pid, expected_name, expected_start_time)?;

    // kill_with returns None when the signal is unsupported on this
    // platform; fall back to the portable kill request in that case.
    let signaled = match process.kill_with(Signal::Term) {
        Some(sent) => sent,
        None => process.kill(),
    };
    if !signaled {
        return Err(ProcessError::KillFailed {
            pid,
            message: "Termination signal failed".to_string(),
        });
    }

    let start = Instant::now();
    while start.elapsed() < timeout {
        if !is_process_running(pid)? {
            return Ok(true);
        }
        std::thread::sleep(EXIT_POLL_INTERVAL);
    }

    debug!(
        event = "core.process.graceful_timeout",
        pid = pid,
        timeout_ms = timeout.as_millis() as u64
    );
    Ok(!is_process_running(pid)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::{Command, Stdio};

    #[test]
    fn test_is_process_running_with_invalid_pid() {
        let result = is_process_running(999999);
        assert!(result.is_ok());
        assert!(!result.unwrap());
    }

    #[test]
    fn test_get_process_info_with_invalid_pid() {
        let result = get_process_info(999999);
        assert!(matches!(
            result,
            Err(ProcessError::NotFound { pid: 999999 })
        ));
    }

    #[test]
    fn test_kill_process_with_invalid_pid() {
        let result = kill_process(999999, None, None);
        assert!(matches!(
            result,
            Err(ProcessError::NotFound { pid: 999999 })
        ));
    }

    #[test]
    fn test_terminate_process_with_invalid_pid() {
        let result = terminate_process(999999, None, None, Duration::from_millis(100));
        assert!(matches!(
            result,
            Err(ProcessError::NotFound { pid: 999999 })
        ));
    }

    #[test]
    fn test_process_lifecycle() {
        let mut child = Command::new("sleep")
            .arg("10")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("Failed to spawn test process");

        let pid = child.id();

        let is_running = is_process_running(pid).expect("Failed to check process");
        assert!(is_running);

        let info = get_process_info(pid).expect("Failed to get process info");
        assert_eq!(info.pid.as_u32(), pid);
        assert!(info.name.contains("sleep"));

        let kill_result = kill_process(pid, Some(&info.name), Some(info.start_time));
        assert!(kill_result.is_ok());

        let _ = child.kill();
        let _ = child.wait();
    }

    #[test]
    fn test_terminate_process_graceful() {
        let mut child = Command::new("sleep")
            .arg("30")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("Failed to spawn test process");

        let pid = child.id();

        let exited = terminate_process(pid, None, None, Duration::from_secs(5))
            .expect("Failed to terminate process");
        assert!(exited, "sleep should exit promptly on SIGTERM");

        let _ = child.kill();
        let _ = child.wait();
    }

    #[test]
    fn test_kill_process_rejects_mismatched_name() {
        let mut child = Command::new("sleep")
            .arg("10")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("Failed to spawn test process");

        let pid = child.id();

        let result = kill_process(pid, Some("definitely-not-sleep"), None);
        assert!(matches!(result, Err(ProcessError::PidReused { .. })));

        let _ = child.kill();
        let _ = child.wait();
    }

    #[test]
    fn test_process_name_matches() {
        assert!(process_name_matches("launcher-agent", "launcher-agent"));
        assert!(process_name_matches("launcher-agent-v2", "launcher-agent"));
        assert!(process_name_matches("/usr/bin/sleep", "sleep"));
        assert!(process_name_matches("sleep", "/usr/bin/sleep"));
        assert!(!process_name_matches("gedit", "sleep"));
    }

    #[test]
    fn test_process_name_matches_security() {
        // Short patterns must not match via prefix ("sh" matching "bash")
        assert!(!process_name_matches("bash", "sh"));
        assert!(!process_name_matches("vim", "vi"));
        // Reverse direction (expected contains actual) is not supported
        assert!(!process_name_matches("sh", "bash"));
        // Arbitrary substring matching is not supported
        assert!(!process_name_matches("my-calc-daemon", "calc"));
    }

    #[test]
    fn test_extract_base_name() {
        assert_eq!(extract_base_name("/usr/bin/sleep"), "sleep");
        assert_eq!(
            extract_base_name("C:\\Program Files\\app\\test.exe"),
            "test.exe"
        );
        assert_eq!(extract_base_name("simple"), "simple");
        assert_eq!(extract_base_name(""), "");
    }
}
