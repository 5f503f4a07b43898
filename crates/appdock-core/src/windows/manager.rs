//! Window manager: enumeration with first-seen tracking, lookups, and
//! the correlation entry point for ambiguous-origin launches.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::CorrelationConfig;
use crate::windows::correlation::{CorrelationCache, correlate};
use crate::windows::errors::WindowError;
use crate::windows::provider::WindowProvider;
use crate::windows::types::{WindowHandle, WindowInfo};

struct TrackingState {
    /// First enumeration pass that observed each handle. Best-effort
    /// stand-in for window creation time.
    first_seen: HashMap<u32, DateTime<Utc>>,
    /// Handles observed by the previous pass, for change detection.
    last_set: HashSet<u32>,
    cache: CorrelationCache,
}

/// Queries and manipulates OS windows through a [`WindowProvider`].
pub struct WindowManager {
    provider: Arc<dyn WindowProvider>,
    correlation_window_secs: i64,
    state: Mutex<TrackingState>,
}

impl WindowManager {
    pub fn new(provider: Arc<dyn WindowProvider>, config: &CorrelationConfig) -> Self {
        Self {
            provider,
            correlation_window_secs: config.window_secs,
            state: Mutex::new(TrackingState {
                first_seen: HashMap::new(),
                last_set: HashSet::new(),
                cache: CorrelationCache::new(Duration::from_secs(config.cache_ttl_secs)),
            }),
        }
    }

    /// Enumerate the current window set, updating first-seen tracking.
    ///
    /// Any change in the set of live handles invalidates the correlation
    /// cache, since cached handles may have gone stale.
    pub fn snapshot(&self) -> Result<Vec<WindowInfo>, WindowError> {
        let snapshots = self.provider.enumerate()?;
        let now = Utc::now();

        let mut state = self.state.lock().expect("window tracking lock poisoned");
        let current_set: HashSet<u32> = snapshots.iter().map(|w| w.handle.as_u32()).collect();

        if current_set != state.last_set {
            debug!(
                event = "core.window.set_changed",
                previous = state.last_set.len(),
                current = current_set.len()
            );
            state.cache.invalidate_all();
        }
        state.first_seen.retain(|handle, _| current_set.contains(handle));
        for snapshot in &snapshots {
            state
                .first_seen
                .entry(snapshot.handle.as_u32())
                .or_insert(now);
        }
        state.last_set = current_set;

        let result = snapshots
            .into_iter()
            .map(|w| {
                let first_seen = state
                    .first_seen
                    .get(&w.handle.as_u32())
                    .copied()
                    .unwrap_or(now);
                WindowInfo {
                    handle: w.handle,
                    title: w.title,
                    owner_pid: w.owner_pid,
                    class: w.class,
                    first_seen,
                }
            })
            .collect();
        Ok(result)
    }

    /// Find the first window owned by the given process.
    pub fn find_by_pid(&self, pid: u32) -> Result<Option<WindowInfo>, WindowError> {
        let windows = self.snapshot()?;
        Ok(windows.into_iter().find(|w| w.owner_pid == Some(pid)))
    }

    /// Check whether a real window handle is still present.
    ///
    /// Placeholder handles never exist.
    pub fn window_exists(&self, handle: WindowHandle) -> Result<bool, WindowError> {
        if handle.is_placeholder() {
            return Ok(false);
        }
        let windows = self.snapshot()?;
        Ok(windows.iter().any(|w| w.handle == handle))
    }

    /// Bring a window to the foreground.
    ///
    /// Returns an error for placeholder handles; callers fall back to
    /// the kind-specific re-launch path.
    pub fn activate(&self, handle: WindowHandle) -> Result<(), WindowError> {
        if handle.is_placeholder() {
            return Err(WindowError::NotFound {
                handle: handle.as_u32(),
            });
        }
        info!(event = "core.window.activate_started", handle = handle.as_u32());
        self.provider.activate(handle)
    }

    /// Request a window close (best-effort; failures logged by callers).
    pub fn close(&self, handle: WindowHandle) -> Result<(), WindowError> {
        if handle.is_placeholder() {
            return Err(WindowError::NotFound {
                handle: handle.as_u32(),
            });
        }
        self.provider.close(handle)
    }

    /// Minimize a window (best-effort).
    pub fn minimize(&self, handle: WindowHandle) -> Result<(), WindowError> {
        if handle.is_placeholder() {
            return Err(WindowError::NotFound {
                handle: handle.as_u32(),
            });
        }
        self.provider.minimize(handle)
    }

    /// Correlate an ambiguous-origin launch with a host window.
    ///
    /// Consults the short-TTL cache first; on a miss runs the heuristic
    /// over a fresh snapshot. `key` identifies the logical launch
    /// (instance id) for caching purposes.
    pub fn correlate_ambiguous(
        &self,
        key: &str,
        frame_class: &str,
        display_name: &str,
        launch_time: DateTime<Utc>,
    ) -> Result<Option<WindowInfo>, WindowError> {
        // Cache probe before any enumeration.
        {
            let state = self.state.lock().expect("window tracking lock poisoned");
            if let Some(handle) = state.cache.get(key) {
                debug!(
                    event = "core.correlation.cache_hit",
                    key = key,
                    handle = handle.as_u32()
                );
                drop(state);
                let windows = self.snapshot()?;
                if let Some(info) = windows.into_iter().find(|w| w.handle == handle) {
                    return Ok(Some(info));
                }
                // Cached handle vanished; fall through to a fresh run.
            }
        }

        let windows = self.snapshot()?;
        let result = correlate(
            &windows,
            frame_class,
            display_name,
            launch_time,
            self.correlation_window_secs,
        );

        match &result {
            Some(info) => {
                let mut state = self.state.lock().expect("window tracking lock poisoned");
                state.cache.insert(key.to_string(), info.handle);
                info!(
                    event = "core.correlation.completed",
                    key = key,
                    handle = info.handle.as_u32(),
                    title = %info.title
                );
            }
            None => {
                warn!(
                    event = "core.correlation.failed",
                    key = key,
                    display_name = display_name
                );
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::windows::types::WindowSnapshot;
    use std::sync::Mutex as StdMutex;

    /// Provider returning a scripted window set, mutable from tests.
    struct FakeProvider {
        windows: StdMutex<Vec<WindowSnapshot>>,
        activated: StdMutex<Vec<u32>>,
    }

    impl FakeProvider {
        fn new(windows: Vec<WindowSnapshot>) -> Self {
            Self {
                windows: StdMutex::new(windows),
                activated: StdMutex::new(Vec::new()),
            }
        }

        fn set_windows(&self, windows: Vec<WindowSnapshot>) {
            *self.windows.lock().unwrap() = windows;
        }
    }

    impl WindowProvider for FakeProvider {
        fn enumerate(&self) -> Result<Vec<WindowSnapshot>, WindowError> {
            Ok(self.windows.lock().unwrap().clone())
        }

        fn activate(&self, handle: WindowHandle) -> Result<(), WindowError> {
            self.activated.lock().unwrap().push(handle.as_u32());
            Ok(())
        }

        fn close(&self, _handle: WindowHandle) -> Result<(), WindowError> {
            Ok(())
        }
    }

    fn snapshot(handle: u32, title: &str, class: &str, pid: Option<u32>) -> WindowSnapshot {
        WindowSnapshot {
            handle: WindowHandle::from_raw(handle),
            title: title.to_string(),
            owner_pid: pid,
            class: class.to_string(),
        }
    }

    fn manager_with(provider: Arc<FakeProvider>) -> WindowManager {
        WindowManager::new(provider, &CorrelationConfig::default())
    }

    #[test]
    fn test_snapshot_assigns_first_seen_once() {
        let provider = Arc::new(FakeProvider::new(vec![snapshot(1, "A", "Frame", None)]));
        let manager = manager_with(provider.clone());

        let first = manager.snapshot().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        let second = manager.snapshot().unwrap();

        assert_eq!(first[0].first_seen, second[0].first_seen);
    }

    #[test]
    fn test_find_by_pid() {
        let provider = Arc::new(FakeProvider::new(vec![
            snapshot(1, "A", "Frame", Some(100)),
            snapshot(2, "B", "Frame", Some(200)),
        ]));
        let manager = manager_with(provider);

        let found = manager.find_by_pid(200).unwrap();
        assert_eq!(found.unwrap().handle.as_u32(), 2);
        assert!(manager.find_by_pid(999).unwrap().is_none());
    }

    #[test]
    fn test_window_exists_placeholder_is_never_present() {
        let provider = Arc::new(FakeProvider::new(vec![snapshot(1, "A", "Frame", None)]));
        let manager = manager_with(provider);

        assert!(!manager.window_exists(WindowHandle::PLACEHOLDER).unwrap());
        assert!(manager.window_exists(WindowHandle::from_raw(1)).unwrap());
        assert!(!manager.window_exists(WindowHandle::from_raw(9)).unwrap());
    }

    #[test]
    fn test_activate_placeholder_fails() {
        let provider = Arc::new(FakeProvider::new(vec![]));
        let manager = manager_with(provider);
        assert!(matches!(
            manager.activate(WindowHandle::PLACEHOLDER),
            Err(WindowError::NotFound { .. })
        ));
    }

    #[test]
    fn test_correlate_ambiguous_finds_new_window() {
        let provider = Arc::new(FakeProvider::new(vec![snapshot(
            7,
            "Corp Expenses",
            "ApplicationFrameWindow",
            None,
        )]));
        let manager = manager_with(provider);

        let result = manager
            .correlate_ambiguous("inst-1", "ApplicationFrameWindow", "Corp Expenses", Utc::now())
            .unwrap();
        assert_eq!(result.unwrap().handle.as_u32(), 7);
    }

    #[test]
    fn test_correlate_cache_survives_stable_window_set() {
        let provider = Arc::new(FakeProvider::new(vec![snapshot(
            7,
            "Corp Expenses",
            "ApplicationFrameWindow",
            None,
        )]));
        let manager = manager_with(provider.clone());

        let launch = Utc::now();
        let first = manager
            .correlate_ambiguous("inst-1", "ApplicationFrameWindow", "Corp Expenses", launch)
            .unwrap()
            .unwrap();

        // Second lookup with an unhelpful display name still resolves via cache.
        let second = manager
            .correlate_ambiguous("inst-1", "ApplicationFrameWindow", "different-name", launch)
            .unwrap()
            .unwrap();
        assert_eq!(first.handle, second.handle);
    }

    #[test]
    fn test_window_set_change_invalidates_cache() {
        let provider = Arc::new(FakeProvider::new(vec![snapshot(
            7,
            "Corp Expenses",
            "ApplicationFrameWindow",
            None,
        )]));
        let manager = manager_with(provider.clone());

        let launch = Utc::now();
        manager
            .correlate_ambiguous("inst-1", "ApplicationFrameWindow", "Corp Expenses", launch)
            .unwrap()
            .unwrap();

        // The correlated window disappears; lookup must not return it.
        provider.set_windows(vec![]);
        let result = manager
            .correlate_ambiguous("inst-1", "ApplicationFrameWindow", "Corp Expenses", launch)
            .unwrap();
        assert!(result.is_none());
    }
}
