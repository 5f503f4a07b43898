//! Window correlation heuristic for ambiguous-origin launches.
//!
//! The compatibility subsystem surfaces Android activities as host
//! windows of one generic frame class, with no linkage back to the
//! originating package or launch request. Correlation is a guess, in
//! order, first match wins:
//!
//! 1. Candidates are windows of the generic frame class.
//! 2. Filter to windows first seen within ±`window_secs` of the launch
//!    timestamp.
//! 3. Prefer a survivor whose title contains the application's display
//!    name (case-insensitive).
//! 4. Otherwise fall back to the earliest survivor in first-seen order.
//! 5. No survivor means no match.
//!
//! Known limitation: when multiple Android applications launch within
//! the same time window and none matches by title, the earliest-survivor
//! fallback may pick the wrong window. This ambiguity is inherent to the
//! missing OS linkage and is deliberately not papered over.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::windows::types::{WindowHandle, WindowInfo};

/// Run the correlation heuristic over an enumerated window set.
///
/// Returns the best candidate, or `None` when correlation fails. The
/// caller decides how to degrade (placeholder window).
pub fn correlate(
    windows: &[WindowInfo],
    frame_class: &str,
    display_name: &str,
    launch_time: DateTime<Utc>,
    window_secs: i64,
) -> Option<WindowInfo> {
    let mut candidates: Vec<&WindowInfo> = windows
        .iter()
        .filter(|w| w.class == frame_class)
        .filter(|w| {
            let offset = (w.first_seen - launch_time).num_seconds();
            offset.abs() <= window_secs
        })
        .collect();

    if candidates.is_empty() {
        debug!(
            event = "core.correlation.no_candidates",
            display_name = display_name,
            frame_class = frame_class
        );
        return None;
    }

    let needle = display_name.to_lowercase();
    if let Some(title_match) = candidates
        .iter()
        .find(|w| w.title.to_lowercase().contains(&needle))
    {
        debug!(
            event = "core.correlation.title_match",
            display_name = display_name,
            handle = title_match.handle.as_u32()
        );
        return Some((*title_match).clone());
    }

    // Best-effort fallback: earliest surviving candidate by first-seen
    // order. May be wrong when several launches land in the same window.
    candidates.sort_by_key(|w| w.first_seen);
    let fallback = candidates[0].clone();
    debug!(
        event = "core.correlation.fallback_earliest",
        display_name = display_name,
        handle = fallback.handle.as_u32()
    );
    Some(fallback)
}

/// Short-TTL cache of correlation results.
///
/// Avoids repeated full window enumeration when lookups for the same
/// instance arrive close together. Entries expire after the TTL and the
/// whole cache is invalidated whenever the observed window set changes.
pub struct CorrelationCache {
    ttl: Duration,
    entries: HashMap<String, (WindowHandle, Instant)>,
}

impl CorrelationCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<WindowHandle> {
        let (handle, stored_at) = self.entries.get(key)?;
        if stored_at.elapsed() > self.ttl {
            return None;
        }
        Some(*handle)
    }

    pub fn insert(&mut self, key: String, handle: WindowHandle) {
        self.entries.insert(key, (handle, Instant::now()));
    }

    /// Drop every entry. Called when the window set changes.
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    const FRAME_CLASS: &str = "ApplicationFrameWindow";

    fn window(handle: u32, title: &str, class: &str, offset_secs: i64, launch: DateTime<Utc>) -> WindowInfo {
        WindowInfo {
            handle: WindowHandle::from_raw(handle),
            title: title.to_string(),
            owner_pid: None,
            class: class.to_string(),
            first_seen: launch + TimeDelta::seconds(offset_secs),
        }
    }

    #[test]
    fn test_title_match_preferred_within_window() {
        let launch = Utc::now();
        // Offsets -40s, -10s, +5s, +45s; only the +5s title matches.
        let windows = vec![
            window(1, "Something else", FRAME_CLASS, -40, launch),
            window(2, "Unrelated", FRAME_CLASS, -10, launch),
            window(3, "Corp Expenses - Home", FRAME_CLASS, 5, launch),
            window(4, "Corp Expenses", FRAME_CLASS, 45, launch),
        ];
        let result = correlate(&windows, FRAME_CLASS, "corp expenses", launch, 30);
        assert_eq!(result.unwrap().handle.as_u32(), 3);
    }

    #[test]
    fn test_fallback_to_earliest_survivor() {
        let launch = Utc::now();
        let windows = vec![
            window(1, "Alpha", FRAME_CLASS, 20, launch),
            window(2, "Beta", FRAME_CLASS, -15, launch),
            window(3, "Gamma", FRAME_CLASS, 5, launch),
        ];
        // No title contains the display name; earliest survivor wins.
        let result = correlate(&windows, FRAME_CLASS, "Expenses", launch, 30);
        assert_eq!(result.unwrap().handle.as_u32(), 2);
    }

    #[test]
    fn test_no_candidate_within_time_window() {
        let launch = Utc::now();
        let windows = vec![
            window(1, "Expenses", FRAME_CLASS, -40, launch),
            window(2, "Expenses", FRAME_CLASS, 45, launch),
        ];
        assert!(correlate(&windows, FRAME_CLASS, "Expenses", launch, 30).is_none());
    }

    #[test]
    fn test_other_classes_are_ignored() {
        let launch = Utc::now();
        let windows = vec![
            window(1, "Expenses", "BrowserFrame", 2, launch),
            window(2, "Expenses", "TerminalWindow", 3, launch),
        ];
        assert!(correlate(&windows, FRAME_CLASS, "Expenses", launch, 30).is_none());
    }

    #[test]
    fn test_title_match_is_case_insensitive() {
        let launch = Utc::now();
        let windows = vec![window(1, "CORP EXPENSES", FRAME_CLASS, 1, launch)];
        let result = correlate(&windows, FRAME_CLASS, "corp expenses", launch, 30);
        assert_eq!(result.unwrap().handle.as_u32(), 1);
    }

    #[test]
    fn test_boundary_offset_is_inclusive() {
        let launch = Utc::now();
        let windows = vec![window(1, "Expenses", FRAME_CLASS, 30, launch)];
        let result = correlate(&windows, FRAME_CLASS, "Expenses", launch, 30);
        assert!(result.is_some());
    }

    #[test]
    fn test_cache_hit_and_ttl_expiry() {
        let mut cache = CorrelationCache::new(Duration::from_millis(50));
        cache.insert("inst-1".to_string(), WindowHandle::from_raw(9));
        assert_eq!(cache.get("inst-1"), Some(WindowHandle::from_raw(9)));

        std::thread::sleep(Duration::from_millis(80));
        assert_eq!(cache.get("inst-1"), None);
    }

    #[test]
    fn test_cache_invalidate_all() {
        let mut cache = CorrelationCache::new(Duration::from_secs(60));
        cache.insert("inst-1".to_string(), WindowHandle::from_raw(9));
        cache.invalidate_all();
        assert_eq!(cache.get("inst-1"), None);
    }
}
