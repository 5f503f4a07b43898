//! Instance file persistence
//!
//! One JSON file per instance under the store directory, written
//! atomically (temp file + rename) so a crash never leaves a partial
//! record. Unreadable files are skipped on load, not fatal.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::instances::errors::InstanceError;
use crate::instances::types::ApplicationInstance;

/// Default store directory, `~/.appdock/instances`.
pub fn default_instances_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".appdock").join("instances"))
}

pub fn ensure_instances_directory(dir: &Path) -> Result<(), InstanceError> {
    fs::create_dir_all(dir)?;
    Ok(())
}

fn instance_file(dir: &Path, instance_id: &str) -> PathBuf {
    dir.join(format!("{}.json", instance_id))
}

fn cleanup_temp_file(temp_file: &Path, original_error: &std::io::Error) {
    if let Err(cleanup_err) = fs::remove_file(temp_file) {
        warn!(
            event = "core.instance.temp_file_cleanup_failed",
            temp_file = %temp_file.display(),
            original_error = %original_error,
            cleanup_error = %cleanup_err
        );
    }
}

pub fn save_instance_to_file(
    instance: &ApplicationInstance,
    dir: &Path,
) -> Result<(), InstanceError> {
    let final_file = instance_file(dir, &instance.id);
    let json = serde_json::to_string_pretty(instance).map_err(|e| InstanceError::IoError {
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;

    let temp_file = final_file.with_extension("json.tmp");
    if let Err(e) = fs::write(&temp_file, &json) {
        cleanup_temp_file(&temp_file, &e);
        return Err(e.into());
    }
    if let Err(e) = fs::rename(&temp_file, &final_file) {
        cleanup_temp_file(&temp_file, &e);
        return Err(e.into());
    }
    Ok(())
}

/// Load every instance record in the directory. Returns the parsed
/// instances and the number of files skipped as unreadable or invalid.
pub fn load_instances_from_files(
    dir: &Path,
) -> Result<(Vec<ApplicationInstance>, usize), InstanceError> {
    let mut instances = Vec::new();
    let mut skipped = 0;

    if !dir.exists() {
        return Ok((instances, skipped));
    }

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                skipped += 1;
                warn!(
                    event = "core.instance.load_read_error",
                    file = %path.display(),
                    error = %e
                );
                continue;
            }
        };

        match serde_json::from_str::<ApplicationInstance>(&content) {
            Ok(instance) => instances.push(instance),
            Err(e) => {
                skipped += 1;
                warn!(
                    event = "core.instance.load_invalid_json",
                    file = %path.display(),
                    error = %e
                );
            }
        }
    }

    Ok((instances, skipped))
}

pub fn remove_instance_file(dir: &Path, instance_id: &str) -> Result<(), InstanceError> {
    let file = instance_file(dir, instance_id);
    if file.exists() {
        fs::remove_file(&file)?;
    }
    Ok(())
}
