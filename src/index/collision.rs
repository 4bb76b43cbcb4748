//! Collision Resolver
//!
//! Picks an on-disk name for an upload that does not clash with an existing
//! physical object: `report.txt`, then `report (1).txt`, `report (2).txt`, ...
//!
//! The check and the later write are not atomic. Two concurrent uploads of
//! the same name can both settle on the same candidate; the storage bridge
//! creates files exclusively, so the later write fails and that upload is
//! rejected with `PathAlreadyExists`.

use super::resolver::join_path;
use crate::storage::StorageBridge;
use tracing::debug;

/// Split `name` into stem and extension, keeping the dot on the extension.
///
/// Leading dots belong to the stem, so `.bashrc` has no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    let leading = name.len() - name.trim_start_matches('.').len();
    match name[leading..].rfind('.') {
        Some(pos) => name.split_at(leading + pos),
        None => (name, ""),
    }
}

/// First of `desired_name`, `"{stem} (1){ext}"`, `"{stem} (2){ext}"`, ...
/// that does not exist inside `directory_path`.
pub fn resolve_name(storage: &dyn StorageBridge, directory_path: &str, desired_name: &str) -> String {
    if !storage.exists(&join_path(directory_path, desired_name)) {
        return desired_name.to_string();
    }

    let (stem, ext) = split_extension(desired_name);
    let mut index: u64 = 1;
    loop {
        let candidate = format!("{} ({}){}", stem, index, ext);
        if !storage.exists(&join_path(directory_path, &candidate)) {
            debug!(
                directory = directory_path,
                desired = desired_name,
                chosen = %candidate,
                "Resolved name collision"
            );
            return candidate;
        }
        index += 1;
    }
}
