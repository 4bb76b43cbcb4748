//! Integrity audit
//!
//! Walks the physical tree and the node table and reports every path on which
//! they disagree. The audit only reports; repairing is left to an operator.

use crate::error::ApiError;
use crate::index::ROOT_PATH;
use crate::storage::StorageBridge;
use crate::store::{NodeKind, NodeStore};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Component, Path};
use tracing::{error, info};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Problem {
    /// Indexed, but no physical object exists
    MissingOnDisk,
    /// Physical object with no node
    MissingFromIndex,
    /// Both exist but one is a file and the other a directory
    KindMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityIssue {
    pub path: String,
    pub problem: Problem,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub nodes_checked: usize,
    pub objects_checked: usize,
    pub issues: Vec<IntegrityIssue>,
}

impl IntegrityReport {
    pub fn is_consistent(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Index path for a physical path below `root`, if every component is plain UTF-8.
fn index_path(root: &Path, physical: &Path) -> Option<String> {
    let relative = physical.strip_prefix(root).ok()?;
    let mut path = String::new();
    for component in relative.components() {
        match component {
            Component::Normal(name) => {
                path.push('/');
                path.push_str(name.to_str()?);
            }
            _ => return None,
        }
    }
    if path.is_empty() {
        path.push_str(ROOT_PATH);
    }
    Some(path)
}

pub fn audit(store: &dyn NodeStore, storage: &dyn StorageBridge) -> Result<IntegrityReport, ApiError> {
    let root = storage.root();
    let mut physical: HashMap<String, NodeKind> = HashMap::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| root.display().to_string());
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "walk failed"));
            ApiError::storage_io(path, source)
        })?;
        let Some(path) = index_path(root, entry.path()) else {
            tracing::warn!("Skipping non UTF-8 path during audit: {:?}", entry.path());
            continue;
        };
        let kind = if entry.file_type().is_dir() {
            NodeKind::Directory
        } else {
            NodeKind::File
        };
        physical.insert(path, kind);
    }

    let nodes = store.all()?;
    let mut report = IntegrityReport {
        nodes_checked: nodes.len(),
        objects_checked: physical.len(),
        issues: Vec::new(),
    };

    for node in &nodes {
        match physical.remove(&node.full_path) {
            None => report.issues.push(IntegrityIssue {
                path: node.full_path.clone(),
                problem: Problem::MissingOnDisk,
            }),
            Some(kind) if kind != node.kind => report.issues.push(IntegrityIssue {
                path: node.full_path.clone(),
                problem: Problem::KindMismatch,
            }),
            Some(_) => {}
        }
    }
    report
        .issues
        .extend(physical.into_keys().map(|path| IntegrityIssue {
            path,
            problem: Problem::MissingFromIndex,
        }));
    report.issues.sort_by(|a, b| a.path.cmp(&b.path));

    if report.is_consistent() {
        info!(
            nodes = report.nodes_checked,
            objects = report.objects_checked,
            "Integrity audit passed"
        );
    } else {
        for issue in &report.issues {
            error!(target: "fsindex::integrity", path = %issue.path, problem = ?issue.problem, "Integrity issue");
        }
    }
    Ok(report)
}
