//! CLI Tooling
//!
//! One subcommand per index operation, scoped to a workspace whose
//! configuration decides where the physical root and the node store live.

use crate::bootstrap;
use crate::config::{ConfigLoader, IndexConfig};
use crate::error::{ApiError, StorageError};
use crate::index::{Entry, FsIndex};
use crate::integrity::IntegrityReport;
use crate::logging::LoggingConfig;
use crate::storage::LocalStorage;
use crate::store::{Node, SledNodeStore};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// fsindex - path-indexed file tree
#[derive(Parser)]
#[command(name = "fsindex")]
#[command(about = "Path-indexed metadata store kept consistent with a physical file tree")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply logging flags on top of the configured logging section.
    pub fn logging_config(&self, mut config: LoggingConfig) -> LoggingConfig {
        if self.verbose {
            config.level = "debug".to_string();
            config.output = "stderr".to_string();
        }
        if let Some(level) = &self.log_level {
            config.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.file = Some(file.clone());
        }
        config
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Provision the root directory and seed the root record
    Init,
    /// List a directory
    Ls {
        /// Directory path inside the index
        #[arg(default_value = "/")]
        path: String,
        /// Omit the ".." entry
        #[arg(long)]
        no_parent: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print a file's content
    Cat {
        path: String,
        /// Write raw bytes to this file instead of printing
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Create a directory
    Mkdir {
        /// Existing parent directory
        parent: String,
        /// Name of the new directory
        name: String,
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Upload a local file into a directory
    Put {
        /// Target directory inside the index
        dir: String,
        /// Local file to upload
        source: PathBuf,
        /// Desired name (defaults to the source file name)
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show the node record behind a path
    Stat {
        path: String,
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Compare the index with physical storage
    Check {
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the effective configuration
    Config,
}

/// CLI context for one workspace
pub struct CliContext {
    index: FsIndex,
    config: IndexConfig,
    workspace_root: PathBuf,
    root_dir: PathBuf,
    store_path: PathBuf,
}

impl CliContext {
    /// Load configuration, open storage and build the index.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = Self::load_config(&workspace_root, config_path.as_deref())?;
        Self::with_config(workspace_root, config)
    }

    /// Configuration for `workspace_root`, or from `config_path` when given.
    pub fn load_config(
        workspace_root: &Path,
        config_path: Option<&Path>,
    ) -> Result<IndexConfig, ApiError> {
        let config = match config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(workspace_root)?,
        };
        Ok(config)
    }

    /// Open storage for an already loaded configuration.
    pub fn with_config(workspace_root: PathBuf, config: IndexConfig) -> Result<Self, ApiError> {
        let (root_dir, store_path) = config.storage.resolve_paths(&workspace_root)?;

        bootstrap::provision_root_dir(&root_dir)?;
        std::fs::create_dir_all(&store_path).map_err(StorageError::IoError)?;
        let store = Arc::new(SledNodeStore::open(&store_path)?);
        let storage = Arc::new(LocalStorage::new(root_dir.clone()));

        Ok(Self {
            index: FsIndex::new(store, storage),
            config,
            workspace_root,
            root_dir,
            store_path,
        })
    }

    pub fn index(&self) -> &FsIndex {
        &self.index
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Init => {
                bootstrap::provision_root_dir(&self.root_dir)?;
                let root = bootstrap::ensure_root(self.index.store())?;
                info!(workspace = %self.workspace_root.display(), "Initialized index");
                Ok(format!(
                    "Initialized index\n  root dir: {}\n  store:    {}\n  root ref: {}",
                    self.root_dir.display(),
                    self.store_path.display(),
                    root.ref_id
                ))
            }
            Commands::Ls {
                path,
                no_parent,
                format,
            } => {
                let entries = self.index.list(path, !no_parent)?;
                if format == "json" {
                    to_json(&entries)
                } else {
                    Ok(format_entries_table(&entries))
                }
            }
            Commands::Cat { path, output } => {
                let bytes = self.index.read_file(path)?;
                match output {
                    Some(target) => {
                        std::fs::write(target, &bytes).map_err(|e| {
                            ApiError::storage_io(target.display().to_string(), e)
                        })?;
                        Ok(format!("Wrote {} bytes to {}", bytes.len(), target.display()))
                    }
                    None => Ok(String::from_utf8_lossy(&bytes).into_owned()),
                }
            }
            Commands::Mkdir {
                parent,
                name,
                format,
            } => {
                let entry = self.index.create_directory(parent, name)?;
                format_entry(&entry, format)
            }
            Commands::Put {
                dir,
                source,
                name,
                format,
            } => {
                let desired = match name {
                    Some(name) => name.clone(),
                    None => source
                        .file_name()
                        .and_then(|n| n.to_str())
                        .map(str::to_string)
                        .ok_or_else(|| ApiError::InvalidName(source.display().to_string()))?,
                };
                let content = std::fs::read(source)
                    .map_err(|e| ApiError::storage_io(source.display().to_string(), e))?;
                let entry = self.index.create_file(dir, &desired, &content)?;
                format_entry(&entry, format)
            }
            Commands::Stat { path, format } => {
                let node = self.index.stat(path)?;
                if format == "json" {
                    to_json(&node)
                } else {
                    Ok(format_node_text(&node))
                }
            }
            Commands::Check { format } => {
                let report = self.index.audit()?;
                let rendered = if format == "json" {
                    to_json(&report)?
                } else {
                    format_report_text(&report)
                };
                if report.is_consistent() {
                    Ok(rendered)
                } else {
                    Err(ApiError::IntegrityFault(rendered))
                }
            }
            Commands::Config => toml::to_string_pretty(&self.config).map_err(|e| {
                ApiError::ConfigError(format!("Failed to serialize configuration: {}", e))
            }),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::StorageError(StorageError::Serialization(e.to_string())))
}

fn format_entry(entry: &Entry, format: &str) -> Result<String, ApiError> {
    if format == "json" {
        to_json(entry)
    } else {
        Ok(format!("Created {} {}", entry.kind, entry.path))
    }
}

fn format_entries_table(entries: &[Entry]) -> String {
    use comfy_table::Table;
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Name", "Type", "Path"]);
    for entry in entries {
        table.add_row(vec![
            entry.name.clone(),
            entry.kind.to_string(),
            entry.path.clone(),
        ]);
    }
    table.to_string()
}

fn format_node_text(node: &Node) -> String {
    let parent = node
        .parent_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "Path:   {}\nName:   {}\nType:   {}\nId:     {}\nRef:    {}\nParent: {}",
        node.full_path, node.name, node.kind, node.id, node.ref_id, parent
    )
}

fn format_report_text(report: &IntegrityReport) -> String {
    let mut output = format!(
        "Checked {} nodes against {} physical objects\n",
        report.nodes_checked, report.objects_checked
    );
    if report.is_consistent() {
        output.push_str("No integrity issues found.");
        return output;
    }
    output.push_str(&format!("{} issue(s):\n", report.issues.len()));
    for issue in &report.issues {
        output.push_str(&format!("  {:?}: {}\n", issue.problem, issue.path));
    }
    output
}
