//! Workload adapter.
//!
//! `Workload` is the set of operations the charm performs on the machine or
//! container Vault runs in: file I/O, service control and a reachability
//! probe. `LocalWorkload` implements it for a directory tree on this host with
//! services managed by snapd.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum WorkloadError {
    /// The path does not exist or cannot be used for the requested operation.
    #[error("Invalid path {path}: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Command `{command}` failed: {message}")]
    Command { command: String, message: String },
}

/// Operations the charm performs on its workload.
pub trait Workload {
    fn exists(&self, path: &str) -> bool;

    /// Reads a file from the workload.
    fn pull(&self, path: &str) -> Result<String, WorkloadError>;

    /// Writes a file to the workload, creating parent directories.
    fn push(&self, path: &str, source: &str) -> Result<(), WorkloadError>;

    fn make_dir(&self, path: &str) -> Result<(), WorkloadError>;

    /// Removes a file or directory. A missing path is an `InvalidPath` error.
    fn remove_path(&self, path: &str, recursive: bool) -> Result<(), WorkloadError>;

    /// Sends `signal` (by number) to the processes named `process`.
    fn send_signal(&self, signal: i32, process: &str) -> Result<(), WorkloadError>;

    fn restart(&self, process: &str) -> Result<(), WorkloadError>;

    fn stop(&self, process: &str) -> Result<(), WorkloadError>;

    /// Whether the workload can be reached at all.
    fn is_accessible(&self) -> bool;
}

/// A workload living on this host under `root`, with snap-managed services.
#[derive(Debug, Clone)]
pub struct LocalWorkload {
    root: PathBuf,
    snap_name: String,
}

impl LocalWorkload {
    pub fn new(root: impl Into<PathBuf>, snap_name: &str) -> Self {
        Self {
            root: root.into(),
            snap_name: snap_name.to_string(),
        }
    }

    /// Maps a workload path onto the host, rejecting paths that escape the root.
    fn resolve(&self, path: &str) -> Result<PathBuf, WorkloadError> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(WorkloadError::InvalidPath {
                path: path.to_string(),
                reason: "path escapes the workload root".to_string(),
            });
        }
        Ok(self.root.join(relative))
    }

    fn io_error(path: &str, source: io::Error) -> WorkloadError {
        if source.kind() == io::ErrorKind::NotFound {
            WorkloadError::InvalidPath {
                path: path.to_string(),
                reason: source.to_string(),
            }
        } else {
            WorkloadError::Io {
                path: path.to_string(),
                source,
            }
        }
    }

    fn service(&self, process: &str) -> String {
        format!("{}.{}", self.snap_name, process)
    }

    fn run(program: &str, args: &[&str]) -> Result<(), WorkloadError> {
        let command = format!("{} {}", program, args.join(" "));
        debug!("Running {}", command);
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| WorkloadError::Command {
                command: command.clone(),
                message: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(WorkloadError::Command {
                command,
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

impl Workload for LocalWorkload {
    fn exists(&self, path: &str) -> bool {
        self.resolve(path).map(|p| p.exists()).unwrap_or(false)
    }

    fn pull(&self, path: &str) -> Result<String, WorkloadError> {
        let host_path = self.resolve(path)?;
        fs::read_to_string(host_path).map_err(|e| Self::io_error(path, e))
    }

    fn push(&self, path: &str, source: &str) -> Result<(), WorkloadError> {
        let host_path = self.resolve(path)?;
        if let Some(parent) = host_path.parent() {
            fs::create_dir_all(parent).map_err(|e| Self::io_error(path, e))?;
        }
        fs::write(&host_path, source).map_err(|e| Self::io_error(path, e))
    }

    fn make_dir(&self, path: &str) -> Result<(), WorkloadError> {
        let host_path = self.resolve(path)?;
        fs::create_dir_all(host_path).map_err(|e| Self::io_error(path, e))
    }

    fn remove_path(&self, path: &str, recursive: bool) -> Result<(), WorkloadError> {
        let host_path = self.resolve(path)?;
        let metadata = fs::metadata(&host_path).map_err(|e| Self::io_error(path, e))?;
        let result = if metadata.is_dir() {
            if recursive {
                fs::remove_dir_all(&host_path)
            } else {
                fs::remove_dir(&host_path)
            }
        } else {
            fs::remove_file(&host_path)
        };
        result.map_err(|e| Self::io_error(path, e))
    }

    fn send_signal(&self, signal: i32, process: &str) -> Result<(), WorkloadError> {
        let flag = format!("--signal={}", signal);
        Self::run("pkill", &[&flag, "--exact", process])?;
        info!("Sent signal {} to {}", signal, process);
        Ok(())
    }

    fn restart(&self, process: &str) -> Result<(), WorkloadError> {
        Self::run("snap", &["restart", &self.service(process)])?;
        info!("Restarted {}", process);
        Ok(())
    }

    fn stop(&self, process: &str) -> Result<(), WorkloadError> {
        Self::run("snap", &["stop", &self.service(process)])?;
        info!("Stopped {}", process);
        Ok(())
    }

    fn is_accessible(&self) -> bool {
        self.root.is_dir()
    }
}
