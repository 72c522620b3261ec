//! File-based heartbeat source.
//!
//! Polls a JSON document that the observed process rewrites on every
//! heartbeat.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::{HeartbeatSource, RawHeartbeat};

/// A heartbeat source that reads records from a JSON file.
///
/// The source tracks the file's modification time and only returns a
/// record when the file has been updated since the last successful read.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
        }
    }

    /// Returns the path being watched.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn get_modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    fn read_file(&mut self) -> Option<RawHeartbeat> {
        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(record) => {
                    self.last_error = None;
                    Some(record)
                }
                Err(e) => {
                    self.last_error = Some(format!("Parse error: {}", e));
                    None
                }
            },
            Err(e) => {
                self.last_error = Some(format!("Read error: {}", e));
                None
            }
        }
    }
}

impl HeartbeatSource for FileSource {
    fn poll(&mut self) -> Option<RawHeartbeat> {
        let current_modified = self.get_modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,        // Nothing read yet, always try
            (Some(_), None) => false, // File disappeared, keep the last record
            (Some(last), Some(current)) => current > last,
        };

        if file_changed {
            if let Some(record) = self.read_file() {
                self.last_modified = current_modified;
                return Some(record);
            }
        }

        None
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.clone()
    }
}
