//! File-based sample source.
//!
//! Polls a file that a device bridge keeps overwriting with its latest
//! payload.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::{Inbound, SampleSource};

/// A source that re-reads a payload file whenever it changes.
///
/// The source tracks the file's modification time and only emits a new
/// `Message` when it advances. The first successful read also reports the
/// source as connected; a read failure reports it errored once until the
/// file becomes readable again.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
    connected: bool,
    pending: VecDeque<Inbound>,
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
            connected: false,
            pending: VecDeque::new(),
        }
    }

    /// Returns the path being monitored.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn get_modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    fn check_file(&mut self) {
        let current_modified = self.get_modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,        // First poll, always read
            (Some(_), None) => false, // File disappeared, keep last state
            (Some(last), Some(current)) => current > last,
        };
        if !file_changed {
            return;
        }

        match fs::read(&self.path) {
            Ok(bytes) => {
                self.last_modified = current_modified;
                if !self.connected {
                    self.connected = true;
                    self.last_error = None;
                    self.pending.push_back(Inbound::Connected);
                }
                self.pending
                    .push_back(Inbound::message(self.path.display().to_string(), bytes));
            }
            Err(e) => {
                let reason = format!("Read error: {}", e);
                if self.last_error.as_deref() != Some(reason.as_str()) {
                    self.connected = false;
                    self.pending.push_back(Inbound::Errored(reason.clone()));
                }
                self.last_error = Some(reason);
            }
        }
    }
}

impl SampleSource for FileSource {
    fn poll(&mut self) -> Option<Inbound> {
        if self.pending.is_empty() {
            self.check_file();
        }
        self.pending.pop_front()
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
