// Author: Dustin Pilgrim
// License: MIT

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

/// When the log file is moved aside, and how many old copies survive.
#[derive(Debug, Clone, Copy)]
pub struct Rotation {
    pub max_bytes: u64,
    pub backups: u32,
}

impl Default for Rotation {
    fn default() -> Self {
        Self {
            max_bytes: 2 * 1024 * 1024,
            backups: 3,
        }
    }
}

/// The log file for one run of the program. Opening it rotates an
/// oversized file and stamps a header line for this run.
#[derive(Debug, Clone)]
pub struct SessionLog {
    path: PathBuf,
}

impl SessionLog {
    pub fn open(path: &Path, rotation: Rotation) -> io::Result<Self> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let size = match fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => return Err(e),
        };

        let rotated = size > 0 && size >= rotation.max_bytes;
        if rotated {
            shift_backups(path, rotation.backups)?;
        }

        let log = Self { path: path.to_path_buf() };

        // Earlier runs in the same file get a blank line between them.
        if size > 0 && !rotated {
            log.append("")?;
        }
        log.append(&format!(
            "---- lapse {} started {} (pid {}) ----",
            env!("CARGO_PKG_VERSION"),
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            std::process::id()
        ))?;

        Ok(log)
    }

    pub fn append(&self, line: &str) -> io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{line}")
    }
}

/// `lapse.log` -> `lapse.log.1` -> ... -> `lapse.log.N`; the oldest is lost.
fn shift_backups(path: &Path, backups: u32) -> io::Result<()> {
    if backups == 0 {
        return fs::remove_file(path);
    }

    let _ = fs::remove_file(backup_path(path, backups));
    for n in (1..backups).rev() {
        let from = backup_path(path, n);
        if from.exists() {
            fs::rename(&from, backup_path(path, n + 1))?;
        }
    }

    fs::rename(path, backup_path(path, 1))
}

fn backup_path(path: &Path, n: u32) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".{n}"));
    PathBuf::from(name)
}
