/*
 *  pidfile.rs
 *
 *  stratux-screen - receiver status at a glance
 *  (c) 2026 Stratux Screen contributors
 *
 *  Single instance guard: a PID file that goes away with the process
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use log::{debug, error, warn};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const RETRY_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, thiserror::Error)]
pub enum PidFileError {
    #[error("Another instance is already running (pid {pid}, {path})")]
    AlreadyRunning { pid: i32, path: PathBuf },
    #[error("PID file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Held for the life of the daemon; the file is removed on drop
#[derive(Debug)]
pub struct PidFile {
    path: PathBuf,
    pid: i32,
}

/// True if a process with this pid exists, even one we may not signal
fn process_alive(pid: i32) -> bool {
    if pid <= 0 {
        return false;
    }
    // signal 0 only checks existence and permission
    let rc = unsafe { libc::kill(pid as libc::pid_t, 0) };
    rc == 0 || io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
}

fn read_pid(path: &Path) -> Option<i32> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

impl PidFile {
    /// Create `path` holding our pid.
    ///
    /// A file naming a live process is waited on for up to `timeout`. A file
    /// naming a dead process, or holding garbage, is replaced.
    pub async fn acquire(path: &Path, timeout: Duration) -> Result<Self, PidFileError> {
        let pid = std::process::id() as i32;
        let io_err = |source| PidFileError::Io { path: path.to_path_buf(), source };
        let deadline = Instant::now() + timeout;

        loop {
            match OpenOptions::new().write(true).create_new(true).open(path) {
                Ok(mut file) => {
                    writeln!(file, "{}", pid).map_err(io_err)?;
                    debug!("PID file {} holds {}", path.display(), pid);
                    return Ok(Self { path: path.to_path_buf(), pid });
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    match read_pid(path) {
                        Some(other) if other != pid && process_alive(other) => {
                            if Instant::now() >= deadline {
                                return Err(PidFileError::AlreadyRunning {
                                    pid: other,
                                    path: path.to_path_buf(),
                                });
                            }
                            tokio::time::sleep(RETRY_INTERVAL).await;
                        }
                        stale => {
                            warn!("Replacing stale PID file {} ({:?})", path.display(), stale);
                            match fs::remove_file(path) {
                                Ok(()) => {}
                                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                                Err(e) => return Err(io_err(e)),
                            }
                        }
                    }
                }
                Err(e) => return Err(io_err(e)),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn pid(&self) -> i32 {
        self.pid
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        // leave it alone if someone else has taken it over
        if read_pid(&self.path) != Some(self.pid) {
            return;
        }
        if let Err(e) = fs::remove_file(&self.path) {
            error!("Failed to remove PID file {}: {}", self.path.display(), e);
        }
    }
}
