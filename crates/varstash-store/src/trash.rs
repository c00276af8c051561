//! Recoverable deletion.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

/// Removes a file such that it can be brought back.
pub trait SoftDelete: Send + Sync {
    /// Move `path` out of the way. Returns where it went.
    fn soft_delete(&self, path: &Path) -> io::Result<PathBuf>;
}

/// Moves deleted files into a trash directory, each under a
/// `<unix-ms>-<file name>` name so repeated deletions of the same blob are
/// all kept.
#[derive(Clone, Debug)]
pub struct TrashDir {
    dir: PathBuf,
}

impl TrashDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Trashed copies of `file_name`, oldest first.
    pub fn versions(&self, file_name: &str) -> io::Result<Vec<(u128, PathBuf)>> {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(rd) => rd,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut found = Vec::new();
        for entry in read_dir {
            let entry = entry?;
            let trashed = entry.file_name();
            let Some(trashed) = trashed.to_str() else {
                continue;
            };
            if let Some((stamp, original)) = trashed.split_once('-') {
                if original == file_name {
                    if let Ok(stamp) = stamp.parse::<u128>() {
                        found.push((stamp, entry.path()));
                    }
                }
            }
        }
        found.sort();
        Ok(found)
    }

    /// Move the newest trashed copy of `file_name` back to `dest`.
    ///
    /// Returns `Ok(false)` if nothing matching is in the trash.
    pub fn restore(&self, file_name: &str, dest: &Path) -> io::Result<bool> {
        match self.versions(file_name)?.pop() {
            Some((_, path)) => {
                fs::rename(&path, dest)?;
                debug!(from = ?path, to = ?dest, "restored from trash");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

impl SoftDelete for TrashDir {
    fn soft_delete(&self, path: &Path) -> io::Result<PathBuf> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;

        fs::create_dir_all(&self.dir)?;

        let mut stamp = unix_millis();
        let mut dest = self.dir.join(format!("{stamp}-{file_name}"));
        while dest.exists() {
            stamp += 1;
            dest = self.dir.join(format!("{stamp}-{file_name}"));
        }

        fs::rename(path, &dest)?;
        debug!(from = ?path, to = ?dest, "moved to trash");
        Ok(dest)
    }
}
