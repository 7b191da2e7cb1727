// File-system log store

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use suno_core::port::{FileWriteMode, LogFileStore};
use tracing::debug;

/// Log files under a single directory, created on first write
#[derive(Debug, Clone)]
pub struct FsLogFileStore {
    dir: PathBuf,
}

impl FsLogFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }
}

impl LogFileStore for FsLogFileStore {
    fn write_line(&self, file_name: &str, line: &str, mode: FileWriteMode) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;

        let mut options = OpenOptions::new();
        options.create(true);
        match mode {
            FileWriteMode::Overwrite => options.write(true).truncate(true),
            FileWriteMode::Append => options.append(true),
        };

        let mut file = options.open(self.path_of(file_name))?;
        writeln!(file, "{}", line)?;
        file.flush()
    }

    fn remove(&self, file_name: &str) -> io::Result<()> {
        match fs::remove_file(self.path_of(file_name)) {
            Ok(()) => {
                debug!(file = %file_name, "Removed log file");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
