use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::BuildError;

/// The generated C translation unit on disk.
///
/// Each unit gets a unique `pogc_*.c` name, and the file is deleted when the
/// value is dropped unless [`GeneratedUnit::keep`] is called.
#[derive(Debug)]
pub struct GeneratedUnit {
    file: NamedTempFile,
}

impl GeneratedUnit {
    pub fn create(dir: &Path, source: &str) -> Result<Self, BuildError> {
        let io_err = |e| BuildError::Io {
            path: dir.to_path_buf(),
            source: e,
        };

        let mut file = tempfile::Builder::new()
            .prefix("pogc_")
            .suffix(".c")
            .tempfile_in(dir)
            .map_err(io_err)?;
        file.write_all(source.as_bytes()).map_err(io_err)?;
        file.flush().map_err(io_err)?;

        log::debug!("wrote generated unit {}", file.path().display());
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Persist the file and return its path.
    pub fn keep(self) -> Result<PathBuf, BuildError> {
        let (_, path) = self.file.keep().map_err(|e| BuildError::Io {
            path: e.file.path().to_path_buf(),
            source: e.error,
        })?;
        Ok(path)
    }
}
