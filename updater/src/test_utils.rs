//! Shared test utilities for the updater crate.

use crate::config::UpdateConfig;
use camino::Utf8PathBuf;
use std::process::ExitStatus;
use tempfile::TempDir;

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// A temporary project root with a `gradle/` directory.
pub struct TempProject {
    _dir: TempDir,
    /// Configuration pointing at the temporary root.
    pub config: UpdateConfig,
}

impl TempProject {
    /// Creates an empty project root.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_owned())
            .expect("temp dir should be UTF-8");
        std::fs::create_dir_all(root.join("gradle")).expect("failed to create gradle dir");
        let config = UpdateConfig::for_root(&root);
        Self { _dir: dir, config }
    }

    /// Writes `contents` to the configured descriptor path.
    pub fn write_descriptor(&self, contents: &str) {
        std::fs::write(&self.config.metadata_path, contents).expect("failed to write descriptor");
    }

    /// Returns true if the descriptor exists.
    pub fn descriptor_exists(&self) -> bool {
        self.config.metadata_path.exists()
    }
}
