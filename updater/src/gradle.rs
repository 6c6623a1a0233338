//! Descriptor regeneration through the Gradle wrapper.
//!
//! Gradle is run against a throwaway `GRADLE_USER_HOME` so that dependency
//! resolution starts from an empty cache: with a warm cache Gradle can skip
//! verification entries for artifacts it has already downloaded.

use crate::config::{GRADLE_USER_HOME, UpdateConfig};
use crate::error::{Result, UpdaterError};
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info, warn};
use std::io::ErrorKind;
use std::process::{Command, ExitStatus};

/// A fully resolved Gradle wrapper invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradleInvocation {
    /// Wrapper executable.
    pub program: Utf8PathBuf,
    /// Command-line arguments.
    pub args: Vec<String>,
    /// Working directory for the process.
    pub working_dir: Utf8PathBuf,
    /// Value for `GRADLE_USER_HOME`; the only environment override.
    pub user_home: Utf8PathBuf,
}

impl GradleInvocation {
    /// Build the invocation for `config` with the given Gradle home.
    #[must_use]
    pub fn new(config: &UpdateConfig, user_home: &Utf8Path) -> Self {
        Self {
            program: config.gradle_program.clone(),
            args: config.gradle_args.clone(),
            working_dir: config.root_dir.clone(),
            user_home: user_home.to_owned(),
        }
    }

    /// Render the program and arguments as a single display line.
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut line = self.program.to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Abstraction for running the Gradle wrapper.
#[cfg_attr(test, mockall::automock)]
pub trait GradleExecutor {
    /// Run `invocation` to completion and return its exit status.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be started.
    fn execute(&self, invocation: &GradleInvocation) -> Result<ExitStatus>;
}

/// Runs Gradle as a child process sharing this process's stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemGradleExecutor;

impl GradleExecutor for SystemGradleExecutor {
    fn execute(&self, invocation: &GradleInvocation) -> Result<ExitStatus> {
        Command::new(invocation.program.as_std_path())
            .args(&invocation.args)
            .env(GRADLE_USER_HOME, invocation.user_home.as_std_path())
            .current_dir(invocation.working_dir.as_std_path())
            .status()
            .map_err(|source| UpdaterError::GradleSpawn {
                program: invocation.program.clone(),
                source,
            })
    }
}

/// Delete the descriptor at `path`.
///
/// Returns `true` if a file was removed and `false` if none existed.
///
/// # Errors
///
/// Returns an error for any failure other than the file being absent.
pub fn remove_existing(path: &Utf8Path) -> Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!("removed previous descriptor {path}");
            Ok(true)
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("no previous descriptor at {path}");
            Ok(false)
        }
        Err(source) => Err(UpdaterError::RemoveDescriptor {
            path: path.to_owned(),
            source,
        }),
    }
}

/// Delete and regenerate the descriptor configured in `config`.
///
/// Gradle is not retried on failure; the descriptor then stays deleted.
///
/// # Errors
///
/// Returns an error if the old descriptor cannot be removed, Gradle cannot be
/// started or exits unsuccessfully, or Gradle succeeds without writing the
/// descriptor.
pub fn regenerate(config: &UpdateConfig, executor: &dyn GradleExecutor) -> Result<()> {
    remove_existing(&config.metadata_path)?;
    run_with_isolated_home(config, executor)?;

    if !config.metadata_path.is_file() {
        return Err(UpdaterError::DescriptorMissing {
            path: config.metadata_path.clone(),
        });
    }
    info!("regenerated {}", config.metadata_path);
    Ok(())
}

/// Run Gradle with a fresh home directory that is removed afterwards.
fn run_with_isolated_home(config: &UpdateConfig, executor: &dyn GradleExecutor) -> Result<()> {
    let home = tempfile::Builder::new()
        .prefix("gradle-home-")
        .tempdir()
        .map_err(|source| UpdaterError::TempHome { source })?;
    let user_home =
        Utf8Path::from_path(home.path()).ok_or_else(|| UpdaterError::NonUtf8Path {
            path: home.path().to_string_lossy().into_owned(),
        })?;

    let invocation = GradleInvocation::new(config, user_home);
    debug!(
        "running {} in {} with {GRADLE_USER_HOME}={}",
        invocation.command_line(),
        invocation.working_dir,
        invocation.user_home
    );
    // An error here drops `home`, which removes the directory as well.
    let status = executor.execute(&invocation)?;

    if let Err(err) = home.close() {
        warn!("failed to remove temporary Gradle home: {err}");
    }

    if status.success() {
        Ok(())
    } else {
        Err(UpdaterError::GradleFailed {
            code: status.code(),
        })
    }
}
