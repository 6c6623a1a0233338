//! Update flow: regenerate the descriptor, then add trust exclusions.
//!
//! The patch step only runs after a successful regeneration; any failure
//! stops the flow at that point.

use crate::config::{GRADLE_USER_HOME, UpdateConfig};
use crate::descriptor::{SOURCE_TRUST_PATTERNS, add_source_exclusions};
use crate::error::Result;
use crate::gradle::{GradleExecutor, regenerate};
use crate::output::write_stderr_line;
use camino::Utf8PathBuf;
use std::io::Write;

/// Outcome of a successful update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    /// The descriptor that was written.
    pub metadata_path: Utf8PathBuf,
    /// Whether Gradle regenerated the descriptor during this run.
    pub regenerated: bool,
    /// Number of trust rules appended.
    pub trust_rules_added: usize,
}

impl UpdateReport {
    /// One-line summary for the end of a run.
    #[must_use]
    pub fn summary_line(&self) -> String {
        let action = if self.regenerated {
            "Regenerated"
        } else {
            "Patched"
        };
        format!(
            "{action} {} with {} source trust rules.",
            self.metadata_path, self.trust_rules_added
        )
    }
}

/// Regenerate (unless `patch_only`) and patch the configured descriptor.
///
/// Progress lines go to `stderr` unless `config.quiet` is set.
///
/// # Errors
///
/// Returns the first error from regeneration or patching.
pub fn update_verification_metadata(
    config: &UpdateConfig,
    executor: &dyn GradleExecutor,
    stderr: &mut dyn Write,
) -> Result<UpdateReport> {
    let regenerated = !config.patch_only;

    if regenerated {
        progress(
            config,
            stderr,
            format!("Regenerating {} with Gradle...", config.metadata_path),
        );
        regenerate(config, executor)?;
    }

    progress(config, stderr, "Adding source trust exclusions...");
    add_source_exclusions(&config.metadata_path)?;

    Ok(UpdateReport {
        metadata_path: config.metadata_path.clone(),
        regenerated,
        trust_rules_added: SOURCE_TRUST_PATTERNS.len(),
    })
}

/// Describe what a run would do, without side effects.
pub fn describe_plan(config: &UpdateConfig, stderr: &mut dyn Write) {
    write_stderr_line(stderr, "Dry run - no files will be modified");
    write_stderr_line(stderr, "");
    write_stderr_line(stderr, format!("Project root: {}", config.root_dir));
    write_stderr_line(stderr, format!("Descriptor: {}", config.metadata_path));

    if config.patch_only {
        write_stderr_line(stderr, "Gradle: skipped (--patch-only)");
    } else {
        write_stderr_line(stderr, format!("Gradle wrapper: {}", config.gradle_program));
        write_stderr_line(
            stderr,
            format!("Gradle arguments: {}", config.gradle_args.join(" ")),
        );
        write_stderr_line(
            stderr,
            format!("{GRADLE_USER_HOME}: fresh temporary directory"),
        );
    }

    write_stderr_line(stderr, "");
    write_stderr_line(stderr, "Trusted artifact patterns:");
    for pattern in SOURCE_TRUST_PATTERNS {
        write_stderr_line(stderr, format!("  - {pattern}"));
    }
}

fn progress(config: &UpdateConfig, stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if !config.quiet {
        write_stderr_line(stderr, message);
    }
}

#[cfg(test)]
#[path = "update_tests.rs"]
mod tests;
