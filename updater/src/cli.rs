//! CLI argument definitions for the verification metadata updater.
//!
//! Kept apart from the entrypoint so that `main.rs` only orchestrates.

use camino::Utf8PathBuf;
use clap::Parser;

/// Regenerate Gradle dependency verification metadata.
#[derive(Parser, Debug, Clone)]
#[command(name = "update-verification")]
#[command(version, about)]
#[command(long_about = concat!(
    "Regenerate Gradle dependency verification metadata.\n\n",
    "Deletes gradle/verification-metadata.xml, runs the Gradle wrapper with ",
    "--write-verification-metadata sha512 against an empty, throwaway Gradle ",
    "home, and then adds trust rules for -javadoc.jar, -sources.jar and ",
    "-src.zip artifacts so that IDEs can download sources.\n\n",
    "A fresh Gradle home is used on every run because Gradle may omit ",
    "verification entries for artifacts that are already cached.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Regenerate from the project root:\n",
    "    $ update-verification\n\n",
    "  Regenerate a project elsewhere:\n",
    "    $ update-verification --root-dir ~/src/app\n\n",
    "  Only add the trust rules to an existing file:\n",
    "    $ update-verification --patch-only\n\n",
    "  Patch a descriptor kept elsewhere:\n",
    "    $ update-verification --patch-only --metadata build/verification-metadata.xml\n\n",
    "  Preview the Gradle invocation:\n",
    "    $ update-verification --dry-run",
))]
pub struct Cli {
    /// Project root containing the Gradle wrapper [default: current directory].
    #[arg(short, long, value_name = "DIR")]
    pub root_dir: Option<Utf8PathBuf>,

    /// Descriptor to patch instead of gradle/verification-metadata.xml under
    /// the root (requires --patch-only).
    #[arg(short, long, value_name = "FILE", requires = "patch_only")]
    pub metadata: Option<Utf8PathBuf>,

    /// Skip Gradle and only add trust rules to the existing descriptor.
    #[arg(long)]
    pub patch_only: bool,

    /// Show what would be run and exit without changing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Suppress progress output (errors still shown).
    #[arg(short, long)]
    pub quiet: bool,
}

impl Default for Cli {
    /// Creates a `Cli` with every flag disabled and no paths overridden.
    ///
    /// # Examples
    ///
    /// ```
    /// use verification_updater::cli::Cli;
    ///
    /// let cli = Cli::default();
    /// assert!(cli.root_dir.is_none());
    /// assert!(!cli.patch_only);
    /// ```
    fn default() -> Self {
        Self {
            root_dir: None,
            metadata: None,
            patch_only: false,
            dry_run: false,
            quiet: false,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
