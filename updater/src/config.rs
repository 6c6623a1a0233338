//! Run configuration resolved from the command line.
//!
//! Nothing is read from configuration files or the environment; the Gradle
//! arguments are fixed and only paths can be overridden.

use crate::cli::Cli;
use crate::error::{Result, UpdaterError};
use camino::{Utf8Path, Utf8PathBuf};

/// Descriptor location relative to the project root.
pub const DEFAULT_METADATA_PATH: &str = "gradle/verification-metadata.xml";

/// Arguments passed to the Gradle wrapper.
///
/// `assembleRelease` is excluded because it requires signing keys.
pub const GRADLE_ARGS: [&str; 7] = [
    "--write-verification-metadata",
    "sha512",
    "--no-daemon",
    "build",
    "zipDebug",
    "-x",
    "assembleRelease",
];

/// Environment variable pointing Gradle at its home/cache directory.
pub const GRADLE_USER_HOME: &str = "GRADLE_USER_HOME";

/// Settings for one update run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateConfig {
    /// Project root; Gradle runs with this as its working directory.
    pub root_dir: Utf8PathBuf,
    /// Descriptor that is deleted, regenerated and patched.
    pub metadata_path: Utf8PathBuf,
    /// Gradle wrapper executable.
    pub gradle_program: Utf8PathBuf,
    /// Arguments for the Gradle wrapper.
    pub gradle_args: Vec<String>,
    /// Skip regeneration and only patch the existing descriptor.
    pub patch_only: bool,
    /// Suppress progress output.
    pub quiet: bool,
}

impl UpdateConfig {
    /// Default configuration for a project rooted at `root_dir`.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use verification_updater::config::UpdateConfig;
    ///
    /// let config = UpdateConfig::for_root(Utf8Path::new("/src/app"));
    /// assert_eq!(
    ///     config.metadata_path,
    ///     Utf8Path::new("/src/app/gradle/verification-metadata.xml")
    /// );
    /// ```
    #[must_use]
    pub fn for_root(root_dir: &Utf8Path) -> Self {
        Self {
            root_dir: root_dir.to_owned(),
            metadata_path: root_dir.join(DEFAULT_METADATA_PATH),
            gradle_program: root_dir.join(wrapper_file_name()),
            gradle_args: GRADLE_ARGS.iter().map(|&arg| arg.to_owned()).collect(),
            patch_only: false,
            quiet: false,
        }
    }

    /// Resolve the configuration for parsed CLI arguments.
    ///
    /// Without `--root-dir` the current directory is the project root.
    /// Relative paths are resolved against the current directory, so the
    /// wrapper path stays valid once Gradle runs inside the project root.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined or is
    /// not valid UTF-8.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let cwd = current_dir()?;
        let root_dir = cli
            .root_dir
            .as_deref()
            .map_or_else(|| cwd.clone(), |dir| absolute_from(&cwd, dir));

        let mut config = Self::for_root(&root_dir);
        if let Some(metadata) = &cli.metadata {
            config.metadata_path = absolute_from(&cwd, metadata);
        }
        config.patch_only = cli.patch_only;
        config.quiet = cli.quiet;
        Ok(config)
    }
}

fn absolute_from(cwd: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        path.to_owned()
    } else {
        cwd.join(path)
    }
}

/// Return the platform-specific Gradle wrapper script name.
#[must_use]
pub const fn wrapper_file_name() -> &'static str {
    #[cfg(target_os = "windows")]
    {
        "gradlew.bat"
    }
    #[cfg(not(target_os = "windows"))]
    {
        "gradlew"
    }
}

fn current_dir() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir()?;
    Utf8PathBuf::from_path_buf(cwd).map_err(|path| UpdaterError::NonUtf8Path {
        path: path.to_string_lossy().into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn for_root_places_everything_under_root() {
        let config = UpdateConfig::for_root(Utf8Path::new("/src/app"));
        assert_eq!(config.root_dir, Utf8Path::new("/src/app"));
        assert_eq!(
            config.metadata_path,
            Utf8Path::new("/src/app/gradle/verification-metadata.xml")
        );
        assert_eq!(
            config.gradle_program,
            Utf8Path::new("/src/app").join(wrapper_file_name())
        );
        assert!(!config.patch_only);
        assert!(!config.quiet);
    }

    #[test]
    fn gradle_args_request_sha512_metadata_without_release_assembly() {
        let config = UpdateConfig::for_root(Utf8Path::new("."));
        assert_eq!(
            config.gradle_args,
            [
                "--write-verification-metadata",
                "sha512",
                "--no-daemon",
                "build",
                "zipDebug",
                "-x",
                "assembleRelease",
            ]
        );
    }

    #[test]
    fn wrapper_file_name_is_correct() {
        let name = wrapper_file_name();
        #[cfg(target_os = "windows")]
        assert_eq!(name, "gradlew.bat");
        #[cfg(not(target_os = "windows"))]
        assert_eq!(name, "gradlew");
    }

    #[rstest]
    #[case::defaults(None, "/src/app/gradle/verification-metadata.xml")]
    #[case::override_path(Some("/tmp/meta.xml"), "/tmp/meta.xml")]
    fn from_cli_resolves_metadata_path(#[case] metadata: Option<&str>, #[case] expected: &str) {
        let cli = Cli {
            root_dir: Some(Utf8PathBuf::from("/src/app")),
            metadata: metadata.map(Utf8PathBuf::from),
            ..Cli::default()
        };
        let config = UpdateConfig::from_cli(&cli).expect("config should resolve");
        assert_eq!(config.metadata_path, Utf8Path::new(expected));
    }

    #[test]
    fn from_cli_copies_flags() {
        let cli = Cli {
            root_dir: Some(Utf8PathBuf::from("/src/app")),
            patch_only: true,
            quiet: true,
            ..Cli::default()
        };
        let config = UpdateConfig::from_cli(&cli).expect("config should resolve");
        assert!(config.patch_only);
        assert!(config.quiet);
    }

    #[test]
    fn from_cli_resolves_relative_paths_against_current_dir() {
        let cli = Cli {
            root_dir: Some(Utf8PathBuf::from("app")),
            metadata: Some(Utf8PathBuf::from("meta/verification.xml")),
            patch_only: true,
            ..Cli::default()
        };
        let config = UpdateConfig::from_cli(&cli).expect("config should resolve");
        let cwd = current_dir().expect("current dir");

        assert_eq!(config.root_dir, cwd.join("app"));
        assert_eq!(config.gradle_program, cwd.join("app").join(wrapper_file_name()));
        assert!(config.gradle_program.is_absolute());
        assert_eq!(config.metadata_path, cwd.join("meta/verification.xml"));
    }

    #[test]
    fn from_cli_defaults_root_to_current_dir() {
        let config = UpdateConfig::from_cli(&Cli::default()).expect("config should resolve");
        let cwd = std::env::current_dir().expect("current dir");
        assert_eq!(config.root_dir.as_std_path(), cwd.as_path());
    }
}
