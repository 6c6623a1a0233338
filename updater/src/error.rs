//! Error types for the verification metadata updater.
//!
//! Every failure is fatal to the run. Variants keep the underlying error as a
//! source so the diagnostic chain reaches the user intact.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while parsing or patching a verification descriptor.
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// The document is not well-formed XML.
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An element carries an unparseable attribute.
    #[error("malformed attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// A name or character data section is not valid UTF-8.
    #[error("invalid UTF-8 in descriptor: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// The document structure is incomplete (no root, unclosed elements).
    #[error("malformed descriptor: {reason}")]
    Malformed {
        /// Description of the structural problem.
        reason: String,
    },

    /// No `configuration` element in the dependency verification namespace.
    #[error("no <configuration> element in namespace {namespace}")]
    ConfigurationNotFound {
        /// Namespace the element was looked up in.
        namespace: &'static str,
    },
}

/// Errors that can occur while updating the verification metadata.
#[derive(Debug, Error)]
pub enum UpdaterError {
    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The previous descriptor exists but could not be deleted.
    #[error("failed to remove {path}")]
    RemoveDescriptor {
        /// Path of the descriptor.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The isolated Gradle home directory could not be created.
    #[error("failed to create temporary Gradle home")]
    TempHome {
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A path required for the run is not valid UTF-8.
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Lossy rendering of the offending path.
        path: String,
    },

    /// The Gradle wrapper could not be started.
    #[error("failed to run {program}")]
    GradleSpawn {
        /// The wrapper program that was invoked.
        program: Utf8PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The Gradle wrapper exited unsuccessfully.
    #[error("gradle exited with {}", describe_exit(.code))]
    GradleFailed {
        /// Exit code, or `None` when terminated by a signal.
        code: Option<i32>,
    },

    /// Gradle finished but did not write the descriptor.
    #[error("gradle did not generate {path}")]
    DescriptorMissing {
        /// Expected descriptor path.
        path: Utf8PathBuf,
    },

    /// The descriptor could not be read.
    #[error("failed to read {path}")]
    ReadDescriptor {
        /// Path of the descriptor.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The patched descriptor could not be written back.
    #[error("failed to write {path}")]
    WriteDescriptor {
        /// Path of the descriptor.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The descriptor could not be parsed or patched.
    #[error("invalid descriptor {path}")]
    Descriptor {
        /// Path of the descriptor.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        source: DescriptorError,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {code}"),
        None => "no exit code (terminated by signal)".to_owned(),
    }
}

/// Result type alias using [`UpdaterError`].
pub type Result<T> = std::result::Result<T, UpdaterError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::exit_code(Some(2), "gradle exited with exit status 2")]
    #[case::signal(None, "gradle exited with no exit code (terminated by signal)")]
    fn gradle_failed_describes_exit(#[case] code: Option<i32>, #[case] expected: &str) {
        let err = UpdaterError::GradleFailed { code };
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn descriptor_missing_includes_path() {
        let err = UpdaterError::DescriptorMissing {
            path: Utf8PathBuf::from("gradle/verification-metadata.xml"),
        };
        assert!(err.to_string().contains("gradle/verification-metadata.xml"));
    }

    #[test]
    fn write_descriptor_preserves_source() {
        let err = UpdaterError::WriteDescriptor {
            path: Utf8PathBuf::from("metadata.xml"),
            source: std::io::Error::other("disk full"),
        };
        assert!(err.to_string().contains("metadata.xml"));
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("disk full"));
    }

    #[test]
    fn configuration_not_found_names_namespace() {
        let err = DescriptorError::ConfigurationNotFound {
            namespace: "https://schema.gradle.org/dependency-verification",
        };
        assert!(err.to_string().contains("schema.gradle.org"));
    }
}
