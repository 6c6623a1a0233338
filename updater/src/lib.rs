//! Gradle dependency verification metadata updater.
//!
//! This crate regenerates `gradle/verification-metadata.xml` with the Gradle
//! wrapper and then adds trust rules for source and javadoc artifacts. It is
//! used by the `update-verification` binary and can be driven
//! programmatically, for example with a custom [`gradle::GradleExecutor`].
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Run configuration and fixed Gradle arguments
//! - [`descriptor`] - Descriptor parsing, patching and serialization
//! - [`error`] - Error types
//! - [`gradle`] - Descriptor regeneration through the Gradle wrapper
//! - [`output`] - Progress and error output helpers
//! - [`update`] - The regenerate-then-patch flow

pub mod cli;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod gradle;
pub mod output;
pub mod update;

#[cfg(test)]
mod test_utils;
