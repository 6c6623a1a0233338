//! Gradle dependency verification descriptor handling.
//!
//! This module parses `verification-metadata.xml`, appends trust rules for
//! source and javadoc artifacts, and writes the file back in the exact layout
//! Gradle itself produces, so that regenerating and patching yields no
//! spurious diff.
//!
//! # Submodules
//!
//! - [`document`] - Element tree and namespace-aware parser
//! - [`indent`] - Whitespace reindentation
//! - [`serialize`] - Byte-exact serialization
//! - [`patch`] - The trust exclusion edit itself

pub mod document;
pub mod indent;
pub mod patch;
pub mod serialize;

pub use document::{Document, Element};
pub use patch::{
    SOURCE_TRUST_PATTERNS, VERIFICATION_NAMESPACE, add_source_exclusions,
    append_source_exclusions, patch_descriptor, use_default_verification_namespace,
};
