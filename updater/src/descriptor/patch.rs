//! Trust exclusions for source and javadoc artifacts.
//!
//! Gradle only writes checksums for sources and javadoc jars that the build
//! itself resolved, so IDE downloads of those artifacts are trusted by file
//! name instead.

use super::document::{Document, Element};
use super::indent::{GRADLE_INDENT, indent};
use super::serialize::to_gradle_bytes;
use crate::error::{DescriptorError, Result, UpdaterError};
use camino::Utf8Path;
use log::{debug, info};
use std::collections::HashSet;

/// Namespace of Gradle's dependency verification schema.
pub const VERIFICATION_NAMESPACE: &str = "https://schema.gradle.org/dependency-verification";

/// File-name patterns trusted without checksums, in output order.
pub const SOURCE_TRUST_PATTERNS: [&str; 3] =
    [r".*-javadoc[.]jar", r".*-sources[.]jar", r".*-src[.]zip"];

const CONFIGURATION: &str = "configuration";
const TRUSTED_ARTIFACTS: &str = "trusted-artifacts";
const TRUST: &str = "trust";
const XMLNS: &str = "xmlns";

/// Append a `trusted-artifacts` block covering [`SOURCE_TRUST_PATTERNS`].
///
/// The block becomes the last child of the `configuration` element, which is
/// either the root itself or the first such child of the root. Existing
/// content is left as is, and an existing block is not detected: applying the
/// patch twice yields two blocks.
///
/// # Errors
///
/// Returns [`DescriptorError::ConfigurationNotFound`] when no
/// `configuration` element exists in [`VERIFICATION_NAMESPACE`].
pub fn append_source_exclusions(
    document: &mut Document,
) -> std::result::Result<(), DescriptorError> {
    let configuration = find_configuration(document.root_mut()).ok_or(
        DescriptorError::ConfigurationNotFound {
            namespace: VERIFICATION_NAMESPACE,
        },
    )?;

    // New elements reuse the prefix `configuration` is bound with.
    let prefix = configuration.prefix().map(str::to_owned);
    let qualify = |local: &str| match &prefix {
        Some(prefix) => format!("{prefix}:{local}"),
        None => local.to_owned(),
    };

    let mut trusted_artifacts =
        Element::new(qualify(TRUSTED_ARTIFACTS), Some(VERIFICATION_NAMESPACE));
    for pattern in SOURCE_TRUST_PATTERNS {
        trusted_artifacts.push_child(
            Element::new(qualify(TRUST), Some(VERIFICATION_NAMESPACE))
                .with_attribute("file", pattern)
                .with_attribute("regex", "true"),
        );
    }
    configuration.push_child(trusted_artifacts);
    debug!(
        "appended <{TRUSTED_ARTIFACTS}> with {} trust rules",
        SOURCE_TRUST_PATTERNS.len()
    );
    Ok(())
}

/// Bind [`VERIFICATION_NAMESPACE`] as the default namespace of `root` and
/// drop the prefixes it was bound to, so its elements serialize unprefixed.
///
/// Prefix declarations still used by an attribute are kept. The tree is left
/// unchanged when any element declares a different default namespace.
pub fn use_default_verification_namespace(root: &mut Element) {
    if declares_other_default_namespace(root) {
        debug!("another default namespace is declared; keeping element prefixes");
        return;
    }

    let mut attribute_prefixes = HashSet::new();
    collect_attribute_prefixes(root, &mut attribute_prefixes);
    drop_verification_prefixes(root, &attribute_prefixes);
    root.attributes_mut()
        .insert(0, (XMLNS.to_owned(), VERIFICATION_NAMESPACE.to_owned()));
}

fn declares_other_default_namespace(element: &Element) -> bool {
    element
        .attribute(XMLNS)
        .is_some_and(|namespace| namespace != VERIFICATION_NAMESPACE)
        || element
            .children()
            .iter()
            .any(declares_other_default_namespace)
}

fn collect_attribute_prefixes(element: &Element, prefixes: &mut HashSet<String>) {
    prefixes.extend(
        element
            .attributes()
            .iter()
            .filter_map(|(key, _)| key.split_once(':'))
            .filter(|(prefix, _)| *prefix != XMLNS)
            .map(|(prefix, _)| prefix.to_owned()),
    );
    for child in element.children() {
        collect_attribute_prefixes(child, prefixes);
    }
}

fn drop_verification_prefixes(element: &mut Element, attribute_prefixes: &HashSet<String>) {
    element.attributes_mut().retain(|(key, value)| {
        value != VERIFICATION_NAMESPACE || !is_removable_declaration(key, attribute_prefixes)
    });

    if element.namespace() == Some(VERIFICATION_NAMESPACE) && element.prefix().is_some() {
        let local_name = element.local_name().to_owned();
        element.set_name(local_name);
    }

    for child in element.children_mut() {
        drop_verification_prefixes(child, attribute_prefixes);
    }
}

fn is_removable_declaration(key: &str, attribute_prefixes: &HashSet<String>) -> bool {
    match key.strip_prefix(XMLNS) {
        Some("") => true,
        Some(rest) => rest
            .strip_prefix(':')
            .is_some_and(|prefix| !attribute_prefixes.contains(prefix)),
        None => false,
    }
}

/// Patch a document and render it in Gradle's layout.
///
/// # Errors
///
/// Returns [`DescriptorError`] when the input cannot be parsed or has no
/// `configuration` element.
pub fn patch_descriptor(xml: &str) -> std::result::Result<Vec<u8>, DescriptorError> {
    let mut document = Document::parse(xml)?;
    use_default_verification_namespace(document.root_mut());
    append_source_exclusions(&mut document)?;

    let root = document.root_mut();
    indent(root, GRADLE_INDENT);
    root.set_tail(Some("\n".to_owned()));

    Ok(to_gradle_bytes(&document))
}

/// Rewrite the descriptor at `path` with source trust exclusions added.
///
/// # Errors
///
/// Returns an error if the file cannot be read or written, or if its content
/// is not a valid verification descriptor.
pub fn add_source_exclusions(path: &Utf8Path) -> Result<()> {
    let xml = std::fs::read_to_string(path).map_err(|source| UpdaterError::ReadDescriptor {
        path: path.to_owned(),
        source,
    })?;

    let patched = patch_descriptor(&xml).map_err(|source| UpdaterError::Descriptor {
        path: path.to_owned(),
        source,
    })?;

    std::fs::write(path, patched).map_err(|source| UpdaterError::WriteDescriptor {
        path: path.to_owned(),
        source,
    })?;
    info!("added source trust exclusions to {path}");
    Ok(())
}

fn find_configuration(root: &mut Element) -> Option<&mut Element> {
    if root.is(VERIFICATION_NAMESPACE, CONFIGURATION) {
        return Some(root);
    }
    root.children_mut()
        .iter_mut()
        .find(|child| child.is(VERIFICATION_NAMESPACE, CONFIGURATION))
}

#[cfg(test)]
#[path = "patch_tests.rs"]
mod tests;
