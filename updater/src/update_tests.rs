//! Tests for the update flow.

use super::*;
use crate::error::UpdaterError;
use crate::gradle::MockGradleExecutor;
use crate::test_utils::{TempProject, exit_status};

const GENERATED: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
    "<verification-metadata xmlns=\"https://schema.gradle.org/dependency-verification\">\n",
    "   <configuration>\n",
    "      <verify-metadata>true</verify-metadata>\n",
    "   </configuration>\n",
    "</verification-metadata>\n",
);

fn gradle_writing(project: &TempProject, code: i32) -> MockGradleExecutor {
    let metadata_path = project.config.metadata_path.clone();
    let mut executor = MockGradleExecutor::new();
    executor
        .expect_execute()
        .times(1)
        .returning(move |_| {
            if code == 0 {
                std::fs::write(&metadata_path, GENERATED).expect("write descriptor");
            }
            Ok(exit_status(code))
        });
    executor
}

fn stderr_text(stderr: Vec<u8>) -> String {
    String::from_utf8(stderr).expect("stderr was not UTF-8")
}

#[test]
fn update_regenerates_then_patches() {
    let project = TempProject::new();
    let executor = gradle_writing(&project, 0);
    let mut stderr = Vec::new();

    let report = update_verification_metadata(&project.config, &executor, &mut stderr)
        .expect("update should succeed");

    assert!(report.regenerated);
    assert_eq!(report.trust_rules_added, 3);
    assert_eq!(report.metadata_path, project.config.metadata_path);

    let contents = std::fs::read_to_string(&project.config.metadata_path).expect("read");
    assert!(contents.contains("<trusted-artifacts>"));
    assert!(contents.contains(r#"<trust file=".*-sources[.]jar" regex="true"/>"#));

    let stderr = stderr_text(stderr);
    assert!(stderr.contains("Regenerating"));
    assert!(stderr.contains("Adding source trust exclusions..."));
}

#[test]
fn update_stops_before_patching_when_gradle_fails() {
    let project = TempProject::new();
    project.write_descriptor(GENERATED);
    let executor = gradle_writing(&project, 2);
    let mut stderr = Vec::new();

    let err = update_verification_metadata(&project.config, &executor, &mut stderr)
        .expect_err("Gradle failed");

    assert!(matches!(err, UpdaterError::GradleFailed { code: Some(2) }));
    assert!(!project.descriptor_exists());
    assert!(!stderr_text(stderr).contains("Adding source trust exclusions"));
}

#[test]
fn patch_only_skips_gradle() {
    let mut project = TempProject::new();
    project.config.patch_only = true;
    project.write_descriptor(GENERATED);

    let mut executor = MockGradleExecutor::new();
    executor.expect_execute().times(0);
    let mut stderr = Vec::new();

    let report = update_verification_metadata(&project.config, &executor, &mut stderr)
        .expect("update should succeed");

    assert!(!report.regenerated);
    let contents = std::fs::read_to_string(&project.config.metadata_path).expect("read");
    assert!(contents.contains("<trusted-artifacts>"));
}

#[test]
fn patch_only_fails_without_descriptor() {
    let mut project = TempProject::new();
    project.config.patch_only = true;
    let executor = MockGradleExecutor::new();
    let mut stderr = Vec::new();

    let err = update_verification_metadata(&project.config, &executor, &mut stderr)
        .expect_err("no descriptor");
    assert!(matches!(err, UpdaterError::ReadDescriptor { .. }));
}

#[test]
fn quiet_suppresses_progress() {
    let mut project = TempProject::new();
    project.config.quiet = true;
    let executor = gradle_writing(&project, 0);
    let mut stderr = Vec::new();

    update_verification_metadata(&project.config, &executor, &mut stderr)
        .expect("update should succeed");

    assert!(stderr.is_empty());
}

#[test]
fn describe_plan_lists_invocation_without_side_effects() {
    let project = TempProject::new();
    project.write_descriptor(GENERATED);
    let mut stderr = Vec::new();

    describe_plan(&project.config, &mut stderr);

    let stderr = stderr_text(stderr);
    assert!(stderr.contains("Dry run - no files will be modified"));
    assert!(stderr.contains(
        "Gradle arguments: --write-verification-metadata sha512 --no-daemon build zipDebug -x assembleRelease"
    ));
    assert!(stderr.contains("GRADLE_USER_HOME: fresh temporary directory"));
    assert!(stderr.contains("  - .*-javadoc[.]jar"));

    let contents = std::fs::read_to_string(&project.config.metadata_path).expect("read");
    assert_eq!(contents, GENERATED);
}

#[test]
fn describe_plan_notes_skipped_gradle() {
    let mut project = TempProject::new();
    project.config.patch_only = true;
    let mut stderr = Vec::new();

    describe_plan(&project.config, &mut stderr);

    let stderr = stderr_text(stderr);
    assert!(stderr.contains("Gradle: skipped (--patch-only)"));
    assert!(!stderr.contains("Gradle arguments"));
}

#[test]
fn summary_line_reflects_mode() {
    let report = UpdateReport {
        metadata_path: Utf8PathBuf::from("gradle/verification-metadata.xml"),
        regenerated: false,
        trust_rules_added: 3,
    };
    assert_eq!(
        report.summary_line(),
        "Patched gradle/verification-metadata.xml with 3 source trust rules."
    );
}
