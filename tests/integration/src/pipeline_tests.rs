//! Cross-crate pipeline tests
//!
//! Each mission drives the real scanner, installer, syncer, and HTTP clients
//! against the sample content in `test-fixtures/`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use asset_core::{
    AssetScanner, ChangeKind, Credential, DocSyncer, FixedClock, InstallOptions, LinkInstaller,
    LockStore, RenderInput, RenderValidator, RunStatus, SyncManifest, SyncOptions, SyncOutcome,
    SyncSource, UnitOutcome,
};
use asset_remote::{GitLabRenderer, HttpFetcher};
use asset_test_utils::http::serve_once;
use asset_test_utils::tree::SkillTree;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use pretty_assertions::assert_eq;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../test-fixtures")
        .canonicalize()
        .unwrap()
}

fn file_url(path: &Path) -> String {
    format!("file://{}", path.to_string_lossy().replace('\\', "/"))
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 9, 30, 0).unwrap()
}

fn docs_manifest() -> SyncManifest {
    let upstream = fixtures().join("docs/upstream");
    SyncManifest {
        index_file: Some(PathBuf::from("SKILL.md")),
        sources: ["ci/yaml.md", "api/rest.md"]
            .iter()
            .map(|rel| SyncSource {
                path: PathBuf::from(rel),
                url: file_url(&upstream.join(rel)),
            })
            .collect(),
        ..SyncManifest::default()
    }
}

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(Duration::from_secs(5)).unwrap()
}

// =============================================================================
// Mission 1: Install the sample plugins
// =============================================================================

#[cfg(unix)]
#[test]
fn test_install_fixture_plugins_is_idempotent() {
    let scan = AssetScanner::default()
        .scan(&fixtures().join("plugins"))
        .unwrap();
    let names: Vec<_> = scan.units.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["markdown", "gitlab-ci", "merge-requests"]);

    let target = SkillTree::new();
    let installer = LinkInstaller::new(InstallOptions::default());

    let first = installer.install(&scan.units, target.root()).unwrap();
    assert_eq!(first.created(), 3);

    let second = installer.install(&scan.units, target.root()).unwrap();
    assert!(
        second
            .units
            .iter()
            .all(|u| u.outcome == UnitOutcome::AlreadyInstalled)
    );
    assert!(target.path("gitlab-ci/references/README.md").exists());
}

#[cfg(unix)]
#[test]
fn test_install_reports_user_directory_without_touching_it() {
    let scan = AssetScanner::default()
        .scan(&fixtures().join("plugins"))
        .unwrap();
    let target = SkillTree::new();
    target.file("markdown/custom.md", "my own notes\n");

    let report = LinkInstaller::new(InstallOptions::default())
        .install(&scan.units, target.root())
        .unwrap();

    assert_eq!(report.conflicts(), 1);
    assert_eq!(report.created(), 2);
    assert_eq!(target.read("markdown/custom.md"), "my own notes\n");
}

// =============================================================================
// Mission 2: Sync reference docs into a skill
// =============================================================================

#[test]
fn test_sync_fixture_docs_with_cooldown() {
    let work = SkillTree::new();
    work.file(
        "SKILL.md",
        &std::fs::read_to_string(fixtures().join("plugins/gitlab/skills/gitlab-ci/SKILL.md"))
            .unwrap(),
    );
    let manifest = docs_manifest();

    let first = DocSyncer::new(work.root(), manifest.clone(), fetcher(), FixedClock(t0()))
        .run(SyncOptions::default())
        .unwrap();

    assert_eq!(first.outcome, SyncOutcome::Completed);
    assert!(first.index_updated);
    let yaml = work.read("references/ci/yaml.md");
    assert!(yaml.contains("## `stages`"));
    assert!(!yaml.contains("Tier: Free"));
    assert!(yaml.contains("[REST API](../api/rest.md)"));
    assert!(yaml.contains("[pipelines](file://"));
    let index = work.read("SKILL.md");
    assert!(index.contains("[CI/CD YAML syntax reference](./references/ci/yaml.md)"));
    assert!(index.contains("[REST API](./references/api/rest.md)"));
    assert!(!index.contains("*No markdown files found*"));

    // One hour later the cooldown holds
    let skipped = DocSyncer::new(
        work.root(),
        manifest.clone(),
        fetcher(),
        FixedClock(t0() + TimeDelta::hours(1)),
    )
    .run(SyncOptions::default())
    .unwrap();
    assert!(skipped.is_skipped());

    // After the window everything is unchanged
    let later = DocSyncer::new(
        work.root(),
        manifest,
        fetcher(),
        FixedClock(t0() + TimeDelta::hours(72)),
    )
    .run(SyncOptions::default())
    .unwrap();
    assert!(
        later
            .changes
            .iter()
            .all(|c| c.kind == ChangeKind::Unchanged)
    );
    assert!(!later.index_updated);

    let lock = LockStore::in_dir(work.root()).load(72);
    assert_eq!(lock.last_successful_run, Some(t0() + TimeDelta::hours(72)));
    assert_eq!(lock.last_run_status, Some(RunStatus::Success));
}

#[test]
fn test_sync_manifest_from_disk() {
    let work = SkillTree::new();
    let upstream = fixtures().join("docs/upstream/api/rest.md");
    work.file(
        "sync.toml",
        &format!(
            "cooldown_hours = 1\nreferences_dir = \"refs\"\n\n[[sources]]\npath = \"rest.md\"\nurl = \"{}\"\n",
            file_url(&upstream)
        ),
    );

    let manifest = SyncManifest::load(&work.path("sync.toml")).unwrap();
    let report = DocSyncer::new(work.root(), manifest, fetcher(), FixedClock(t0()))
        .run(SyncOptions::default())
        .unwrap();

    assert_eq!(report.outcome, SyncOutcome::Completed);
    work.assert_file_exists("refs/rest.md");
    assert_eq!(LockStore::in_dir(work.root()).load(1).cooldown_hours, 1);
}

// =============================================================================
// Mission 3: Validate a skill through the renderer
// =============================================================================

#[test]
fn test_validate_fixture_skill_round_trip() {
    let (url, server) = serve_once(201, r#"{"html":"<h1>Markdown</h1>"}"#);
    let renderer = GitLabRenderer::new(&url, Duration::from_secs(5)).unwrap();
    let out = SkillTree::new();

    let result = RenderValidator::new(renderer)
        .validate(
            Some(&Credential::new("glpat-integration")),
            &RenderInput::File(fixtures().join("plugins/docs/skills/markdown/SKILL.md")),
            Some("group/project"),
        )
        .unwrap();
    result.persist(&out.path("rendered.html")).unwrap();

    assert_eq!(out.read("rendered.html"), "<h1>Markdown</h1>");
    let request = server.join().unwrap();
    assert!(request.contains("GitLab Flavored Markdown conventions"));
    assert!(request.contains(r#""project":"group/project""#));
}

#[test]
fn test_validate_without_credential_never_connects() {
    // Port 9 (discard) is never served here; a connection attempt would
    // surface as a transport error instead.
    let renderer = GitLabRenderer::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
    let err = RenderValidator::new(renderer)
        .validate(None, &RenderInput::Inline("# x".to_string()), None)
        .unwrap_err();
    assert!(err.is_missing_credential());
}

#[test]
fn test_lock_record_is_atomic_json() {
    let work = SkillTree::new();
    let store = LockStore::in_dir(work.root());
    let mut lock = store.load(72);
    lock.record_result(t0(), true);
    store.save(&lock).unwrap();

    let raw = asset_fs::io::read_text(store.path()).unwrap();
    assert!(raw.contains("\"last_run_status\": \"success\""));
    // No temp files left behind
    let leftovers: Vec<_> = std::fs::read_dir(work.root())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}
