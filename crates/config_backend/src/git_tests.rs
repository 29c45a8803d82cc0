//! Tests for the git backend, against throwaway local repositories.

use super::*;
use app_config::GitSettings;
use git2::{IndexAddOption, Signature};

fn init_origin(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("origin dir");
    let mut opts = git2::RepositoryInitOptions::new();
    opts.initial_head("master");
    let repo = git2::Repository::init_opts(dir.path(), &opts).expect("init origin");
    write_and_commit(&repo, dir.path(), files, "initial configuration");
    dir
}

fn write_and_commit(
    repo: &git2::Repository,
    workdir: &std::path::Path,
    files: &[(&str, &str)],
    message: &str,
) -> git2::Oid {
    for (name, content) in files {
        let path = workdir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(path, content).expect("write file");
    }

    let mut index = repo.index().expect("index");
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .expect("add files");
    index.write().expect("write index");
    let tree_id = index.write_tree().expect("write tree");
    let tree = repo.find_tree(tree_id).expect("find tree");

    let signature = Signature::now("confserve-tests", "tests@example.com").expect("signature");
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<_> = parent.iter().collect();

    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .expect("commit")
}

fn settings_for(origin: &tempfile::TempDir, basedir: &tempfile::TempDir) -> GitSettings {
    GitSettings {
        uri: origin.path().to_string_lossy().into_owned(),
        basedir: basedir.path().join("checkout").to_string_lossy().into_owned(),
        default_branch_name: "master".to_string(),
        ..GitSettings::default()
    }
}

#[test]
fn snapshot_clones_on_demand_and_reports_the_commit_hash() {
    let origin = init_origin(&[
        ("application.yaml", "a: b\n"),
        ("accounts.yaml", "site:\n  retries: 5\n"),
        ("notes.txt", "ignored\n"),
    ]);
    let basedir = tempfile::tempdir().expect("basedir");
    let backend = GitBackend::new(settings_for(&origin, &basedir), None).expect("backend");

    let snapshot = backend.snapshot("", false).expect("snapshot");

    assert_eq!(snapshot.version.len(), 40, "version should be a commit hash");
    assert_eq!(snapshot.len(), 3);

    let mut names = Vec::new();
    snapshot
        .for_each(|doc| {
            names.push((doc.name().to_string(), doc.readable_suffix().is_some()));
            Ok(())
        })
        .expect("for_each");

    assert!(names.contains(&("application.yaml".to_string(), true)));
    assert!(names.contains(&("accounts.yaml".to_string(), true)));
    assert!(names.contains(&("notes.txt".to_string(), false)));
}

#[test]
fn qualified_names_are_repo_qualified() {
    let origin = init_origin(&[("application.yaml", "a: b\n")]);
    let basedir = tempfile::tempdir().expect("basedir");
    let settings = settings_for(&origin, &basedir);
    let uri = settings.uri.clone();
    let backend = GitBackend::new(settings, None).expect("backend");

    let snapshot = backend.snapshot("", false).expect("snapshot");
    snapshot
        .for_each(|doc| {
            assert_eq!(doc.qualified_name(), format!("{uri}/application.yaml"));
            assert_eq!(doc.location(), uri);
            Ok(())
        })
        .expect("for_each");
}

#[test]
fn subdirectory_documents_carry_their_tree_path() {
    let origin = init_origin(&[
        ("application.yaml", "a: b\n"),
        ("nested/accounts.yaml", "a: c\n"),
    ]);
    let basedir = tempfile::tempdir().expect("basedir");
    let backend = GitBackend::new(settings_for(&origin, &basedir), None).expect("backend");

    let snapshot = backend.snapshot("", false).expect("snapshot");
    let mut names = Vec::new();
    snapshot
        .for_each(|doc| {
            names.push(doc.name().to_string());
            Ok(())
        })
        .expect("for_each");

    assert!(names.contains(&"nested/accounts.yaml".to_string()));
}

#[test]
fn refresh_picks_up_new_commits() {
    let origin = init_origin(&[("application.yaml", "a: b\n")]);
    let basedir = tempfile::tempdir().expect("basedir");
    let backend = GitBackend::new(settings_for(&origin, &basedir), None).expect("backend");

    let before = backend.snapshot("", false).expect("first snapshot");

    let origin_repo = git2::Repository::open(origin.path()).expect("open origin");
    write_and_commit(
        &origin_repo,
        origin.path(),
        &[("application.yaml", "a: updated\n")],
        "update configuration",
    );

    // Without refresh the old snapshot state is served.
    let unrefreshed = backend.snapshot("", false).expect("unrefreshed snapshot");
    assert_eq!(unrefreshed.version, before.version);

    let refreshed = backend.snapshot("", true).expect("refreshed snapshot");
    assert_ne!(refreshed.version, before.version);

    let mut value = None;
    refreshed
        .for_each(|doc| {
            if doc.name() == "application.yaml" {
                value = Some(doc.to_map().expect("decode"));
            }
            Ok(())
        })
        .expect("for_each");
    assert_eq!(
        serde_json::Value::Object(value.expect("document present")),
        serde_json::json!({"a": "updated"})
    );
}

#[test]
fn background_refresh_updates_the_checkout() {
    let origin = init_origin(&[("application.yaml", "a: b\n")]);
    let basedir = tempfile::tempdir().expect("basedir");
    let backend = GitBackend::new(settings_for(&origin, &basedir), None).expect("backend");

    let before = backend.snapshot("", false).expect("first snapshot");

    let origin_repo = git2::Repository::open(origin.path()).expect("open origin");
    write_and_commit(
        &origin_repo,
        origin.path(),
        &[("application.yaml", "a: refreshed\n")],
        "background update",
    );

    backend.refresh().expect("refresh");

    let after = backend.snapshot("", false).expect("snapshot after refresh");
    assert_ne!(after.version, before.version);
}

#[test]
fn labels_disabled_rejects_branch_requests() {
    let origin = init_origin(&[("application.yaml", "a: b\n")]);
    let basedir = tempfile::tempdir().expect("basedir");
    let mut settings = settings_for(&origin, &basedir);
    settings.disable_labels = true;
    let backend = GitBackend::new(settings, None).expect("backend");

    let result = backend.snapshot("feature-x", false);

    assert!(matches!(
        result,
        Err(BackendError::LabelsUnsupported { backend: "git" })
    ));
}

#[test]
fn clone_on_start_populates_the_checkout() {
    let origin = init_origin(&[("application.yaml", "a: b\n")]);
    let basedir = tempfile::tempdir().expect("basedir");
    let mut settings = settings_for(&origin, &basedir);
    settings.clone_on_start = true;

    let backend = GitBackend::new(settings, None).expect("backend");

    // No refresh needed: the checkout exists from startup.
    let snapshot = backend.snapshot("", false).expect("snapshot");
    assert_eq!(snapshot.len(), 1);
}

#[test]
fn branch_snapshot_serves_that_branch() {
    let origin = init_origin(&[("application.yaml", "a: master-value\n")]);

    // Cut a branch with different content in the origin.
    let origin_repo = git2::Repository::open(origin.path()).expect("open origin");
    let head = origin_repo.head().unwrap().peel_to_commit().unwrap();
    origin_repo.branch("staging", &head, false).expect("branch");
    origin_repo
        .set_head("refs/heads/staging")
        .expect("set head");
    write_and_commit(
        &origin_repo,
        origin.path(),
        &[("application.yaml", "a: staging-value\n")],
        "staging configuration",
    );
    origin_repo.set_head("refs/heads/master").expect("set head");
    origin_repo
        .checkout_head(Some(git2::build::CheckoutBuilder::new().force()))
        .expect("checkout master");

    let basedir = tempfile::tempdir().expect("basedir");
    let backend = GitBackend::new(settings_for(&origin, &basedir), None).expect("backend");

    let snapshot = backend.snapshot("staging", true).expect("staging snapshot");

    let mut value = None;
    snapshot
        .for_each(|doc| {
            if doc.name() == "application.yaml" {
                value = Some(doc.to_map().expect("decode"));
            }
            Ok(())
        })
        .expect("for_each");
    assert_eq!(
        serde_json::Value::Object(value.expect("document present")),
        serde_json::json!({"a": "staging-value"})
    );
}
