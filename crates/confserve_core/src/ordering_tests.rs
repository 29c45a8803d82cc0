//! Tests for precedence ordering.

use super::*;
use crate::JsonMap;

fn ps(name: &str) -> PropertySource {
    PropertySource {
        name: name.to_string(),
        source: JsonMap::new(),
    }
}

fn names(sources: &[&PropertySource]) -> Vec<String> {
    sources.iter().map(|ps| ps.name.clone()).collect()
}

fn sort<'a>(
    sources: &'a [PropertySource],
    applications: &[&str],
    profiles: &[&str],
) -> Vec<&'a PropertySource> {
    let applications: Vec<String> = applications.iter().map(|s| s.to_string()).collect();
    let profiles: Vec<String> = profiles.iter().map(|s| s.to_string()).collect();
    let mut view: Vec<&PropertySource> = sources.iter().collect();
    view.sort_by(|l, r| compare_sources(&applications, &profiles, l, r));
    view
}

#[test]
fn misordered_sources_sort_weakest_first() {
    let prefix = "git@github.com:example/cloud-config.git/";
    let sources = vec![
        ps(&format!("{prefix}backend.yml")),
        ps(&format!("{prefix}application.yml")),
        ps(&format!("{prefix}myapp-mine.yml")),
        ps(&format!("{prefix}backend-mine.yml")),
        ps(&format!("{prefix}myapp.yml")),
        ps(&format!("{prefix}backend-production.yml")),
        ps(&format!("{prefix}myapp-production.yml")),
        ps(&format!("{prefix}application-production.yml")),
    ];

    let sorted = sort(&sources, &["myapp", "backend"], &["production", "mine"]);

    assert_eq!(
        names(&sorted),
        vec![
            format!("{prefix}application.yml"),
            format!("{prefix}application-production.yml"),
            format!("{prefix}backend.yml"),
            format!("{prefix}backend-mine.yml"),
            format!("{prefix}backend-production.yml"),
            format!("{prefix}myapp.yml"),
            format!("{prefix}myapp-mine.yml"),
            format!("{prefix}myapp-production.yml"),
        ]
    );
}

#[test]
fn display_message_lists_strongest_first() {
    let sources = vec![
        ps("application.yml"),
        ps("application-production.yml"),
        ps("accounts.yaml"),
        ps("accounts-production.yaml"),
    ];

    let sorted = sort(&sources, &["accounts"], &["production"]);

    assert_eq!(
        precedence_display(&sorted),
        "accounts-production.yaml > accounts.yaml > application-production.yml > application.yml"
    );
}

#[test]
fn application_index_dominates_profile_index() {
    // A key in the first application's second profile beats one in the
    // second application's first profile.
    let sources = vec![ps("a2-p1.yml"), ps("a1-p2.yml")];

    let sorted = sort(&sources, &["a1", "a2"], &["p1", "p2"]);

    assert_eq!(names(&sorted), vec!["a2-p1.yml", "a1-p2.yml"]);
}

#[test]
fn base_profile_documents_order_by_profile_position() {
    let sources = vec![
        ps("application-mine.yml"),
        ps("application-production.yml"),
    ];

    let sorted = sort(&sources, &["myapp"], &["production", "mine"]);

    // `mine` is the later profile, so it is weaker.
    assert_eq!(
        names(&sorted),
        vec!["application-mine.yml", "application-production.yml"]
    );
}

#[test]
fn unmatched_sources_are_weakest_within_their_tier() {
    let sources = vec![ps("other-app.yml"), ps("myapp.yml")];

    let sorted = sort(&sources, &["myapp"], &[]);

    assert_eq!(names(&sorted), vec!["other-app.yml", "myapp.yml"]);
}

#[test]
fn ties_keep_discovery_order() {
    let sources = vec![ps("application.yml"), ps("application.yaml")];

    let sorted = sort(&sources, &["myapp"], &["production"]);

    assert_eq!(names(&sorted), vec!["application.yml", "application.yaml"]);
}

#[test]
fn empty_source_list_displays_empty() {
    let sorted: Vec<&PropertySource> = Vec::new();
    assert_eq!(precedence_display(&sorted), "");
}
