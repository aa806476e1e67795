use super::*;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_builtin_manages_known_owners_only() {
    let policy = OwnerPolicy::builtin();

    assert_eq!(policy.owners(), vec!["erred", "seankhliao"]);
    assert!(policy.is_managed("seankhliao"));
    assert!(policy.is_managed("erred"));
    assert!(!policy.is_managed("someone-else"));
    assert!(policy.settings_for("someone-else").is_none());
}

#[test]
fn test_builtin_lookup_is_case_sensitive() {
    let policy = OwnerPolicy::builtin();

    assert!(!policy.is_managed("SeanKHLiao"));
    assert!(!policy.is_managed("Erred"));
}

#[test]
fn test_builtin_seankhliao_settings() {
    let policy = OwnerPolicy::builtin();
    let settings = policy.settings_for("seankhliao").unwrap();

    assert_eq!(settings.allow_merge_commit, Some(false));
    assert_eq!(settings.allow_squash_merge, Some(true));
    assert_eq!(settings.allow_rebase_merge, Some(false));
    assert_eq!(settings.allow_auto_merge, Some(true));
    assert_eq!(settings.allow_update_branch, Some(true));
    assert_eq!(settings.delete_branch_on_merge, Some(true));
    assert_eq!(settings.has_issues, Some(false));
    assert_eq!(settings.has_wiki, Some(false));
    assert_eq!(settings.has_pages, Some(false));
    assert_eq!(settings.has_projects, Some(false));
    assert_eq!(settings.has_downloads, Some(false));
    assert_eq!(settings.has_discussions, Some(false));
    assert_eq!(settings.is_template, Some(false));
    assert_eq!(settings.archived, None);
    assert_eq!(settings.description, None);
}

#[test]
fn test_builtin_erred_also_archives() {
    let policy = OwnerPolicy::builtin();
    let erred = policy.settings_for("erred").unwrap();
    let seankhliao = policy.settings_for("seankhliao").unwrap();

    assert_eq!(erred.archived, Some(true));
    assert_eq!(
        RepositorySettingsUpdate {
            archived: None,
            ..erred.clone()
        },
        *seankhliao
    );
}

#[test]
fn test_from_toml_str_parses_owner_tables() {
    let policy = OwnerPolicy::from_toml_str(
        r#"
[acme]
allow_merge_commit = false
delete_branch_on_merge = true

[other]
has_wiki = false
"#,
    )
    .expect("valid policy");

    assert_eq!(policy.len(), 2);
    assert_eq!(
        policy.settings_for("acme"),
        Some(&RepositorySettingsUpdate {
            allow_merge_commit: Some(false),
            delete_branch_on_merge: Some(true),
            ..Default::default()
        })
    );
    assert_eq!(
        policy.settings_for("other").and_then(|s| s.has_wiki),
        Some(false)
    );
}

#[test]
fn test_from_toml_str_rejects_unknown_setting() {
    let result = OwnerPolicy::from_toml_str(
        r#"
[acme]
allow_merge_commits = false
"#,
    );

    assert!(matches!(result, Err(PolicyError::Parse(_))));
}

#[test]
fn test_from_toml_str_rejects_empty_owner_table() {
    let result = OwnerPolicy::from_toml_str("[acme]\n");

    match result {
        Err(PolicyError::EmptySettings { owner }) => assert_eq!(owner, "acme"),
        other => panic!("Expected EmptySettings, got {other:?}"),
    }
}

#[test]
fn test_from_toml_str_empty_document_manages_nobody() {
    let policy = OwnerPolicy::from_toml_str("").unwrap();

    assert!(policy.is_empty());
    assert!(!policy.is_managed("seankhliao"));
}

#[test]
fn test_load_reads_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[acme]\narchived = true").unwrap();

    let policy = OwnerPolicy::load(file.path()).unwrap();

    assert_eq!(
        policy.settings_for("acme").and_then(|s| s.archived),
        Some(true)
    );
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.toml");

    match OwnerPolicy::load(&path) {
        Err(PolicyError::Read { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("Expected Read error, got {other:?}"),
    }
}
