//! Hook configuration read from a real repository's git config.

use git2::Repository;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use refgate_core::{HookConfig, Level, PolicyChoice};

fn repo_with(pairs: &[(&str, &str)]) -> (TempDir, Repository) {
    let dir = TempDir::new().unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    {
        let mut config = repo.config().unwrap();
        for (key, value) in pairs {
            config.set_str(&format!("refgate.{key}"), value).unwrap();
        }
    }
    (dir, repo)
}

fn load(repo: &Repository) -> Result<HookConfig, refgate_core::GateError> {
    let config = repo.config().unwrap();
    HookConfig::from_lookup(|key| config.get_string(key).ok())
}

#[test]
fn reads_a_minimal_configuration() {
    let (_dir, repo) = repo_with(&[("master-branch-name", "main")]);
    let config = load(&repo).unwrap();

    assert_eq!(config.branch, "main");
    assert_eq!(config.policy, PolicyChoice::AdditionsOnly);
    assert!(config.override_message.is_none());
}

#[test]
fn reads_a_full_configuration() {
    let (_dir, repo) = repo_with(&[
        ("master-branch-name", "release"),
        ("policy", "size-limit"),
        ("max-commit-bytes", "8192"),
        ("commit-override-message", "oversize of {bytes} bytes approved"),
        ("support-contact", "ops@example.com"),
        ("log-command", "logger -t refgate"),
        ("log-command-level", "debug"),
        ("blocked-push-command", "notify-blocked"),
        ("unblocked-push-command", "notify-unblocked"),
    ]);
    let config = load(&repo).unwrap();

    assert_eq!(config.branch, "release");
    assert_eq!(config.policy, PolicyChoice::SizeLimit);
    assert_eq!(config.max_commit_bytes, Some(8192));
    assert_eq!(config.log_command_level, Level::Debug);
    assert_eq!(config.blocked_push_command.as_deref(), Some("notify-blocked"));
}

#[test]
fn missing_branch_name_is_rejected() {
    let (_dir, repo) = repo_with(&[("policy", "additions-only")]);
    let err = load(&repo).unwrap_err();
    assert!(err.to_string().contains("master-branch-name"));
}
