//! The pluggable bad-commit predicates and the override-token
//! exemption.

use refgate_core::{
    Commit, GateError, HookConfig, PolicyChoice, Result, Transcript, Verdict,
};

use crate::history::HistoryQuery;

/// Placeholder the size-limit policy replaces with the commit's actual
/// added-byte count before the override-token substring test.
pub const BYTES_PLACEHOLDER: &str = "{bytes}";

/// A bad-commit predicate.
///
/// Implementations inspect one commit at a time and never see the rest
/// of the push; cross-commit behavior belongs to the aggregator.
pub trait Policy {
    /// Short name used in transcripts.
    fn name(&self) -> &'static str;

    /// Whether `commit` violates this policy.
    fn is_bad(&self, commit: &Commit, history: &dyn HistoryQuery) -> Result<bool>;

    /// The override token to search for in `commit`'s message, rendered
    /// from the configured template.
    fn render_override(
        &self,
        template: &str,
        commit: &Commit,
        history: &dyn HistoryQuery,
    ) -> Result<String>;
}

/// Only net-new paths are allowed: a commit is bad iff any operation is
/// not an Add or a Copy.
pub struct AdditionsOnly;

impl Policy for AdditionsOnly {
    fn name(&self) -> &'static str {
        "additions-only"
    }

    fn is_bad(&self, commit: &Commit, _history: &dyn HistoryQuery) -> Result<bool> {
        Ok(commit.operations.iter().any(|op| !op.kind.is_additive()))
    }

    fn render_override(
        &self,
        template: &str,
        _commit: &Commit,
        _history: &dyn HistoryQuery,
    ) -> Result<String> {
        Ok(template.to_string())
    }
}

/// No commit may add more than `max_bytes` of new content.
pub struct SizeLimit {
    /// The configured threshold, exclusive.
    pub max_bytes: u64,
}

impl SizeLimit {
    /// Added bytes for one commit: the sum of per-operation deltas when
    /// the change log carried them, otherwise one history query.
    /// Deletions never count.
    fn added_bytes(&self, commit: &Commit, history: &dyn HistoryQuery) -> Result<u64> {
        let mut total = 0u64;
        let mut any = false;
        for op in &commit.operations {
            if let Some(delta) = op.byte_delta {
                any = true;
                if !matches!(op.kind, refgate_core::ChangeKind::Delete) {
                    total += delta;
                }
            }
        }
        if any {
            Ok(total)
        } else {
            history.added_bytes(&commit.hash)
        }
    }
}

impl Policy for SizeLimit {
    fn name(&self) -> &'static str {
        "size-limit"
    }

    fn is_bad(&self, commit: &Commit, history: &dyn HistoryQuery) -> Result<bool> {
        Ok(self.added_bytes(commit, history)? > self.max_bytes)
    }

    fn render_override(
        &self,
        template: &str,
        commit: &Commit,
        history: &dyn HistoryQuery,
    ) -> Result<String> {
        let bytes = self.added_bytes(commit, history)?;
        Ok(template.replace(BYTES_PLACEHOLDER, &bytes.to_string()))
    }
}

/// Instantiate the policy the configuration selects.
///
/// # Errors
///
/// Returns [`GateError::Config`] when the size-limit policy is selected
/// without a threshold. `HookConfig` already rejects that combination,
/// so this only fires for hand-built configurations.
pub fn select(config: &HookConfig) -> Result<Box<dyn Policy>> {
    match config.policy {
        PolicyChoice::AdditionsOnly => Ok(Box::new(AdditionsOnly)),
        PolicyChoice::SizeLimit => {
            let max_bytes = config.max_commit_bytes.ok_or_else(|| {
                GateError::Config("size-limit policy requires max-commit-bytes".into())
            })?;
            Ok(Box::new(SizeLimit { max_bytes }))
        }
    }
}

/// Evaluate every commit and apply the exemption to the bad ones.
///
/// Returns one `(hash, verdict)` pair per commit, in the same order as
/// `commits` (newest first). The exemption is only ever evaluated for
/// commits already marked bad, so `exempted` implies `bad` by
/// construction.
pub fn evaluate(
    commits: &[Commit],
    policy: &dyn Policy,
    config: &HookConfig,
    history: &dyn HistoryQuery,
    transcript: &mut Transcript,
) -> Result<Vec<(String, Verdict)>> {
    let mut verdicts = Vec::with_capacity(commits.len());
    for commit in commits {
        let bad = policy.is_bad(commit, history)?;
        let exempted = if bad {
            is_exempted(policy, config, commit, history)?
        } else {
            false
        };
        transcript.trace(format!(
            "{}: bad={bad} exempted={exempted} ({} operations)",
            commit.hash,
            commit.operations.len()
        ));
        verdicts.push((commit.hash.clone(), Verdict { bad, exempted }));
    }
    Ok(verdicts)
}

fn is_exempted(
    policy: &dyn Policy,
    config: &HookConfig,
    commit: &Commit,
    history: &dyn HistoryQuery,
) -> Result<bool> {
    let Some(template) = config.override_message.as_deref() else {
        return Ok(false);
    };
    let token = policy.render_override(template, commit, history)?;
    let message = history.commit_message(&commit.hash)?;
    Ok(message.contains(&token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use refgate_core::{ChangeKind, ChangeOp};

    use crate::history::ScriptedHistory;

    const HASH: &str = "1111111111111111111111111111111111111111";

    fn commit_with(ops: &[ChangeKind]) -> Commit {
        let mut commit = Commit::new(HASH);
        commit.operations = ops
            .iter()
            .enumerate()
            .map(|(i, kind)| ChangeOp::new(*kind, format!("file{i}")))
            .collect();
        commit
    }

    fn config(pairs: &[(&str, &str)]) -> HookConfig {
        let owned: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (format!("refgate.{k}"), v.to_string()))
            .collect();
        HookConfig::from_lookup(move |key| {
            owned.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })
        .unwrap()
    }

    #[test]
    fn additions_only_accepts_adds_and_copies() {
        let history = ScriptedHistory::default();
        let ok = commit_with(&[ChangeKind::Add, ChangeKind::Copy]);
        assert!(!AdditionsOnly.is_bad(&ok, &history).unwrap());
    }

    #[test]
    fn additions_only_rejects_each_destructive_kind() {
        let history = ScriptedHistory::default();
        for kind in [ChangeKind::Modify, ChangeKind::Delete, ChangeKind::Rename] {
            let commit = commit_with(&[ChangeKind::Add, kind]);
            assert!(AdditionsOnly.is_bad(&commit, &history).unwrap(), "{kind} must be bad");
        }
    }

    #[test]
    fn size_limit_compares_against_threshold() {
        let history = ScriptedHistory::default().with_added_bytes(HASH, 100);
        let commit = commit_with(&[ChangeKind::Add]);

        assert!(SizeLimit { max_bytes: 99 }.is_bad(&commit, &history).unwrap());
        assert!(!SizeLimit { max_bytes: 100 }.is_bad(&commit, &history).unwrap());
    }

    #[test]
    fn size_limit_prefers_per_op_deltas() {
        // No scripted size: the history query would error if consulted.
        let history = ScriptedHistory::default();
        let mut commit = commit_with(&[ChangeKind::Add, ChangeKind::Modify, ChangeKind::Delete]);
        commit.operations[0].byte_delta = Some(30);
        commit.operations[1].byte_delta = Some(20);
        commit.operations[2].byte_delta = Some(500); // deletion, never counted

        assert!(!SizeLimit { max_bytes: 50 }.is_bad(&commit, &history).unwrap());
        assert!(SizeLimit { max_bytes: 49 }.is_bad(&commit, &history).unwrap());
    }

    #[test]
    fn size_limit_substitutes_the_bytes_placeholder() {
        let history = ScriptedHistory::default().with_added_bytes(HASH, 1234);
        let commit = commit_with(&[ChangeKind::Add]);
        let token = SizeLimit { max_bytes: 1 }
            .render_override("approved oversize commit of {bytes} bytes", &commit, &history)
            .unwrap();
        assert_eq!(token, "approved oversize commit of 1234 bytes");
    }

    #[test]
    fn additions_only_uses_the_template_verbatim() {
        let history = ScriptedHistory::default();
        let commit = commit_with(&[ChangeKind::Modify]);
        let token = AdditionsOnly
            .render_override("OVERRIDE {bytes}", &commit, &history)
            .unwrap();
        assert_eq!(token, "OVERRIDE {bytes}");
    }

    #[test]
    fn select_honors_the_configuration() {
        let structural = config(&[("master-branch-name", "main")]);
        assert_eq!(select(&structural).unwrap().name(), "additions-only");

        let quantitative = config(&[
            ("master-branch-name", "main"),
            ("policy", "size-limit"),
            ("max-commit-bytes", "10"),
        ]);
        assert_eq!(select(&quantitative).unwrap().name(), "size-limit");
    }

    #[test]
    fn exemption_requires_a_configured_template() {
        let cfg = config(&[("master-branch-name", "main")]);
        let history = ScriptedHistory::default().with_message(HASH, "OVERRIDE");
        let commit = commit_with(&[ChangeKind::Modify]);

        let verdicts =
            evaluate(&[commit], &AdditionsOnly, &cfg, &history, &mut Transcript::new()).unwrap();
        assert!(verdicts[0].1.bad);
        assert!(!verdicts[0].1.exempted);
    }

    #[test]
    fn exemption_is_an_exact_substring_match() {
        let cfg = config(&[
            ("master-branch-name", "main"),
            ("commit-override-message", "OVERRIDE"),
        ]);
        let commit = commit_with(&[ChangeKind::Modify]);

        let matching = ScriptedHistory::default().with_message(HASH, "fix stuff\n\nOVERRIDE\n");
        let verdicts = evaluate(
            std::slice::from_ref(&commit),
            &AdditionsOnly,
            &cfg,
            &matching,
            &mut Transcript::new(),
        )
        .unwrap();
        assert!(verdicts[0].1.exempted);

        let lowercase = ScriptedHistory::default().with_message(HASH, "override please");
        let verdicts = evaluate(
            &[commit],
            &AdditionsOnly,
            &cfg,
            &lowercase,
            &mut Transcript::new(),
        )
        .unwrap();
        assert!(!verdicts[0].1.exempted);
    }

    #[test]
    fn exemption_never_fires_for_good_commits() {
        let cfg = config(&[
            ("master-branch-name", "main"),
            ("commit-override-message", "OVERRIDE"),
        ]);
        let history = ScriptedHistory::default().with_message(HASH, "OVERRIDE");
        let commit = commit_with(&[ChangeKind::Add]);

        let verdicts =
            evaluate(&[commit], &AdditionsOnly, &cfg, &history, &mut Transcript::new()).unwrap();
        assert!(!verdicts[0].1.bad);
        assert!(!verdicts[0].1.exempted);
    }
}
