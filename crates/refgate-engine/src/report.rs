//! Rendering of the user-facing push report.

use refgate_core::{Commit, HookConfig, PushDecision, Transcript};

const BANNER: &str = "================================================================";

/// Append the explanatory report for a push with bad commits.
///
/// The report lists every bad commit in push order with its full change
/// records, marks exempted commits, separates exempted from unresolved
/// commits when both exist, adds guidance only for configured settings,
/// and closes with the outcome.
pub fn build_report(
    decision: &PushDecision,
    commits: &[Commit],
    config: &HookConfig,
    transcript: &mut Transcript,
) {
    transcript.notice(BANNER);
    transcript.notice(format!(
        "Push to '{}' contains commits that violate the {} policy.",
        config.branch, config.policy
    ));
    transcript.notice("");

    for hash in &decision.bad_commits {
        let exempted = decision.exempted_commits.contains(hash);
        let marker = if exempted { " (exempted)" } else { "" };
        transcript.notice(format!("commit {hash}{marker}"));
        if let Some(commit) = commits.iter().find(|c| &c.hash == hash) {
            for op in &commit.operations {
                transcript.notice(format!("    {}\t{}", op.kind.letter(), op.path));
            }
        }
        transcript.notice("");
    }

    let unresolved: Vec<&String> = decision
        .bad_commits
        .iter()
        .filter(|hash| !decision.exempted_commits.contains(hash))
        .collect();

    if !decision.exempted_commits.is_empty() && !unresolved.is_empty() {
        transcript.notice("Exempted by override:");
        for hash in &decision.exempted_commits {
            transcript.notice(format!("    {hash}"));
        }
        transcript.notice("Still blocking the push:");
        for hash in &unresolved {
            transcript.notice(format!("    {hash}"));
        }
    } else if unresolved.is_empty() {
        transcript.notice(format!(
            "All {} offending commits carry the override token.",
            decision.bad_commits.len()
        ));
    } else {
        transcript.notice(format!(
            "{} of {} commits block the push.",
            unresolved.len(),
            decision.bad_commits.len()
        ));
    }

    if let Some(template) = config.override_message.as_deref() {
        transcript.notice("");
        transcript.notice("To override this policy, include the following text");
        transcript.notice("in the commit message:");
        transcript.notice(format!("    {template}"));
    }
    if let Some(contact) = config.support_contact.as_deref() {
        transcript.notice("");
        transcript.notice(format!("Questions? Contact {contact}."));
    }

    transcript.notice("");
    transcript.notice(format!("Push {}.", decision.outcome));
    transcript.notice(BANNER);
}
