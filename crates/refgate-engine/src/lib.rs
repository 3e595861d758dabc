//! The push classification and decision engine.
//!
//! One call to [`check_push`] takes the raw ref-update lines from the
//! pushing client, resolves the commit range for the protected branch,
//! classifies every commit's change operations, evaluates the configured
//! policy with its override-token exemption, and aggregates the result
//! into a [`PushDecision`] while appending the explanatory transcript.
//!
//! External effects stay behind two capability traits: [`HistoryQuery`]
//! for the commit-range queries and [`Sink`](dispatch::Sink) for
//! transcript delivery. The binary provides subprocess implementations;
//! tests use [`ScriptedHistory`].

pub mod classify;
pub mod decision;
pub mod dispatch;
pub mod history;
pub mod policy;
pub mod range;
pub mod refs;
pub mod report;

pub use history::{HistoryQuery, ScriptedHistory};
pub use range::CommitRange;

use refgate_core::{HookConfig, PushDecision, Result, Transcript};

/// Run the full decision pipeline for one push.
///
/// `input` is the raw stdin content: one `"<old> <new> <refname>"` line
/// per ref update. The transcript receives the explanatory report; the
/// caller flushes it exactly once at process exit.
///
/// Early successes (no update for the protected branch, branch
/// deletion, an empty range, or a range without any change records)
/// return [`PushDecision::allow`] without evaluating any policy.
///
/// # Errors
///
/// Propagates fatal errors from parsing, history queries, and the
/// classifier consistency check. A `Reject` is not an error.
pub fn check_push(
    input: &str,
    config: &HookConfig,
    history: &dyn HistoryQuery,
    transcript: &mut Transcript,
) -> Result<PushDecision> {
    let updates = refs::parse_ref_updates(input)?;
    let Some(update) = refs::protected_update(&updates, config) else {
        transcript.debug(format!(
            "no ref update targets the protected branch '{}'",
            config.branch
        ));
        return Ok(PushDecision::allow());
    };
    transcript.debug(format!(
        "checking {} -> {} on {}",
        update.from, update.to, update.ref_name
    ));

    let range = match CommitRange::resolve(update) {
        CommitRange::Deletion => {
            transcript.debug("branch deletion is always allowed");
            return Ok(PushDecision::allow());
        }
        range => range,
    };

    let ordered = history.rev_list(&range)?;
    transcript.trace(format!("{} commits in range", ordered.len()));
    if ordered.is_empty() {
        return Ok(PushDecision::allow());
    }

    let log = history.change_log(&range)?;
    let commits = classify::classify(&log, &ordered)?;
    if commits.iter().all(|c| c.operations.is_empty()) {
        transcript.debug("no change records in range, nothing to police");
        return Ok(PushDecision::allow());
    }

    let policy = policy::select(config)?;
    let verdicts = policy::evaluate(&commits, policy.as_ref(), config, history, transcript)?;
    let decision = decision::aggregate(&verdicts);
    if !decision.bad_commits.is_empty() {
        report::build_report(&decision, &commits, config, transcript);
    }
    Ok(decision)
}
