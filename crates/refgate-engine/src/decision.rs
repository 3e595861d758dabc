//! Verdict aggregation: per-commit verdicts to one push decision.

use refgate_core::{Outcome, PushDecision, Verdict};

/// Combine per-commit verdicts into the final decision.
///
/// `verdicts` arrives in internal order (newest first); the decision's
/// commit lists are reversed into push order (oldest first) for
/// reporting.
///
/// The decision law:
/// - no bad commits → `Allow`
/// - every bad commit exempted → `AllowReported`
/// - otherwise → `Reject`
///
/// # Examples
///
/// ```
/// use refgate_core::{Outcome, Verdict};
/// use refgate_engine::decision::aggregate;
///
/// let verdicts = vec![
///     ("b".to_string(), Verdict { bad: true, exempted: true }),
///     ("a".to_string(), Verdict { bad: false, exempted: false }),
/// ];
/// let decision = aggregate(&verdicts);
/// assert_eq!(decision.outcome, Outcome::AllowReported);
/// assert_eq!(decision.bad_commits, vec!["b"]);
/// ```
pub fn aggregate(verdicts: &[(String, Verdict)]) -> PushDecision {
    let mut bad_commits = Vec::new();
    let mut exempted_commits = Vec::new();
    for (hash, verdict) in verdicts.iter().rev() {
        if verdict.bad {
            bad_commits.push(hash.clone());
        }
        if verdict.exempted {
            exempted_commits.push(hash.clone());
        }
    }

    let outcome = if bad_commits.is_empty() {
        Outcome::Allow
    } else if bad_commits.len() == exempted_commits.len() {
        // exempted ⊆ bad holds by construction, so equal length means
        // every bad commit is exempted.
        Outcome::AllowReported
    } else {
        Outcome::Reject
    };

    PushDecision {
        outcome,
        bad_commits,
        exempted_commits,
    }
}
