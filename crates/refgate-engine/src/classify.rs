//! The streaming change-log parser.
//!
//! Turns the interleaved header/record text of the detailed change log
//! into one [`Commit`] per entry of the ordered commit list, with a
//! hard consistency postcondition.

use std::collections::HashSet;

use refgate_core::{ChangeKind, ChangeOp, Commit, GateError, Result};

/// Parse the change-log text into commits, in encounter order.
///
/// A line is treated as a commit header iff it exactly matches an entry
/// of `ordered` — membership in the precomputed hash set, not line
/// position, is what separates headers from message-body text. A
/// message line that happens to equal another in-range commit's hash
/// will still misparse; this is a known limitation, detected by the
/// count check below rather than worked around.
///
/// Change records are `<letter><whitespace><path>` with
/// `letter ∈ {A,C,D,M,R}`; rename and copy records may carry a
/// similarity score between the letter and the path (`R100	old	new`).
/// Any other line is ignored.
///
/// # Errors
///
/// Returns [`GateError::Internal`] when the number of headers seen does
/// not equal `ordered.len()`. This guards against the history-query
/// output format changing underneath the parser and is fatal regardless
/// of any policy outcome.
///
/// # Examples
///
/// ```
/// use refgate_engine::classify::classify;
///
/// let hash = "1111111111111111111111111111111111111111".to_string();
/// let log = format!("{hash}\n\n    add readme\n\nA\tREADME.md\n");
/// let commits = classify(&log, &[hash.clone()]).unwrap();
/// assert_eq!(commits[0].hash, hash);
/// assert_eq!(commits[0].operations.len(), 1);
/// ```
pub fn classify(log: &str, ordered: &[String]) -> Result<Vec<Commit>> {
    let headers: HashSet<&str> = ordered.iter().map(String::as_str).collect();

    let mut commits: Vec<Commit> = Vec::new();
    let mut current: Option<Commit> = None;
    let mut seen = 0usize;

    for line in log.lines() {
        if headers.contains(line) {
            if let Some(done) = current.take() {
                commits.push(done);
            }
            current = Some(Commit::new(line));
            seen += 1;
            continue;
        }

        if let Some(commit) = current.as_mut() {
            if let Some(op) = parse_record(line) {
                commit.operations.push(op);
            }
        }
    }
    if let Some(done) = current.take() {
        commits.push(done);
    }

    if seen != ordered.len() {
        return Err(GateError::Internal(format!(
            "change log produced {seen} commits but rev-list returned {}",
            ordered.len()
        )));
    }

    Ok(commits)
}

fn parse_record(line: &str) -> Option<ChangeOp> {
    let mut chars = line.chars();
    let kind = ChangeKind::from_letter(chars.next()?)?;

    // Strip an optional similarity score ("R100", "C75").
    let rest = chars.as_str().trim_start_matches(|c: char| c.is_ascii_digit());
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let path = rest.trim_start();
    if path.is_empty() {
        return None;
    }
    Some(ChangeOp::new(kind, path))
}
