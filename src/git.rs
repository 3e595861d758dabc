//! `HistoryQuery` backed by `git` subprocesses.
//!
//! The hook runs with the repository as its working directory, so plain
//! `git` invocations resolve the right object store without any path
//! plumbing.

use std::process::Command;

use refgate_core::{GateError, Result};
use refgate_engine::{CommitRange, HistoryQuery};

/// The subprocess-backed history of the repository being pushed to.
#[derive(Debug, Default)]
pub struct GitHistory;

impl GitHistory {
    pub fn new() -> Self {
        Self
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .output()
            .map_err(|e| GateError::Git(format!("failed to run git {}: {e}", args[0])))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GateError::Git(format!(
                "git {} failed: {}",
                args[0],
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn blob_size(&self, object: &str) -> Result<u64> {
        let raw = self.git(&["cat-file", "-s", object])?;
        raw.trim()
            .parse::<u64>()
            .map_err(|_| GateError::Git(format!("cat-file -s returned no size for {object}")))
    }
}

impl HistoryQuery for GitHistory {
    fn rev_list(&self, range: &CommitRange) -> Result<Vec<String>> {
        let Some(spec) = range.rev_spec() else {
            return Ok(Vec::new());
        };
        let out = self.git(&["rev-list", &spec])?;
        Ok(out.lines().map(str::to_string).collect())
    }

    fn change_log(&self, range: &CommitRange) -> Result<String> {
        let Some(spec) = range.rev_spec() else {
            return Ok(String::new());
        };
        // One bare-hash header per commit followed by its name-status
        // records, newest first, matching rev-list order.
        self.git(&[
            "log",
            "--format=%H",
            "--name-status",
            "--find-renames",
            "--find-copies",
            &spec,
        ])
    }

    fn commit_message(&self, hash: &str) -> Result<String> {
        self.git(&["log", "-1", "--format=%B", hash])
    }

    fn added_bytes(&self, hash: &str) -> Result<u64> {
        let raw = self.git(&["diff-tree", "-r", "--root", "--no-commit-id", hash])?;
        sum_added_bytes(&raw, |object| self.blob_size(object))
    }
}

const NULL_OBJECT: &str = "0000000000000000000000000000000000000000";

/// Sum the positive blob-size deltas of one raw diff-tree listing.
///
/// Each entry reads `:<oldmode> <newmode> <oldsha> <newsha> <status>\t<path>`.
/// Deletions are skipped entirely; for the rest the growth over the old
/// blob counts, never shrinkage.
fn sum_added_bytes<F>(raw: &str, mut size_of: F) -> Result<u64>
where
    F: FnMut(&str) -> Result<u64>,
{
    let mut total = 0u64;
    for line in raw.lines() {
        let Some(entry) = line.strip_prefix(':') else {
            continue;
        };
        let mut fields = entry.split_whitespace();
        let (Some(_old_mode), Some(_new_mode), Some(old_sha), Some(new_sha), Some(status)) = (
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
        ) else {
            continue;
        };
        if status.starts_with('D') {
            continue;
        }
        let new_size = size_of(new_sha)?;
        let old_size = if old_sha == NULL_OBJECT {
            0
        } else {
            size_of(old_sha)?
        };
        total += new_size.saturating_sub(old_size);
    }
    Ok(total)
}
