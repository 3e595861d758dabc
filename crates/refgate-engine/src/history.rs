//! The history-query capability the engine depends on.
//!
//! The engine never invokes git itself; it consumes the text contracts
//! of two range queries plus two per-commit lookups. The binary
//! implements this with `git` subprocesses, tests with
//! [`ScriptedHistory`].

use std::collections::HashMap;

use refgate_core::{GateError, Result};

use crate::range::CommitRange;

/// Read access to the commit history of the pushed range.
///
/// All calls are blocking and may hang if the underlying query hangs;
/// the engine imposes no timeout.
pub trait HistoryQuery {
    /// The commits in `range`, newest first.
    fn rev_list(&self, range: &CommitRange) -> Result<Vec<String>>;

    /// The detailed change log for the same range in the same order:
    /// for each commit one header line equal to its hash, followed by
    /// its change records and possibly free-text message lines.
    fn change_log(&self, range: &CommitRange) -> Result<String>;

    /// The full message of one commit.
    fn commit_message(&self, hash: &str) -> Result<String>;

    /// Bytes of new content one commit adds over its non-deletion
    /// operations.
    fn added_bytes(&self, hash: &str) -> Result<u64>;
}

/// An in-memory [`HistoryQuery`] fed with canned responses.
///
/// # Examples
///
/// ```
/// use refgate_engine::{CommitRange, HistoryQuery, ScriptedHistory};
///
/// let history = ScriptedHistory::new(
///     vec!["1111111111111111111111111111111111111111".into()],
///     "1111111111111111111111111111111111111111\nA\tREADME.md\n",
/// );
/// let range = CommitRange::Creation {
///     to: "1111111111111111111111111111111111111111".into(),
/// };
/// assert_eq!(history.rev_list(&range).unwrap().len(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct ScriptedHistory {
    rev_list: Vec<String>,
    change_log: String,
    messages: HashMap<String, String>,
    sizes: HashMap<String, u64>,
}

impl ScriptedHistory {
    /// Script the two range queries.
    pub fn new(rev_list: Vec<String>, change_log: impl Into<String>) -> Self {
        Self {
            rev_list,
            change_log: change_log.into(),
            messages: HashMap::new(),
            sizes: HashMap::new(),
        }
    }

    /// Script the message returned for one commit.
    pub fn with_message(mut self, hash: impl Into<String>, message: impl Into<String>) -> Self {
        self.messages.insert(hash.into(), message.into());
        self
    }

    /// Script the added-byte count returned for one commit.
    pub fn with_added_bytes(mut self, hash: impl Into<String>, bytes: u64) -> Self {
        self.sizes.insert(hash.into(), bytes);
        self
    }
}

impl HistoryQuery for ScriptedHistory {
    fn rev_list(&self, _range: &CommitRange) -> Result<Vec<String>> {
        Ok(self.rev_list.clone())
    }

    fn change_log(&self, _range: &CommitRange) -> Result<String> {
        Ok(self.change_log.clone())
    }

    fn commit_message(&self, hash: &str) -> Result<String> {
        Ok(self.messages.get(hash).cloned().unwrap_or_default())
    }

    fn added_bytes(&self, hash: &str) -> Result<u64> {
        self.sizes
            .get(hash)
            .copied()
            .ok_or_else(|| GateError::Git(format!("no scripted size for {hash}")))
    }
}
