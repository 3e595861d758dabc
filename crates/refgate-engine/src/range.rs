//! Commit-range resolution from one ref update.

use refgate_core::RefUpdate;

/// The commit range a ref update asks the server to accept.
///
/// # Examples
///
/// ```
/// use refgate_core::{RefKind, RefUpdate, ZERO_HASH};
/// use refgate_engine::CommitRange;
///
/// let update = RefUpdate {
///     from: ZERO_HASH.into(),
///     to: "1111111111111111111111111111111111111111".into(),
///     ref_name: "refs/heads/main".into(),
///     kind: RefKind::Branch,
/// };
/// let range = CommitRange::resolve(&update);
/// assert_eq!(range.rev_spec().as_deref(),
///            Some("1111111111111111111111111111111111111111"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitRange {
    /// The branch is being deleted; there is nothing to inspect.
    Deletion,
    /// The branch is being created; the range is the full ancestry of
    /// the new tip.
    Creation {
        /// The new tip.
        to: String,
    },
    /// An existing branch moves; the range is `from..to`.
    Span {
        /// The old tip, excluded along with its ancestry.
        from: String,
        /// The new tip.
        to: String,
    },
}

impl CommitRange {
    /// Classify `update` by its zero-hash sentinels.
    pub fn resolve(update: &RefUpdate) -> Self {
        if update.is_delete() {
            CommitRange::Deletion
        } else if update.is_create() {
            CommitRange::Creation {
                to: update.to.clone(),
            }
        } else {
            CommitRange::Span {
                from: update.from.clone(),
                to: update.to.clone(),
            }
        }
    }

    /// The revision specification both history queries run with, or
    /// `None` for a deletion.
    pub fn rev_spec(&self) -> Option<String> {
        match self {
            CommitRange::Deletion => None,
            CommitRange::Creation { to } => Some(to.clone()),
            CommitRange::Span { from, to } => Some(format!("{from}..{to}")),
        }
    }
}
