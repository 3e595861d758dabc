use std::fmt;

/// The all-zero hash git uses to mean "this ref does not exist".
pub const ZERO_HASH: &str = "0000000000000000000000000000000000000000";

/// Whether a ref update targets a branch or a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// A `refs/heads/...` ref.
    Branch,
    /// A `refs/tags/...` ref.
    Tag,
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefKind::Branch => write!(f, "branch"),
            RefKind::Tag => write!(f, "tag"),
        }
    }
}

/// One ref update as submitted by the pushing client.
///
/// Immutable once parsed. Hashes are 40 hex digits; [`ZERO_HASH`] marks
/// a ref that did not exist before (creation) or will not exist after
/// (deletion).
///
/// # Examples
///
/// ```
/// use refgate_core::{RefKind, RefUpdate, ZERO_HASH};
///
/// let update = RefUpdate {
///     from: ZERO_HASH.into(),
///     to: "1111111111111111111111111111111111111111".into(),
///     ref_name: "refs/heads/main".into(),
///     kind: RefKind::Branch,
/// };
/// assert!(update.is_create());
/// assert!(!update.is_delete());
/// assert_eq!(update.short_name(), "main");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefUpdate {
    /// Hash the ref pointed at before the push.
    pub from: String,
    /// Hash the ref will point at after the push.
    pub to: String,
    /// Full ref name, e.g. `refs/heads/main`.
    pub ref_name: String,
    /// Branch or tag.
    pub kind: RefKind,
}

impl RefUpdate {
    /// `true` when the ref did not exist before the push.
    pub fn is_create(&self) -> bool {
        self.from == ZERO_HASH
    }

    /// `true` when the push deletes the ref.
    pub fn is_delete(&self) -> bool {
        self.to == ZERO_HASH
    }

    /// The name with the `refs/heads/` or `refs/tags/` prefix stripped.
    pub fn short_name(&self) -> &str {
        self.ref_name
            .strip_prefix("refs/heads/")
            .or_else(|| self.ref_name.strip_prefix("refs/tags/"))
            .unwrap_or(&self.ref_name)
    }
}

/// Classification of one change record within a commit.
///
/// # Examples
///
/// ```
/// use refgate_core::ChangeKind;
///
/// assert_eq!(ChangeKind::from_letter('M'), Some(ChangeKind::Modify));
/// assert_eq!(ChangeKind::Rename.letter(), 'R');
/// assert!(ChangeKind::Copy.is_additive());
/// assert!(!ChangeKind::Delete.is_additive());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// A new path was added.
    Add,
    /// A path was copied to a new path.
    Copy,
    /// An existing path was removed.
    Delete,
    /// An existing path was changed in place.
    Modify,
    /// An existing path was moved.
    Rename,
}

impl ChangeKind {
    /// Map a status letter from the change log to a kind.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'A' => Some(ChangeKind::Add),
            'C' => Some(ChangeKind::Copy),
            'D' => Some(ChangeKind::Delete),
            'M' => Some(ChangeKind::Modify),
            'R' => Some(ChangeKind::Rename),
            _ => None,
        }
    }

    /// The status letter used in the change log.
    pub fn letter(self) -> char {
        match self {
            ChangeKind::Add => 'A',
            ChangeKind::Copy => 'C',
            ChangeKind::Delete => 'D',
            ChangeKind::Modify => 'M',
            ChangeKind::Rename => 'R',
        }
    }

    /// `true` for operations that only introduce net-new paths.
    pub fn is_additive(self) -> bool {
        matches!(self, ChangeKind::Add | ChangeKind::Copy)
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Add => write!(f, "add"),
            ChangeKind::Copy => write!(f, "copy"),
            ChangeKind::Delete => write!(f, "delete"),
            ChangeKind::Modify => write!(f, "modify"),
            ChangeKind::Rename => write!(f, "rename"),
        }
    }
}

/// One change operation inside a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeOp {
    /// What happened to the path.
    pub kind: ChangeKind,
    /// The affected path as printed in the change log.
    pub path: String,
    /// Bytes of new content this operation added, when the log carried
    /// sizes. `None` for plain status records.
    pub byte_delta: Option<u64>,
}

impl ChangeOp {
    /// A plain status record without size information.
    pub fn new(kind: ChangeKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            byte_delta: None,
        }
    }
}

/// A commit in the pushed range with its ordered change operations.
///
/// Built incrementally by the classifier and finalized when the next
/// commit header or end-of-input is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Full 40-hex commit hash.
    pub hash: String,
    /// Change operations in log order.
    pub operations: Vec<ChangeOp>,
}

impl Commit {
    /// A commit with no operations recorded yet.
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            operations: Vec::new(),
        }
    }
}

/// Per-commit policy result, computed once and immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    /// The policy marked this commit bad.
    pub bad: bool,
    /// The override token exempted this commit. Only ever set for bad
    /// commits.
    pub exempted: bool,
}

/// Final classification of the whole push.
///
/// # Examples
///
/// ```
/// use refgate_core::Outcome;
///
/// assert!(Outcome::Allow.is_success());
/// assert!(Outcome::AllowReported.is_success());
/// assert!(!Outcome::Reject.is_success());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No commit violated the policy.
    Allow,
    /// Every violating commit carried the override token.
    AllowReported,
    /// At least one violating commit was not exempted.
    Reject,
}

impl Outcome {
    /// `true` when the push is accepted.
    pub fn is_success(self) -> bool {
        !matches!(self, Outcome::Reject)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Allow => write!(f, "allowed"),
            Outcome::AllowReported => write!(f, "allowed with report"),
            Outcome::Reject => write!(f, "rejected"),
        }
    }
}

/// The aggregated decision for one push.
///
/// `bad_commits` and `exempted_commits` are kept in push order (oldest
/// first), the order used for reporting. Exempted commits are always a
/// subset of bad commits; exemption affects the outcome, not the
/// bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushDecision {
    /// Allow, allow-with-report, or reject.
    pub outcome: Outcome,
    /// Hashes of commits the policy marked bad, in push order.
    pub bad_commits: Vec<String>,
    /// Hashes of bad commits the override token exempted, in push order.
    pub exempted_commits: Vec<String>,
}

impl PushDecision {
    /// The decision for a push with nothing to police.
    pub fn allow() -> Self {
        Self {
            outcome: Outcome::Allow,
            bad_commits: Vec::new(),
            exempted_commits: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_hash_is_forty_zeros() {
        assert_eq!(ZERO_HASH.len(), 40);
        assert!(ZERO_HASH.chars().all(|c| c == '0'));
    }

    #[test]
    fn ref_update_sentinel_checks() {
        let update = RefUpdate {
            from: "1111111111111111111111111111111111111111".into(),
            to: ZERO_HASH.into(),
            ref_name: "refs/heads/main".into(),
            kind: RefKind::Branch,
        };
        assert!(update.is_delete());
        assert!(!update.is_create());
    }

    #[test]
    fn short_name_strips_both_prefixes() {
        let branch = RefUpdate {
            from: ZERO_HASH.into(),
            to: ZERO_HASH.into(),
            ref_name: "refs/heads/release/v2".into(),
            kind: RefKind::Branch,
        };
        assert_eq!(branch.short_name(), "release/v2");

        let tag = RefUpdate {
            ref_name: "refs/tags/v1.0".into(),
            kind: RefKind::Tag,
            ..branch
        };
        assert_eq!(tag.short_name(), "v1.0");
    }

    #[test]
    fn change_kind_letter_roundtrip() {
        for kind in [
            ChangeKind::Add,
            ChangeKind::Copy,
            ChangeKind::Delete,
            ChangeKind::Modify,
            ChangeKind::Rename,
        ] {
            assert_eq!(ChangeKind::from_letter(kind.letter()), Some(kind));
        }
        assert_eq!(ChangeKind::from_letter('T'), None);
    }

    #[test]
    fn only_add_and_copy_are_additive() {
        assert!(ChangeKind::Add.is_additive());
        assert!(ChangeKind::Copy.is_additive());
        assert!(!ChangeKind::Delete.is_additive());
        assert!(!ChangeKind::Modify.is_additive());
        assert!(!ChangeKind::Rename.is_additive());
    }

    #[test]
    fn outcome_success_mapping() {
        assert!(Outcome::Allow.is_success());
        assert!(Outcome::AllowReported.is_success());
        assert!(!Outcome::Reject.is_success());
    }

    #[test]
    fn allow_decision_is_empty() {
        let decision = PushDecision::allow();
        assert_eq!(decision.outcome, Outcome::Allow);
        assert!(decision.bad_commits.is_empty());
        assert!(decision.exempted_commits.is_empty());
    }
}
