//! Outcome dispatch: exit code, test-mode overrides, and the sink
//! capability.

use refgate_core::{Outcome, PushDecision, Result, Transcript};

/// Test-mode switches applied once at the single exit point.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    /// Downgrade any would-fail result to success.
    pub dry_run: bool,
    /// Upgrade any would-succeed result to failure.
    pub always_fail: bool,
}

/// Which notification path to fire, derived from the original decision
/// and never from the overridden one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// A push was rejected.
    Blocked,
    /// A rejection was fully overridden and the push went through.
    Unblocked,
}

/// The process result for one push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitPlan {
    /// The final exit code after overrides.
    pub code: i32,
    /// The notification path the original decision selects.
    pub notification: Option<Notification>,
}

/// Map the decision to an exit plan, applying the overrides.
///
/// Notification routing always reflects the original decision; only the
/// exit code is overridden. A dry-run downgrade leaves a note in the
/// transcript so the report explains the unexpected success.
///
/// # Examples
///
/// ```
/// use refgate_core::{PushDecision, Transcript};
/// use refgate_engine::dispatch::{plan_exit, Overrides};
///
/// let plan = plan_exit(
///     &PushDecision::allow(),
///     Overrides::default(),
///     &mut Transcript::new(),
/// );
/// assert_eq!(plan.code, 0);
/// assert!(plan.notification.is_none());
/// ```
pub fn plan_exit(
    decision: &PushDecision,
    overrides: Overrides,
    transcript: &mut Transcript,
) -> ExitPlan {
    let notification = match decision.outcome {
        Outcome::Allow => None,
        Outcome::AllowReported => Some(Notification::Unblocked),
        Outcome::Reject => Some(Notification::Blocked),
    };

    let mut code = if decision.outcome.is_success() { 0 } else { 1 };
    if overrides.dry_run && code != 0 {
        transcript.notice("dry-run mode: the rejection above was downgraded to success.");
        code = 0;
    }
    if overrides.always_fail && code == 0 {
        code = 1;
    }

    ExitPlan { code, notification }
}

/// An external process that receives transcript content.
///
/// Delivery is best-effort by contract: callers downgrade any error to
/// a local warning and never let it change the decision or exit code.
pub trait Sink {
    /// Hand the given transcript lines to the sink.
    fn deliver(&self, lines: &[&str]) -> Result<()>;
}
