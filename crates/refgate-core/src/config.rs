use std::fmt;
use std::str::FromStr;

use crate::error::GateError;
use crate::transcript::Level;

/// Git-config section all hook keys live under.
pub const CONFIG_SECTION: &str = "refgate";

/// Which bad-commit predicate the engine runs.
///
/// # Examples
///
/// ```
/// use refgate_core::PolicyChoice;
///
/// let choice: PolicyChoice = "size-limit".parse().unwrap();
/// assert_eq!(choice, PolicyChoice::SizeLimit);
/// assert_eq!(PolicyChoice::default(), PolicyChoice::AdditionsOnly);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PolicyChoice {
    /// Only net-new paths are allowed on the protected branch.
    #[default]
    AdditionsOnly,
    /// No commit may add more than a configured number of bytes.
    SizeLimit,
}

impl fmt::Display for PolicyChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyChoice::AdditionsOnly => write!(f, "additions-only"),
            PolicyChoice::SizeLimit => write!(f, "size-limit"),
        }
    }
}

impl FromStr for PolicyChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "additions-only" => Ok(PolicyChoice::AdditionsOnly),
            "size-limit" => Ok(PolicyChoice::SizeLimit),
            other => Err(format!("unknown policy: {other}")),
        }
    }
}

/// Typed hook configuration, read from git config.
///
/// The engine never touches git config directly; the binary passes a
/// lookup closure over `git2::Config` and tests pass one over a map.
/// All keys live in the [`CONFIG_SECTION`] section, e.g.
/// `refgate.master-branch-name`.
///
/// # Examples
///
/// ```
/// use refgate_core::HookConfig;
///
/// let config = HookConfig::from_lookup(|key| match key {
///     "refgate.master-branch-name" => Some("main".into()),
///     _ => None,
/// })
/// .unwrap();
/// assert_eq!(config.branch, "main");
/// assert!(config.override_message.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookConfig {
    /// The single protected branch this hook polices. Required.
    pub branch: String,
    /// Which policy variant to run.
    pub policy: PolicyChoice,
    /// Byte threshold for the size-limit policy.
    pub max_commit_bytes: Option<u64>,
    /// Override-token template; its presence enables exemption.
    pub override_message: Option<String>,
    /// Contact shown in the guidance text.
    pub support_contact: Option<String>,
    /// Shell command receiving the transcript for logging.
    pub log_command: Option<String>,
    /// Minimum severity forwarded to the log command.
    pub log_command_level: Level,
    /// Shell command notified when a push is rejected.
    pub blocked_push_command: Option<String>,
    /// Shell command notified when a rejection was overridden.
    pub unblocked_push_command: Option<String>,
}

impl HookConfig {
    /// Build the configuration through a key-value lookup.
    ///
    /// The lookup receives fully qualified key names and returns the
    /// configured value, if any.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Config`] when `master-branch-name` is
    /// missing, when `policy` or `log-command-level` do not parse, or
    /// when the size-limit policy is selected without a usable
    /// `max-commit-bytes`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GateError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(&format!("{CONFIG_SECTION}.{name}"));

        let branch = get("master-branch-name")
            .ok_or_else(|| GateError::Config("master-branch-name is not set".into()))?;

        let policy = match get("policy") {
            Some(raw) => raw.parse::<PolicyChoice>().map_err(GateError::Config)?,
            None => PolicyChoice::default(),
        };

        let max_commit_bytes = match get("max-commit-bytes") {
            Some(raw) => Some(raw.parse::<u64>().map_err(|_| {
                GateError::Config(format!("max-commit-bytes is not a byte count: {raw}"))
            })?),
            None => None,
        };
        if policy == PolicyChoice::SizeLimit && max_commit_bytes.is_none() {
            return Err(GateError::Config(
                "size-limit policy selected but max-commit-bytes is not set".into(),
            ));
        }

        let log_command_level = match get("log-command-level") {
            Some(raw) => raw.parse::<Level>().map_err(GateError::Config)?,
            None => Level::default(),
        };

        Ok(Self {
            branch,
            policy,
            max_commit_bytes,
            override_message: get("commit-override-message"),
            support_contact: get("support-contact"),
            log_command: get("log-command"),
            log_command_level,
            blocked_push_command: get("blocked-push-command"),
            unblocked_push_command: get("unblocked-push-command"),
        })
    }

    /// `true` when `ref_name` names the protected branch.
    ///
    /// The branch may be configured short (`main`) or fully qualified
    /// (`refs/heads/main`); both forms match. Tags never match.
    ///
    /// # Examples
    ///
    /// ```
    /// use refgate_core::HookConfig;
    ///
    /// let config = HookConfig::from_lookup(|key| {
    ///     (key == "refgate.master-branch-name").then(|| "main".to_string())
    /// })
    /// .unwrap();
    /// assert!(config.protects("refs/heads/main"));
    /// assert!(!config.protects("refs/heads/develop"));
    /// assert!(!config.protects("refs/tags/main"));
    /// ```
    pub fn protects(&self, ref_name: &str) -> bool {
        match ref_name.strip_prefix("refs/heads/") {
            Some(short) => short == self.branch || ref_name == self.branch,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (format!("refgate.{k}"), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = HookConfig::from_lookup(lookup_from(&[("master-branch-name", "main")])).unwrap();
        assert_eq!(config.branch, "main");
        assert_eq!(config.policy, PolicyChoice::AdditionsOnly);
        assert_eq!(config.log_command_level, Level::Notice);
        assert!(config.max_commit_bytes.is_none());
        assert!(config.override_message.is_none());
        assert!(config.support_contact.is_none());
        assert!(config.log_command.is_none());
        assert!(config.blocked_push_command.is_none());
        assert!(config.unblocked_push_command.is_none());
    }

    #[test]
    fn missing_branch_name_is_fatal() {
        let err = HookConfig::from_lookup(|_| None).unwrap_err();
        assert!(err.to_string().contains("master-branch-name"));
    }

    #[test]
    fn full_config_parses() {
        let config = HookConfig::from_lookup(lookup_from(&[
            ("master-branch-name", "release"),
            ("policy", "size-limit"),
            ("max-commit-bytes", "4096"),
            ("commit-override-message", "OVERRIDE {bytes}"),
            ("support-contact", "ops@example.com"),
            ("log-command", "logger -t refgate"),
            ("log-command-level", "trace"),
            ("blocked-push-command", "notify blocked"),
            ("unblocked-push-command", "notify unblocked"),
        ]))
        .unwrap();

        assert_eq!(config.policy, PolicyChoice::SizeLimit);
        assert_eq!(config.max_commit_bytes, Some(4096));
        assert_eq!(config.override_message.as_deref(), Some("OVERRIDE {bytes}"));
        assert_eq!(config.log_command_level, Level::Trace);
    }

    #[test]
    fn size_limit_without_threshold_is_fatal() {
        let err = HookConfig::from_lookup(lookup_from(&[
            ("master-branch-name", "main"),
            ("policy", "size-limit"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("max-commit-bytes"));
    }

    #[test]
    fn bad_threshold_is_fatal() {
        let err = HookConfig::from_lookup(lookup_from(&[
            ("master-branch-name", "main"),
            ("max-commit-bytes", "lots"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("byte count"));
    }

    #[test]
    fn unknown_policy_is_fatal() {
        let err = HookConfig::from_lookup(lookup_from(&[
            ("master-branch-name", "main"),
            ("policy", "append-only"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("unknown policy"));
    }

    #[test]
    fn protects_matches_short_and_full_names() {
        let config =
            HookConfig::from_lookup(lookup_from(&[("master-branch-name", "main")])).unwrap();
        assert!(config.protects("refs/heads/main"));
        assert!(!config.protects("refs/heads/mainline"));
        assert!(!config.protects("refs/tags/main"));

        let qualified = HookConfig::from_lookup(lookup_from(&[(
            "master-branch-name",
            "refs/heads/main",
        )]))
        .unwrap();
        assert!(qualified.protects("refs/heads/main"));
    }
}
