use std::io::Read;

use clap::Parser;
use miette::{Context, IntoDiagnostic, Result};

use refgate_core::{HookConfig, Level, Transcript};
use refgate_engine::dispatch::{self, Notification, Overrides};

use crate::git::GitHistory;
use crate::sinks::{deliver_or_warn, CommandSink};

mod git;
mod sinks;

const MANUAL: &str = "\
refgate - server-side push gatekeeper for one protected branch

Install as the repository's pre-receive hook. refgate reads the ref
updates of the incoming push from stdin, resolves the pushed commit
range on the protected branch, classifies every commit's change
operations, and accepts or rejects the push before it lands.

POLICIES
    additions-only   Only net-new files may land; any modification,
                     deletion, or rename of an existing path rejects
                     the commit. (default)
    size-limit       No single commit may add more than
                     refgate.max-commit-bytes bytes of new content.

A rejected commit can be exempted by including the configured override
token (refgate.commit-override-message) in its commit message. A push
whose offending commits are all exempted is accepted, but still
reported. For the size-limit policy the token template may contain
'{bytes}', replaced with the commit's actual added-byte count.

CONFIGURATION (git config, section 'refgate')
    master-branch-name        required; short or fully qualified
    policy                    additions-only | size-limit
    max-commit-bytes          byte threshold for size-limit
    commit-override-message   override-token template
    support-contact           shown in the rejection report
    log-command               shell command fed the transcript on stdin
    log-command-level         NOTICE | DEBUG | TRACE (default NOTICE)
    blocked-push-command      notified when a push is rejected
    unblocked-push-command    notified when a rejection was overridden

EXIT STATUS
    0 when the push is accepted, 1 when it is rejected or a fatal
    error occurred. --dry-run=1 downgrades a rejection to 0;
    --always-fail upgrades an acceptance to 1. Neither switch changes
    which notification command fires.
";

#[derive(Parser)]
#[command(
    name = "refgate",
    version,
    about = "Server-side push gatekeeper for one protected branch",
    long_about = "Pre-receive hook that polices pushes to one protected branch.\n\n\
                   Reads ref-update lines from stdin, classifies the pushed commits,\n\
                   and rejects the push when a commit violates the configured policy\n\
                   and does not carry the override token.\n\n\
                   See 'refgate --man' for policies and configuration keys."
)]
struct Cli {
    /// Evaluate normally but downgrade a rejection to success
    #[arg(
        long,
        value_name = "0|1",
        default_value_t = 0,
        value_parser = clap::value_parser!(u8).range(0..=1)
    )]
    dry_run: u8,

    /// Minimum severity printed to stderr (NOTICE, DEBUG, or TRACE)
    #[arg(long, value_name = "LEVEL", default_value = "NOTICE")]
    log_level: Level,

    /// Force a failing exit code even for an accepted push
    #[arg(long)]
    always_fail: bool,

    /// Print the extended manual and exit
    #[arg(long)]
    man: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.man {
        print!("{MANUAL}");
        return Ok(());
    }

    let repo = git2::Repository::open_from_env()
        .into_diagnostic()
        .context("refgate must run inside the repository being pushed to")?;
    let git_config = repo
        .config()
        .into_diagnostic()
        .context("failed to open the repository configuration")?;

    let mut transcript = Transcript::new();
    let config = match HookConfig::from_lookup(|key| git_config.get_string(key).ok()) {
        Ok(config) => config,
        Err(e) => {
            // No usable configuration, so no sinks either: stderr only.
            transcript.notice(format!("error: {e}"));
            flush(&transcript, cli.log_level, None, None);
            std::process::exit(1);
        }
    };

    let mut input = String::new();
    let plan = match std::io::stdin().read_to_string(&mut input) {
        Ok(_) => {
            let history = GitHistory::new();
            let overrides = Overrides {
                dry_run: cli.dry_run == 1,
                always_fail: cli.always_fail,
            };
            match refgate_engine::check_push(&input, &config, &history, &mut transcript) {
                Ok(decision) => dispatch::plan_exit(&decision, overrides, &mut transcript),
                Err(e) => {
                    transcript.notice(format!("error: {e}"));
                    dispatch::ExitPlan {
                        code: 1,
                        notification: None,
                    }
                }
            }
        }
        Err(e) => {
            transcript.notice(format!("error: could not read ref updates from stdin: {e}"));
            dispatch::ExitPlan {
                code: 1,
                notification: None,
            }
        }
    };

    flush(&transcript, cli.log_level, Some(&config), plan.notification);
    std::process::exit(plan.code);
}

/// Emit the transcript once: the filtered diagnostic stream on stderr,
/// then the configured sinks. Runs on every path, fatal ones included.
fn flush(
    transcript: &Transcript,
    min_level: Level,
    config: Option<&HookConfig>,
    notification: Option<Notification>,
) {
    for line in transcript.tagged_lines(min_level) {
        eprintln!("{line}");
    }

    let Some(config) = config else {
        return;
    };
    if let Some(command) = config.log_command.as_deref() {
        deliver_or_warn(
            &CommandSink::new(command),
            &transcript.lines(config.log_command_level),
        );
    }
    let notify_command = match notification {
        Some(Notification::Blocked) => config.blocked_push_command.as_deref(),
        Some(Notification::Unblocked) => config.unblocked_push_command.as_deref(),
        None => None,
    };
    if let Some(command) = notify_command {
        deliver_or_warn(&CommandSink::new(command), &transcript.lines(Level::Notice));
    }
}
