//! Transcript delivery to configured shell commands.

use std::io::Write;
use std::process::{Command, Stdio};

use refgate_core::{GateError, Result};
use refgate_engine::dispatch::Sink;

/// A shell command that receives transcript lines on stdin.
pub struct CommandSink<'a> {
    command: &'a str,
}

impl<'a> CommandSink<'a> {
    pub fn new(command: &'a str) -> Self {
        Self { command }
    }
}

impl Sink for CommandSink<'_> {
    fn deliver(&self, lines: &[&str]) -> Result<()> {
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|e| GateError::Sink(format!("could not start '{}': {e}", self.command)))?;

        if let Some(stdin) = child.stdin.as_mut() {
            for line in lines {
                writeln!(stdin, "{line}")
                    .map_err(|e| GateError::Sink(format!("write to '{}': {e}", self.command)))?;
            }
        }
        drop(child.stdin.take());

        let status = child
            .wait()
            .map_err(|e| GateError::Sink(format!("wait on '{}': {e}", self.command)))?;
        if !status.success() {
            return Err(GateError::Sink(format!(
                "'{}' exited with {status}",
                self.command
            )));
        }
        Ok(())
    }
}

/// Deliver best-effort: a sink failure becomes a local warning and never
/// changes the push decision.
pub fn deliver_or_warn(sink: &dyn Sink, lines: &[&str]) {
    if lines.is_empty() {
        return;
    }
    if let Err(e) = sink.deliver(lines) {
        eprintln!("warning: {e}");
    }
}
