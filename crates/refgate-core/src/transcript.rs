use std::fmt;
use std::str::FromStr;

/// Severity level for transcript messages and diagnostic filtering.
///
/// Levels form a total order: Notice > Debug > Trace. Filtering keeps a
/// message when its level is at least as severe as the threshold.
///
/// # Examples
///
/// ```
/// use refgate_core::Level;
///
/// let level: Level = "DEBUG".parse().unwrap();
/// assert_eq!(level, Level::Debug);
/// assert!(Level::Notice.meets_threshold(Level::Debug));
/// assert!(!Level::Trace.meets_threshold(Level::Debug));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Level {
    /// User-facing report lines; always shown.
    #[default]
    Notice,
    /// Per-stage progress detail.
    Debug,
    /// Raw inputs and intermediate state.
    Trace,
}

impl Level {
    /// Returns `true` if `self` is at least as severe as `threshold`.
    ///
    /// # Examples
    ///
    /// ```
    /// use refgate_core::Level;
    ///
    /// assert!(Level::Notice.meets_threshold(Level::Trace));
    /// assert!(Level::Debug.meets_threshold(Level::Debug));
    /// assert!(!Level::Debug.meets_threshold(Level::Notice));
    /// ```
    pub fn meets_threshold(self, threshold: Level) -> bool {
        self.rank() <= threshold.rank()
    }

    fn rank(self) -> u8 {
        match self {
            Level::Notice => 0,
            Level::Debug => 1,
            Level::Trace => 2,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Notice => write!(f, "NOTICE"),
            Level::Debug => write!(f, "DEBUG"),
            Level::Trace => write!(f, "TRACE"),
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NOTICE" => Ok(Level::Notice),
            "DEBUG" => Ok(Level::Debug),
            "TRACE" => Ok(Level::Trace),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// A single transcript line with its severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Severity of this line.
    pub level: Level,
    /// The line itself, without a trailing newline.
    pub text: String,
}

/// The append-only, ordered push report.
///
/// Every stage of the engine appends to one transcript value; the
/// dispatcher flushes it exactly once at process exit. There is no
/// process-wide accumulator.
///
/// # Examples
///
/// ```
/// use refgate_core::{Level, Transcript};
///
/// let mut transcript = Transcript::new();
/// transcript.notice("push rejected");
/// transcript.debug("2 commits inspected");
///
/// assert_eq!(transcript.lines(Level::Notice), vec!["push rejected"]);
/// assert_eq!(transcript.lines(Level::Debug).len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a NOTICE line.
    pub fn notice(&mut self, text: impl Into<String>) {
        self.push(Level::Notice, text);
    }

    /// Append a DEBUG line.
    pub fn debug(&mut self, text: impl Into<String>) {
        self.push(Level::Debug, text);
    }

    /// Append a TRACE line.
    pub fn trace(&mut self, text: impl Into<String>) {
        self.push(Level::Trace, text);
    }

    fn push(&mut self, level: Level, text: impl Into<String>) {
        self.messages.push(Message {
            level,
            text: text.into(),
        });
    }

    /// All messages in append order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Plain text lines at or above `threshold`, in append order.
    pub fn lines(&self, threshold: Level) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|m| m.level.meets_threshold(threshold))
            .map(|m| m.text.as_str())
            .collect()
    }

    /// Severity-tagged rendering for the local diagnostic stream.
    pub fn tagged_lines(&self, threshold: Level) -> Vec<String> {
        self.messages
            .iter()
            .filter(|m| m.level.meets_threshold(threshold))
            .map(|m| format!("{}: {}", m.level, m.text))
            .collect()
    }

    /// `true` when nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
