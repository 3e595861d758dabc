//! Core types, configuration, and error handling for the refgate hook.
//!
//! This crate provides the shared foundation used by the engine and the
//! binary:
//! - [`GateError`] — unified error type using `thiserror`
//! - [`HookConfig`] — configuration read through a key-value lookup
//! - [`Transcript`] and [`Level`] — the leveled, append-only push report
//! - Data model: [`RefUpdate`], [`Commit`], [`ChangeOp`], [`Verdict`],
//!   [`PushDecision`]

mod config;
mod error;
mod transcript;
mod types;

pub use config::{HookConfig, PolicyChoice, CONFIG_SECTION};
pub use error::GateError;
pub use transcript::{Level, Message, Transcript};
pub use types::{
    ChangeKind, ChangeOp, Commit, Outcome, PushDecision, RefKind, RefUpdate, Verdict, ZERO_HASH,
};

/// A convenience `Result` type for refgate operations.
pub type Result<T> = std::result::Result<T, GateError>;
