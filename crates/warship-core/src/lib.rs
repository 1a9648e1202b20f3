//! Core types and configuration for warship.
//!
//! This crate turns raw action inputs ([`RawInputs`] + [`ActionContext`])
//! into a validated [`ResolvedConfiguration`], derives the image tag
//! ([`resolve_tag`]), and loads the optional `warship.toml` settings
//! ([`WarshipConfig`]).

pub mod config;
pub mod error;
pub mod inputs;
pub mod stamp;
pub mod tag;

pub use config::{PublishConfig, RuntimeConfig, WarshipConfig};
pub use error::{Error, Result, ValidationError};
pub use inputs::{ActionContext, RawInputs, ResolvedConfiguration, RuntimeSelector};
pub use stamp::RunStamp;
pub use tag::{CommitMessageSource, resolve_tag};

/// Name of the BuildKit build context that exposes the staged files
/// (`--build-context warship=<dir>`, `COPY --from=warship ...`).
pub const STAGE_CONTEXT: &str = "warship";
