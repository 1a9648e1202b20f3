//! Dockerfile generation, artifact staging, and commit lookup for warship.
//!
//! # Publish pipeline
//!
//! ```text
//! warship publish
//!   1. Resolve     ── inputs → ResolvedConfiguration (tag from ref / commit / stamp)
//!   2. Verify      ── docker manifest inspect <runtime image>
//!   3. Generate    ── RecipeGenerator::generate()
//!   4. Stage       ── Dockerfile (+ tomcat_start.sh) → $TMPDIR/<stamp>/
//!   5. Build       ── docker build --build-context warship=<stage> <workspace>
//!   6. Push        ── docker push <image>:<tag>
//! ```
//!
//! # Instruction order
//!
//! The Dockerfile is always emitted as: `FROM`, timezone, `EXPOSE`, extras
//! copy, startup hook, WAR copy. Things that rarely change come first so the
//! layer cache survives a new WAR, and the WAR copy comes last so nothing
//! can shadow it.

pub mod git;
pub mod recipe;
pub mod stage;

pub use git::GitHistory;
pub use recipe::{GeneratedRecipe, Instruction, Recipe, RecipeGenerator};
pub use stage::{StagedRecipe, stage};
