//! Image tag derivation.
//!
//! Precedence:
//! 1. explicit `tag-name` (a `refs/heads/*`, `refs/pull/*/merge` or
//!    `refs/tags/*` ref is reduced to its short name, anything else is
//!    used verbatim)
//! 2. `[tag-name=VALUE]` in the latest commit message, push events only
//! 3. the run stamp

use std::sync::LazyLock;

use regex::Regex;

use crate::stamp::RunStamp;

static REF_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"^refs/heads/(.*)$").expect("valid ref pattern"),
        Regex::new(r"^refs/pull/([^/]+)/merge$").expect("valid ref pattern"),
        Regex::new(r"^refs/tags/(.*)$").expect("valid ref pattern"),
    ]
});

static COMMIT_ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[tag-name=([^\]]+)\]").expect("valid annotation pattern")
});

const PUSH_EVENT: &str = "push";

/// Source of the most recent commit message.
#[cfg_attr(test, mockall::automock)]
pub trait CommitMessageSource {
    /// `None` when no message can be retrieved.
    fn latest_commit_message(&self) -> Option<String>;
}

/// Resolve the tag for the published image.
pub fn resolve_tag(
    explicit_tag: Option<&str>,
    event_name: Option<&str>,
    commits: &dyn CommitMessageSource,
    stamp: RunStamp,
) -> String {
    if let Some(tag) = explicit_tag.map(str::trim).filter(|t| !t.is_empty()) {
        return short_ref_name(tag).to_owned();
    }

    if event_name == Some(PUSH_EVENT) {
        if let Some(tag) = commits
            .latest_commit_message()
            .as_deref()
            .and_then(annotated_tag)
        {
            tracing::info!(%tag, "using tag from commit message");
            return tag.to_owned();
        }
    }

    let tag = stamp.to_string();
    tracing::info!(%tag, "no tag given, falling back to run stamp");
    tag
}

/// Reduce a git ref to its branch, pull request number, or tag name.
pub fn short_ref_name(tag: &str) -> &str {
    REF_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(tag))
        .and_then(|caps| caps.get(1))
        .map_or(tag, |m| m.as_str())
}

/// Value of the first `[tag-name=VALUE]` annotation in a commit message.
pub fn annotated_tag(message: &str) -> Option<&str> {
    COMMIT_ANNOTATION
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
