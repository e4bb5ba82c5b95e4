//! Structured extraction of dependency changes from bot commits
//!
//! The update bot describes a bump twice: in the commit message ("Bump rake
//! from 12.3.1 to 12.3.2") and in the `Gemfile.lock` diff. This module parses
//! both and only emits a change when the two sources agree, so unrelated
//! lock-file churn (transitive dependency shuffling) is never mistaken for
//! the bump the message describes.
//!
//! The matching grammar is confined to this module; supporting another
//! ecosystem's lock-file format means swapping these patterns, not touching
//! the pipeline.

use crate::policy::ProposedChange;
use indexmap::IndexMap;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// The single lock file recognized in this version
pub const LOCKFILE_PATH: &str = "Gemfile.lock";

/// `Bump <name> from <ver> to <ver>` / `Updates <name> from <ver> to <ver>`,
/// with optional backtick quoting around the name. Case- and
/// wording-sensitive.
static MESSAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:Bump|Updates) `?([A-Za-z0-9._-]+)`? from ([A-Za-z0-9._-]+) to ([A-Za-z0-9._-]+)")
        .expect("message regex is valid")
});

/// Removed lock-file entry: `-    <name> (<version>)`
static REMOVED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-\s+([a-z_-]+) \(([\d.]+)\)$").expect("removal regex is valid"));

/// Added lock-file entry: `+    <name> (<version>)`
static ADDED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+\s+([a-z_-]+) \(([\d.]+)\)$").expect("addition regex is valid"));

struct MentionedBump {
    from: String,
    to: String,
}

/// Extract the dependency changes a commit proposes.
///
/// Scans `commit_message` for bump mentions (last occurrence per name wins),
/// scans `lockfile_diff` for removed/added entry lines, and cross-validates:
/// a removed line counts only if it matches the mentioned `from` version, an
/// added line only if it matches the mentioned `to` version. One validated
/// removal plus one validated addition for the same name yields one
/// [`ProposedChange`]; a name with only half a pair yields nothing.
///
/// Output order follows the first mention of each name in the message.
pub fn extract(commit_message: &str, lockfile_diff: &str) -> Vec<ProposedChange> {
    let mut mentions: IndexMap<String, MentionedBump> = IndexMap::new();
    for line in commit_message.lines() {
        if let Some(caps) = MESSAGE_RE.captures(line) {
            mentions.insert(
                caps[1].to_string(),
                MentionedBump {
                    from: caps[2].to_string(),
                    to: caps[3].to_string(),
                },
            );
        }
    }

    let mut removed: HashMap<String, String> = HashMap::new();
    let mut added: HashMap<String, String> = HashMap::new();
    for line in lockfile_diff.lines() {
        if let Some(caps) = REMOVED_RE.captures(line) {
            let (name, version) = (&caps[1], &caps[2]);
            if mentions.get(name).is_some_and(|m| m.from == version) {
                removed.insert(name.to_string(), version.to_string());
            }
        } else if let Some(caps) = ADDED_RE.captures(line) {
            let (name, version) = (&caps[1], &caps[2]);
            if mentions.get(name).is_some_and(|m| m.to == version) {
                added.insert(name.to_string(), version.to_string());
            }
        }
    }

    mentions
        .keys()
        .filter_map(|name| {
            let previous = removed.get(name)?;
            let next = added.get(name)?;
            Some(ProposedChange {
                name: name.clone(),
                previous: previous.clone(),
                next: next.clone(),
            })
        })
        .collect()
}
