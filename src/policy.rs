//! Dependency allowlist policy
//!
//! Holds the allowlist declared by a repository's merge-policy document and
//! the dependency changes proposed by one pull request, and answers the two
//! policy questions the validation pipeline asks: is every proposed change on
//! the allowlist, and is every proposed change within its permitted bump
//! magnitude. The checks are deliberately separate so the pipeline can report
//! a precise rejection reason for each.

use crate::error::Result;
use crate::semver;
use std::collections::{HashMap, HashSet};

/// A dependency version change proposed by a pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposedChange {
    /// Dependency name
    pub name: String,
    /// Version before the change
    pub previous: String,
    /// Version after the change
    pub next: String,
}

/// Per-PR policy state: the allowlist plus the proposed changes
///
/// One instance is scoped to a single PR evaluation and never shared.
#[derive(Debug, Default)]
pub struct DependencyPolicy {
    allowlist: HashMap<String, HashSet<String>>,
    proposed: Vec<ProposedChange>,
}

impl DependencyPolicy {
    /// Create an empty policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an allowlist entry, overwriting any existing entry for `name`
    pub fn allow<I, S>(&mut self, name: &str, permitted_magnitudes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowlist.insert(
            name.to_string(),
            permitted_magnitudes.into_iter().map(Into::into).collect(),
        );
    }

    /// Append a proposed change
    pub fn propose(&mut self, name: &str, previous: &str, next: &str) {
        self.proposed.push(ProposedChange {
            name: name.to_string(),
            previous: previous.to_string(),
            next: next.to_string(),
        });
    }

    /// The proposed changes, in the order they were added
    pub fn proposed_changes(&self) -> &[ProposedChange] {
        &self.proposed
    }

    /// Whether any changes have been proposed
    pub fn has_proposed_changes(&self) -> bool {
        !self.proposed.is_empty()
    }

    /// True iff every proposed change's dependency is on the allowlist.
    ///
    /// Short-circuits false on the first miss.
    pub fn all_on_allowlist(&self) -> bool {
        self.proposed
            .iter()
            .all(|change| self.allowlist.contains_key(&change.name))
    }

    /// True iff every allowlisted proposed change is within its permitted
    /// magnitudes.
    ///
    /// Changes whose dependency is not on the allowlist are skipped here;
    /// membership is enforced separately by [`Self::all_on_allowlist`] so the
    /// two failures are reported distinctly. Propagates a version-format
    /// error if a proposed version cannot be classified.
    pub fn all_within_allowed_magnitude(&self) -> Result<bool> {
        for change in &self.proposed {
            let Some(permitted) = self.allowlist.get(&change.name) else {
                continue;
            };
            let magnitude = semver::classify(&change.previous, &change.next)?;
            if !permitted.contains(magnitude.label()) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
