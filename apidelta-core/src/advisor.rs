//! Release advice from a set of classified changes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::differ::{Change, ChangeKind, Severity};

/// Semantic-version component to increment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionBump {
    None,
    Patch,
    Minor,
    Major,
}

impl VersionBump {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionBump::None => "none",
            VersionBump::Patch => "patch",
            VersionBump::Minor => "minor",
            VersionBump::Major => "major",
        }
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of changes at each severity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub breaking: usize,
    pub compatible: usize,
    pub patch: usize,
    pub internal: usize,
}

impl SeverityCounts {
    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Breaking => self.breaking,
            Severity::Compatible => self.compatible,
            Severity::Patch => self.patch,
            Severity::Internal => self.internal,
        }
    }

    fn bump(&mut self, severity: Severity) {
        match severity {
            Severity::Breaking => self.breaking += 1,
            Severity::Compatible => self.compatible += 1,
            Severity::Patch => self.patch += 1,
            Severity::Internal => self.internal += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.breaking + self.compatible + self.patch + self.internal
    }
}

/// Overall verdict for a comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Most severe level among public changes; `Internal` when there are none.
    pub overall_severity: Severity,
    pub recommended_bump: VersionBump,
    pub counts: SeverityCounts,
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            overall_severity: Severity::Internal,
            recommended_bump: VersionBump::None,
            counts: SeverityCounts::default(),
        }
    }
}

impl Summary {
    pub fn is_breaking(&self) -> bool {
        self.overall_severity == Severity::Breaking
    }
}

/// Aggregate changes into a summary.
///
/// Only public changes raise the overall severity. The bump is `major` for
/// any public breaking change, `minor` for a public addition or any
/// compatible change, `patch` for anything else, and `none` when there are
/// no changes at all.
pub fn aggregate(changes: &[Change]) -> Summary {
    let mut counts = SeverityCounts::default();
    let mut overall = Severity::Internal;
    let mut public_breaking = false;
    let mut minor = false;

    for change in changes {
        counts.bump(change.severity);
        let public = change.visibility.is_public();
        if public {
            overall = overall.max(change.severity);
        }
        if public && change.severity == Severity::Breaking {
            public_breaking = true;
        }
        if (public && change.kind == ChangeKind::Added) || change.severity == Severity::Compatible {
            minor = true;
        }
    }

    let recommended_bump = if changes.is_empty() {
        VersionBump::None
    } else if public_breaking {
        VersionBump::Major
    } else if minor {
        VersionBump::Minor
    } else {
        VersionBump::Patch
    };

    Summary {
        overall_severity: overall,
        recommended_bump,
        counts,
    }
}
