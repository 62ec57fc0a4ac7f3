//! Domain value objects: overwrite decisions and executable naming.
//!
//! These are pure value types: `Copy`, equality-by-value, no identity.

use std::fmt;

// ── Overwrite decision ───────────────────────────────────────────────────────

/// Outcome of the overwrite confirmation for one bundle path.
///
/// Every caller must handle all three outcomes; only [`Self::Keep`] stops the
/// pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverwriteDecision {
    /// Nothing exists at the bundle path; create it.
    Absent,
    /// The bundle exists and the user agreed to replace it.
    Overwrite,
    /// The bundle exists and must be left untouched.
    Keep,
}

impl OverwriteDecision {
    /// Whether materialization may proceed.
    pub const fn proceeds(self) -> bool {
        matches!(self, Self::Absent | Self::Overwrite)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Overwrite => "overwrite",
            Self::Keep => "keep",
        }
    }
}

impl fmt::Display for OverwriteDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answers that count as "yes" to a confirmation prompt.
const AFFIRMATIVE: &[&str] = &["y", "yes"];

/// `true` only for an affirmative answer; anything else, including an empty
/// line, declines.
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim();
    AFFIRMATIVE.iter().any(|a| a.eq_ignore_ascii_case(answer))
}

// ── Executable naming ────────────────────────────────────────────────────────

/// How a platform family names executables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutableNaming {
    /// No suffix (Unix-likes).
    Bare,
    /// `.exe` suffix (Windows).
    Exe,
}

impl ExecutableNaming {
    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::Bare => "",
            Self::Exe => ".exe",
        }
    }

    pub fn file_name(&self, stem: &str) -> String {
        format!("{stem}{}", self.suffix())
    }
}
