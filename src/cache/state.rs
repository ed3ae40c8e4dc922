//! Restore/build/save decision state
//!
//! Each cached phase (tool install; dependency bootstrap) moves
//! unchecked → restored | rebuilt, with the triggering key recorded so
//! "why did it rebuild" is answerable from the run summary alone.

use std::fmt;

/// How a store lookup answered relative to the requested key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The exact key was found
    Exact(String),

    /// A fallback-prefix entry was found; the tree is warm but stale
    Partial(String),

    /// Nothing matched
    Miss,
}

impl RestoreOutcome {
    /// Classify a store result against the key that was requested.
    pub fn classify(requested: &str, matched: Option<String>) -> Self {
        match matched {
            Some(key) if key == requested => Self::Exact(key),
            Some(key) => Self::Partial(key),
            None => Self::Miss,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Exact(_))
    }

    /// The matched key, for exact and partial hits.
    pub fn matched_key(&self) -> Option<&str> {
        match self {
            Self::Exact(key) | Self::Partial(key) => Some(key),
            Self::Miss => None,
        }
    }
}

/// State of one cached phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachePhase {
    /// No restore attempted; terminal when caching is disabled or the
    /// phase never ran
    Unchecked,

    /// Exact hit; the expensive step was skipped
    Restored { key: String },

    /// Miss or partial hit; the expensive step ran. `partial` records the
    /// fallback key that pre-warmed the tree, if any.
    Rebuilt { key: String, partial: Option<String> },
}

impl CachePhase {
    /// Fold a restore outcome for `key` into the phase state.
    pub fn from_outcome(key: &str, outcome: &RestoreOutcome) -> Self {
        match outcome {
            RestoreOutcome::Exact(matched) => Self::Restored {
                key: matched.clone(),
            },
            RestoreOutcome::Partial(matched) => Self::Rebuilt {
                key: key.to_string(),
                partial: Some(matched.clone()),
            },
            RestoreOutcome::Miss => Self::Rebuilt {
                key: key.to_string(),
                partial: None,
            },
        }
    }

    pub fn is_restored(&self) -> bool {
        matches!(self, Self::Restored { .. })
    }

    /// The key this phase was decided on, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Unchecked => None,
            Self::Restored { key } | Self::Rebuilt { key, .. } => Some(key),
        }
    }
}

impl fmt::Display for CachePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unchecked => write!(f, "unchecked"),
            Self::Restored { key } => write!(f, "restored ({key})"),
            Self::Rebuilt {
                key,
                partial: Some(partial),
            } => write!(f, "rebuilt ({key}, warmed from {partial})"),
            Self::Rebuilt { key, partial: None } => write!(f, "rebuilt ({key})"),
        }
    }
}
