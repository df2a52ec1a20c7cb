//! The constraint specification for slate construction.
//!
//! Every field is optional; an absent field leaves that dimension
//! unconstrained. The only default-on rule is the duplicate safety check.

use serde::{Deserialize, Serialize};

/// Popularity balance constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PopularityConstraints {
    /// Maximum number of head-tier items allowed in the slate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_head_in_slate: Option<usize>,
    /// Minimum number of tail-tier items required in the slate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_tail_in_slate: Option<usize>,
}

/// Genre diversity constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiversityConstraints {
    /// Minimum number of distinct genres the slate must cover.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_unique_genres_in_slate: Option<usize>,
}

/// Safety constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyConstraints {
    /// Whether duplicate item ids are forbidden in the slate. Defaults to
    /// true.
    #[serde(default = "default_true")]
    pub no_duplicates: bool,
}

impl Default for SafetyConstraints {
    fn default() -> Self {
        Self { no_duplicates: true }
    }
}

fn default_true() -> bool {
    true
}

/// The full constraint specification enforced by the verifier.
///
/// Constructed once per run and passed by reference into each component;
/// there is no ambient mutable configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConstraintSpec {
    /// Popularity balance rules.
    #[serde(default)]
    pub popularity: PopularityConstraints,
    /// Genre diversity rules.
    #[serde(default)]
    pub diversity: DiversityConstraints,
    /// Safety rules.
    #[serde(default)]
    pub safety: SafetyConstraints,
}

impl ConstraintSpec {
    /// A spec with no active constraints beyond the default duplicate check.
    #[must_use]
    pub fn unconstrained() -> Self {
        Self::default()
    }

    /// Set the maximum number of head items.
    #[must_use]
    pub fn with_max_head(mut self, limit: usize) -> Self {
        self.popularity.max_head_in_slate = Some(limit);
        self
    }

    /// Set the minimum number of tail items.
    #[must_use]
    pub fn with_min_tail(mut self, limit: usize) -> Self {
        self.popularity.min_tail_in_slate = Some(limit);
        self
    }

    /// Set the minimum number of distinct genres.
    #[must_use]
    pub fn with_min_unique_genres(mut self, limit: usize) -> Self {
        self.diversity.min_unique_genres_in_slate = Some(limit);
        self
    }

    /// Disable the duplicate safety check.
    #[must_use]
    pub fn allowing_duplicates(mut self) -> Self {
        self.safety.no_duplicates = false;
        self
    }

    /// Whether no optional constraint is active and the duplicate check is
    /// off.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.popularity.max_head_in_slate.is_none()
            && self.popularity.min_tail_in_slate.is_none()
            && self.diversity.min_unique_genres_in_slate.is_none()
            && !self.safety.no_duplicates
    }
}
