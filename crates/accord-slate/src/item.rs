//! Catalog items: identifiers, popularity tiers, genre sets.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// A catalog item identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl ItemId {
    /// Get the raw numeric id.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ItemId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Popularity tier of an item, derived upstream from training-interaction
/// frequency quantiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PopularityTier {
    /// Most popular items.
    Head,
    /// Mid-popularity items.
    Torso,
    /// Long-tail items.
    Tail,
}

impl PopularityTier {
    /// Lowercase tier name, matching the serialized form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Torso => "torso",
            Self::Tail => "tail",
        }
    }

    /// Whether this is the head tier.
    #[must_use]
    pub const fn is_head(&self) -> bool {
        matches!(self, Self::Head)
    }

    /// Whether this is the tail tier.
    #[must_use]
    pub const fn is_tail(&self) -> bool {
        matches!(self, Self::Tail)
    }
}

impl std::fmt::Display for PopularityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable reference metadata for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMeta {
    /// Popularity tier.
    pub tier: PopularityTier,
    /// Genre labels. Stored as an ordered set so renderings are stable.
    pub genres: BTreeSet<String>,
}

impl ItemMeta {
    /// Create metadata from a tier and any iterable of genre labels.
    pub fn new<I, S>(tier: PopularityTier, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tier,
            genres: genres.into_iter().map(Into::into).collect(),
        }
    }
}

/// Read-only item metadata store, loaded once per run.
///
/// The catalog is the single source of truth for tier and genre lookups.
/// Certificate statistics are always recomputed against it.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: HashMap<ItemId, ItemMeta>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item, replacing any previous metadata for the same id.
    pub fn insert(&mut self, id: ItemId, meta: ItemMeta) {
        self.items.insert(id, meta);
    }

    /// Look up item metadata.
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&ItemMeta> {
        self.items.get(&id)
    }

    /// Look up just the popularity tier.
    #[must_use]
    pub fn tier_of(&self, id: ItemId) -> Option<PopularityTier> {
        self.items.get(&id).map(|m| m.tier)
    }

    /// Whether the catalog knows this item.
    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    /// Number of items in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<(ItemId, ItemMeta)> for Catalog {
    fn from_iter<T: IntoIterator<Item = (ItemId, ItemMeta)>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
