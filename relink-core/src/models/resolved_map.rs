use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Total mapping from every known entity id to its final canonical id.
///
/// Invariants: every id observed anywhere has an entry (self-mapping
/// allowed), and the image is never larger than the pre-merge distinct-id
/// count. Serializes as a plain int→int table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedIdentityMap {
    entries: BTreeMap<i64, i64>,
}

impl ResolvedIdentityMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: i64, canonical: i64) {
        self.entries.insert(id, canonical);
    }

    /// The canonical id for `id`. Unknown ids map to themselves, so the
    /// map behaves as total even for ids it never saw.
    pub fn canonical(&self, id: i64) -> i64 {
        self.entries.get(&id).copied().unwrap_or(id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct canonical ids in the image.
    pub fn distinct_targets(&self) -> usize {
        let targets: std::collections::BTreeSet<i64> = self.entries.values().copied().collect();
        targets.len()
    }

    /// True when every entry maps to itself.
    pub fn is_identity(&self) -> bool {
        self.entries.iter().all(|(id, canonical)| id == canonical)
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.entries.iter().map(|(&id, &canonical)| (id, canonical))
    }

    pub fn entries(&self) -> &BTreeMap<i64, i64> {
        &self.entries
    }
}

impl FromIterator<(i64, i64)> for ResolvedIdentityMap {
    fn from_iter<T: IntoIterator<Item = (i64, i64)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_ids_map_to_themselves() {
        let map = ResolvedIdentityMap::new();
        assert_eq!(map.canonical(99), 99);
    }

    #[test]
    fn image_never_exceeds_entry_count() {
        let map: ResolvedIdentityMap = [(1, 5), (2, 5), (5, 5)].into_iter().collect();
        assert!(map.distinct_targets() <= map.len());
        assert_eq!(map.distinct_targets(), 1);
    }

    #[test]
    fn serializes_as_flat_table() {
        let map: ResolvedIdentityMap = [(9, 5)].into_iter().collect();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"9":5}"#);
        let back: ResolvedIdentityMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }
}
