//! Mapping from SOP Instance UIDs to local image ids.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// SOP Instance UID → image id, in insertion order.
///
/// Insertion order matters: point-display decoding picks the first image of
/// the map as the representative image of a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SopInstanceUidToImageIdMap {
    entries: IndexMap<String, String>,
}

impl SopInstanceUidToImageIdMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the image id of a SOP instance. A replaced entry
    /// keeps its position.
    pub fn insert(&mut self, sop_instance_uid: impl Into<String>, image_id: impl Into<String>) {
        self.entries.insert(sop_instance_uid.into(), image_id.into());
    }

    /// Image id of a SOP instance.
    pub fn get(&self, sop_instance_uid: &str) -> Option<&str> {
        self.entries.get(sop_instance_uid).map(String::as_str)
    }

    /// The first image id inserted.
    pub fn first_image_id(&self) -> Option<&str> {
        self.entries.first().map(|(_, image_id)| image_id.as_str())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(uid, image_id)| (uid.as_str(), image_id.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SopInstanceUidToImageIdMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(uid, image_id)| (uid.into(), image_id.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_image_follows_insertion_order() {
        let map: SopInstanceUidToImageIdMap =
            [("9.9", "imgB"), ("1.1", "imgA")].into_iter().collect();
        assert_eq!(map.first_image_id(), Some("imgB"));
        assert_eq!(map.get("1.1"), Some("imgA"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_insert_replaces() {
        let mut map = SopInstanceUidToImageIdMap::new();
        map.insert("1.1", "a");
        map.insert("2.2", "c");
        map.insert("1.1", "b");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("1.1"), Some("b"));
        assert_eq!(map.first_image_id(), Some("b"));
    }

    #[test]
    fn test_json_keeps_document_order() {
        let map: SopInstanceUidToImageIdMap =
            serde_json::from_str(r#"{ "S2": "img2", "S1": "img1" }"#).unwrap();
        assert_eq!(map.first_image_id(), Some("img2"));
        assert_eq!(
            serde_json::to_string(&map).unwrap(),
            r#"{"S2":"img2","S1":"img1"}"#
        );
    }

    #[test]
    fn test_large_map_lookup() {
        let map: SopInstanceUidToImageIdMap = (0..5000)
            .map(|i| (format!("1.2.{}", i), format!("img-{}", i)))
            .collect();
        assert_eq!(map.len(), 5000);
        assert_eq!(map.get("1.2.4999"), Some("img-4999"));
        assert_eq!(map.first_image_id(), Some("img-0"));
        assert_eq!(map.iter().nth(17), Some(("1.2.17", "img-17")));
    }
}
