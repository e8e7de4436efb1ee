use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The virtual output tree of a generated application.
///
/// Keys are forward-slash separated paths, kept sorted. Writes to an existing
/// path replace the whole entry; there is no partial merge of content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileMapping(BTreeMap<String, String>);

impl FileMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an entry, returning the previous content.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) -> Option<String> {
        self.0.insert(path.into(), content.into())
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Apply `patch` on top of this mapping; later writes win.
    /// Returns the paths the patch wrote, in key order.
    pub fn merge(&mut self, patch: FileMapping) -> Vec<String> {
        let mut written = Vec::with_capacity(patch.len());
        for (path, content) in patch.0 {
            written.push(path.clone());
            self.0.insert(path, content);
        }
        written
    }

    /// Total content size in bytes.
    pub fn total_bytes(&self) -> usize {
        self.0.values().map(String::len).sum()
    }
}

impl FromIterator<(String, String)> for FileMapping {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for FileMapping {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
