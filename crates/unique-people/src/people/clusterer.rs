use super::encoder::{NameEncoder, PhoneticKey};
use super::normalizer::{normalize, NormalizationMode};
use std::collections::HashMap;
use tracing::debug;

/// Original spellings that share one phonetic key, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub key: PhoneticKey,
    pub names: Vec<String>,
}

/// Key -> spellings map that remembers the order keys were first seen.
#[derive(Debug, Default)]
pub struct PhoneticClusters {
    index: HashMap<PhoneticKey, usize>,
    clusters: Vec<Cluster>,
}

impl PhoneticClusters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: PhoneticKey, name: String) {
        match self.index.get(&key) {
            Some(&position) => self.clusters[position].names.push(name),
            None => {
                self.index.insert(key.clone(), self.clusters.len());
                self.clusters.push(Cluster {
                    key,
                    names: vec![name],
                });
            }
        }
    }

    pub fn get(&self, key: &PhoneticKey) -> Option<&[String]> {
        self.index
            .get(key)
            .map(|&position| self.clusters[position].names.as_slice())
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter()
    }
}

impl IntoIterator for PhoneticClusters {
    type Item = Cluster;
    type IntoIter = std::vec::IntoIter<Cluster>;

    fn into_iter(self) -> Self::IntoIter {
        self.clusters.into_iter()
    }
}

/// Groups names by phonetic key without dropping or reordering any of them.
pub fn cluster<I, S>(names: I, mode: NormalizationMode, encoder: &NameEncoder) -> PhoneticClusters
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut clusters = PhoneticClusters::new();

    for name in names {
        let name = name.into();
        let normalized = normalize(&name, mode);
        if normalized.is_blank() {
            debug!(name = %name, "name folds to an empty key");
        }
        let key = encoder.encode(&normalized);
        clusters.insert(key, name);
    }

    clusters
}
