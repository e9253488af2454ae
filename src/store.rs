use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Order in which the store keeps its entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    Arrival,
    Alphabetical,
}

/// Known images of the hot folder, in display order.
///
/// Broken images stay in the sequence so that indices held by the
/// navigator remain valid; they are only skipped.
#[derive(Debug)]
pub struct ImageStore {
    ordering: Ordering,
    entries: Vec<PathBuf>,
    known: HashSet<PathBuf>,
    broken: HashSet<PathBuf>,
}

impl ImageStore {
    pub fn new(ordering: Ordering) -> Self {
        Self {
            ordering,
            entries: Vec::new(),
            known: HashSet::new(),
            broken: HashSet::new(),
        }
    }

    /// Inserts `path` and returns the index it landed at, or `None` if the
    /// path was already known.
    pub fn add(&mut self, path: PathBuf) -> Option<usize> {
        if self.known.contains(&path) {
            return None;
        }
        let index = match self.ordering {
            Ordering::Arrival => self.entries.len(),
            Ordering::Alphabetical => self.entries.partition_point(|p| p < &path),
        };
        self.known.insert(path.clone());
        self.entries.insert(index, path);
        Some(index)
    }

    pub fn mark_broken(&mut self, path: &Path) {
        self.broken.insert(path.to_path_buf());
    }

    pub fn clear_broken(&mut self) {
        self.broken.clear();
    }

    pub fn is_broken(&self, path: &Path) -> bool {
        self.broken.contains(path)
    }

    pub fn is_broken_at(&self, index: usize) -> bool {
        self.entries
            .get(index)
            .is_some_and(|path| self.broken.contains(path))
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.known.contains(path)
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.entries.get(index).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn broken_count(&self) -> usize {
        self.broken.len()
    }
}
