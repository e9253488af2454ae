use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use walkdir::WalkDir;

use crate::constants::JPEG_EXTENSIONS;
use crate::store::ImageStore;

/// Polls the hot folder and reports files the store has not seen yet.
#[derive(Debug)]
pub struct FolderWatcher {
    root: PathBuf,
    recursive: bool,
    shuffle: bool,
    interval: Duration,
    next_poll: Option<Instant>,
    enabled: bool,
}

impl FolderWatcher {
    pub fn new(root: PathBuf, interval: Duration) -> Self {
        Self {
            root,
            recursive: false,
            shuffle: false,
            interval,
            next_poll: None,
            enabled: true,
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn shuffled(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Pauses or resumes polling. Resuming polls on the next tick.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.next_poll = None;
    }

    /// Scans the folder if the poll interval has elapsed and returns the
    /// new arrivals, in the order they should be added.
    pub fn poll(&mut self, now: Instant, store: &ImageStore) -> Vec<PathBuf> {
        if !self.enabled || self.next_poll.is_some_and(|due| now < due) {
            return Vec::new();
        }
        self.next_poll = Some(now + self.interval);
        self.arrivals(store)
    }

    /// Every JPEG on disk that is not in `store`. Listing errors count as an
    /// empty listing; the next poll tries again.
    pub fn arrivals(&self, store: &ImageStore) -> Vec<PathBuf> {
        let mut paths = match self.scan() {
            Ok(paths) => paths,
            Err(e) => {
                tracing::debug!("failed to list {}: {}", self.root.display(), e);
                return Vec::new();
            }
        };
        paths.retain(|path| !store.contains(path));
        if self.shuffle {
            paths.shuffle(&mut rand::rng());
        }
        if !paths.is_empty() {
            tracing::debug!("saw {} new image(s): {:?}", paths.len(), paths);
        }
        paths
    }

    /// Lists the JPEG files of the folder, sorted by file name.
    pub fn scan(&self) -> io::Result<Vec<PathBuf>> {
        let mut paths = if self.recursive {
            walk_images(&self.root)?
        } else {
            list_images(&self.root)?
        };
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));
        Ok(paths)
    }
}

fn list_images(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_jpeg(&path) {
            paths.push(path);
        }
    }
    Ok(paths)
}

fn walk_images(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(io::Error::other)?;
        if entry.file_type().is_file() && is_jpeg(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

pub fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| {
            JPEG_EXTENSIONS
                .iter()
                .any(|wanted| ext.eq_ignore_ascii_case(wanted))
        })
}
