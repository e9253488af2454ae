use crate::store::ImageStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Position within the image store.
///
/// Every search only ever lands on entries that are not broken. When no
/// such entry exists the position becomes unset.
#[derive(Debug)]
pub struct Navigator {
    current: Option<usize>,
    follow_latest: bool,
    centered: bool,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            current: None,
            follow_latest: true,
            centered: false,
        }
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn follow_latest(&self) -> bool {
        self.follow_latest
    }

    pub fn centered(&self) -> bool {
        self.centered
    }

    pub fn toggle_centered(&mut self) {
        self.centered = !self.centered;
    }

    pub fn next(&mut self, store: &ImageStore) -> Option<usize> {
        self.follow_latest = false;
        self.step(store, Direction::Forward)
    }

    pub fn previous(&mut self, store: &ImageStore) -> Option<usize> {
        self.follow_latest = false;
        self.step(store, Direction::Backward)
    }

    pub fn first(&mut self, store: &ImageStore) -> Option<usize> {
        self.follow_latest = false;
        self.current = scan(store, store.len().wrapping_sub(1), Direction::Forward);
        self.current
    }

    pub fn last(&mut self, store: &ImageStore) -> Option<usize> {
        self.follow_latest = false;
        self.current = scan(store, 0, Direction::Backward);
        self.current
    }

    /// Moves off the current entry after it failed to display. Same as
    /// `next()` but leaves follow-latest alone.
    pub fn recover(&mut self, store: &ImageStore) -> Option<usize> {
        self.step(store, Direction::Forward)
    }

    /// Positions on the first usable entry without counting as manual
    /// navigation. Used for the initial load of the folder.
    pub fn start(&mut self, store: &ImageStore) -> Option<usize> {
        if self.current.is_none() {
            self.current = scan(store, store.len().wrapping_sub(1), Direction::Forward);
        }
        self.current
    }

    /// Accounts for an entry inserted at `index`. Entries at or after the
    /// insertion point move up by one.
    pub fn on_entry_added(&mut self, index: usize) {
        if let Some(current) = self.current {
            if current >= index {
                self.current = Some(current + 1);
            }
        }
        if self.follow_latest {
            self.current = Some(index);
        }
    }

    fn step(&mut self, store: &ImageStore, direction: Direction) -> Option<usize> {
        // From an unset position, searching forward starts at the top and
        // searching backward starts at the bottom.
        let origin = match (self.current, direction) {
            (Some(index), _) => index,
            (None, Direction::Forward) => store.len().wrapping_sub(1),
            (None, Direction::Backward) => 0,
        };
        self.current = scan(store, origin, direction);
        self.current
    }
}

/// Finds the first non-broken index strictly after `origin` in `direction`,
/// wrapping around, and considering `origin` itself last.
fn scan(store: &ImageStore, origin: usize, direction: Direction) -> Option<usize> {
    let len = store.len();
    if len == 0 {
        return None;
    }
    let origin = origin % len;
    (1..=len)
        .map(|offset| match direction {
            Direction::Forward => (origin + offset) % len,
            Direction::Backward => (origin + len - offset) % len,
        })
        .find(|&index| !store.is_broken_at(index))
}
