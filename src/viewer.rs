use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::Settings;
use crate::constants::{POLL_INTERVAL, SLIDESHOW_INTERVAL};
use crate::keys::Command;
use crate::navigator::Navigator;
use crate::slideshow::Slideshow;
use crate::store::ImageStore;
use crate::surface::{Frame, Surface};
use crate::watcher::FolderWatcher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Application state owned by the event loop.
pub struct Viewer {
    store: ImageStore,
    watcher: FolderWatcher,
    navigator: Navigator,
    slideshow: Slideshow,
    max_width: u32,
    max_height: u32,
    bell: bool,
    overlay: bool,
    comment: bool,
    shown: Option<PathBuf>,
}

impl Viewer {
    pub fn new(settings: &Settings, max_width: u32, max_height: u32) -> Self {
        let watcher = FolderWatcher::new(settings.directory.clone(), POLL_INTERVAL)
            .recursive(settings.treewalk)
            .shuffled(settings.randomise);
        Self {
            store: ImageStore::new(settings.ordering),
            watcher,
            navigator: Navigator::new(),
            slideshow: Slideshow::new(SLIDESHOW_INTERVAL),
            max_width,
            max_height,
            bell: settings.bell,
            overlay: false,
            comment: false,
            shown: None,
        }
    }

    /// Adds whatever is already in the folder and shows the first image.
    pub fn load_existing(&mut self, surface: &mut impl Surface) {
        for path in self.watcher.arrivals(&self.store) {
            self.store.add(path);
        }
        tracing::debug!("loaded {} existing image(s)", self.store.len());
        self.navigator.start(&self.store);
        self.redraw(surface);
    }

    /// Runs the timers that are due: folder poll, then slideshow.
    pub fn tick(&mut self, now: Instant, surface: &mut impl Surface) {
        let arrivals = self.watcher.poll(now, &self.store);
        if !arrivals.is_empty() {
            self.add_arrivals(arrivals, surface);
        }

        if self.slideshow.fire(now) {
            let index = self.navigator.next(&self.store);
            tracing::debug!("slideshow advance to {:?}", index);
            self.redraw(surface);
        }
    }

    pub fn handle(&mut self, command: Command, now: Instant, surface: &mut impl Surface) -> Flow {
        tracing::debug!("command {:?}", command);
        match command {
            Command::Quit => return Flow::Quit,
            Command::Previous => {
                self.navigator.previous(&self.store);
                self.redraw(surface);
            }
            Command::Next => {
                self.navigator.next(&self.store);
                self.redraw(surface);
            }
            Command::First => {
                self.navigator.first(&self.store);
                self.redraw(surface);
            }
            Command::Last => {
                self.navigator.last(&self.store);
                self.redraw(surface);
            }
            Command::ToggleSlideshow => {
                let enabled = self.slideshow.toggle(now);
                tracing::debug!("slideshow {}", if enabled { "on" } else { "off" });
            }
            Command::Faster => {
                self.slideshow.speed_up(now);
                tracing::debug!("slideshow speed x{}", self.slideshow.multiplier());
                self.navigator.next(&self.store);
                self.redraw(surface);
            }
            Command::Slower => {
                self.slideshow.slow_down(now);
                tracing::debug!("slideshow speed x{}", self.slideshow.multiplier());
            }
            Command::ToggleCentered => {
                self.navigator.toggle_centered();
                self.redraw(surface);
            }
            Command::ToggleOverlay => {
                self.overlay = !self.overlay;
                self.redraw(surface);
            }
            Command::ToggleComment => {
                self.comment = !self.comment;
                if self.overlay {
                    self.redraw(surface);
                }
            }
            Command::ClearBroken => {
                tracing::debug!("clearing {} broken image(s)", self.store.broken_count());
                self.store.clear_broken();
                if self.navigator.current().is_none() && self.navigator.start(&self.store).is_some() {
                    self.redraw(surface);
                }
            }
            Command::ToggleUpdating => {
                let enabled = !self.watcher.enabled();
                self.watcher.set_enabled(enabled);
                tracing::debug!("updating {}", if enabled { "on" } else { "off" });
            }
        }
        Flow::Continue
    }

    fn add_arrivals(&mut self, arrivals: Vec<PathBuf>, surface: &mut impl Surface) {
        for path in arrivals {
            tracing::debug!("new image {}", path.display());
            if let Some(index) = self.store.add(path) {
                self.navigator.on_entry_added(index);
            }
        }
        if self.bell {
            surface.bell();
        }
        if self.navigator.follow_latest() {
            self.slideshow.stop();
        } else if self.navigator.current().is_none() {
            self.navigator.start(&self.store);
        }
        if self.current_path() != self.shown.as_deref() {
            self.redraw(surface);
        }
    }

    fn current_path(&self) -> Option<&Path> {
        self.navigator.current().and_then(|index| self.store.get(index))
    }

    /// Shows the current entry. An image that fails to render is marked
    /// broken and the navigator moves on, until something displays or
    /// nothing is left.
    pub fn redraw(&mut self, surface: &mut impl Surface) {
        let frame = Frame {
            max_width: self.max_width,
            max_height: self.max_height,
            centered: self.navigator.centered(),
            overlay: self.overlay,
            comment: self.comment,
        };
        loop {
            let Some(path) = self.current_path().map(Path::to_path_buf) else {
                self.shown = None;
                surface.blank(&self.placeholder());
                return;
            };
            match surface.render(&path, &frame) {
                Ok(()) => {
                    tracing::debug!("showing {}", path.display());
                    self.shown = Some(path);
                    return;
                }
                Err(e) => {
                    tracing::debug!("skipping {} - {}", path.display(), e);
                    self.store.mark_broken(&path);
                    self.navigator.recover(&self.store);
                }
            }
        }
    }

    fn placeholder(&self) -> String {
        let root = self.watcher.root().display();
        let broken = self
            .store
            .entries()
            .iter()
            .filter(|path| self.store.is_broken(path))
            .count();
        if broken == 0 {
            format!("Waiting for images in {root}")
        } else {
            format!("{broken} image(s) in {root} failed to load - press x to retry")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Ordering;
    use crate::surface::RenderError;
    use std::collections::HashSet;
    use std::fs::File;
    use std::time::Duration;
    use tempfile::{TempDir, tempdir};

    #[derive(Default)]
    struct FakeSurface {
        failing: HashSet<PathBuf>,
        rendered: Vec<PathBuf>,
        frames: Vec<Frame>,
        blanks: usize,
        message: String,
        bells: usize,
    }

    impl Surface for FakeSurface {
        fn render(&mut self, path: &Path, frame: &Frame) -> Result<(), RenderError> {
            self.rendered.push(path.to_path_buf());
            self.frames.push(*frame);
            if self.failing.contains(path) {
                return Err(RenderError::Decode {
                    path: path.to_path_buf(),
                    reason: "truncated".into(),
                });
            }
            Ok(())
        }

        fn blank(&mut self, message: &str) {
            self.blanks += 1;
            self.message = message.to_string();
        }

        fn bell(&mut self) {
            self.bells += 1;
        }
    }

    struct Fixture {
        dir: TempDir,
        viewer: Viewer,
        surface: FakeSurface,
        now: Instant,
    }

    impl Fixture {
        fn new(existing: &[&str], sort: bool, bell: bool) -> Self {
            let dir = tempdir().expect("failed to create temp dir");
            for name in existing {
                File::create(dir.path().join(name)).expect("failed to create test file");
            }
            let settings = Settings {
                directory: dir.path().to_path_buf(),
                width: None,
                height: None,
                bare: false,
                bell,
                ordering: if sort { Ordering::Alphabetical } else { Ordering::Arrival },
                debug: false,
                randomise: false,
                treewalk: false,
            };
            let mut viewer = Viewer::new(&settings, 640, 480);
            let mut surface = FakeSurface::default();
            viewer.load_existing(&mut surface);
            Self {
                dir,
                viewer,
                surface,
                now: Instant::now(),
            }
        }

        fn path(&self, name: &str) -> PathBuf {
            self.dir.path().join(name)
        }

        fn arrive(&mut self, name: &str) {
            File::create(self.path(name)).expect("failed to create test file");
            self.advance(POLL_INTERVAL);
        }

        fn advance(&mut self, by: Duration) {
            self.now += by;
            self.viewer.tick(self.now, &mut self.surface);
        }

        fn press(&mut self, command: Command) -> Flow {
            self.viewer.handle(command, self.now, &mut self.surface)
        }

        fn names(&self) -> Vec<String> {
            self.viewer
                .store
                .entries()
                .iter()
                .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
                .collect()
        }

        fn shown(&self) -> Option<PathBuf> {
            self.viewer.shown.clone()
        }
    }

    #[test]
    fn empty_folder_shows_placeholder() {
        let mut fx = Fixture::new(&[], false, false);
        assert_eq!(fx.surface.blanks, 1);
        assert!(fx.surface.message.starts_with("Waiting for images in "));
        assert_eq!(fx.press(Command::Next), Flow::Continue);
        assert_eq!(fx.viewer.navigator.current(), None);
        assert!(fx.surface.rendered.is_empty());
    }

    #[test]
    fn startup_shows_first_existing_image() {
        let fx = Fixture::new(&["a.jpg", "b.jpg"], false, false);
        assert_eq!(fx.shown(), Some(fx.path("a.jpg")));
        assert!(fx.viewer.navigator.follow_latest());
    }

    #[test]
    fn sorted_store_keeps_alphabetical_order_for_arrivals() {
        let mut fx = Fixture::new(&["b.jpg", "a.jpg"], true, false);
        assert_eq!(fx.names(), ["a.jpg", "b.jpg"]);
        fx.arrive("c.jpg");
        assert_eq!(fx.names(), ["a.jpg", "b.jpg", "c.jpg"]);
    }

    #[test]
    fn new_arrival_is_followed_until_manual_navigation() {
        let mut fx = Fixture::new(&["a.jpg"], false, true);
        fx.arrive("b.jpg");
        assert_eq!(fx.shown(), Some(fx.path("b.jpg")));
        assert_eq!(fx.surface.bells, 1);

        fx.press(Command::Previous);
        assert_eq!(fx.shown(), Some(fx.path("a.jpg")));

        fx.arrive("c.jpg");
        assert_eq!(fx.shown(), Some(fx.path("a.jpg")));
        assert_eq!(fx.surface.bells, 2);
        assert_eq!(fx.viewer.store.len(), 3);
    }

    #[test]
    fn first_arrival_in_empty_folder_is_shown() {
        let mut fx = Fixture::new(&[], false, false);
        fx.press(Command::Next);
        fx.arrive("a.jpg");
        assert_eq!(fx.shown(), Some(fx.path("a.jpg")));
    }

    #[test]
    fn decode_failure_marks_once_and_moves_on() {
        let mut fx = Fixture::new(&["a.jpg", "b.jpg", "c.jpg"], false, false);
        let broken = fx.path("b.jpg");
        fx.surface.failing.insert(broken.clone());

        fx.press(Command::Next);

        assert!(fx.viewer.store.is_broken(&broken));
        assert_eq!(fx.viewer.store.broken_count(), 1);
        assert_eq!(fx.shown(), Some(fx.path("c.jpg")));
        let attempts = fx.surface.rendered.iter().filter(|p| **p == broken).count();
        assert_eq!(attempts, 1);

        fx.press(Command::Previous);
        assert_eq!(fx.shown(), Some(fx.path("a.jpg")));
        let attempts = fx.surface.rendered.iter().filter(|p| **p == broken).count();
        assert_eq!(attempts, 1);
    }

    #[test]
    fn recovery_does_not_end_follow_latest() {
        let mut fx = Fixture::new(&["a.jpg"], false, false);
        fx.surface.failing.insert(fx.path("b.jpg"));
        fx.arrive("b.jpg");

        assert_eq!(fx.shown(), Some(fx.path("a.jpg")));
        assert!(fx.viewer.navigator.follow_latest());

        fx.arrive("c.jpg");
        assert_eq!(fx.shown(), Some(fx.path("c.jpg")));
    }

    #[test]
    fn clearing_broken_list_makes_images_visible_again() {
        let mut fx = Fixture::new(&[], false, false);
        fx.surface.failing.insert(fx.path("a.jpg"));
        fx.arrive("a.jpg");
        assert_eq!(fx.shown(), None);
        assert_eq!(fx.surface.blanks, 2);
        assert!(fx.surface.message.starts_with("1 image(s) in "));
        assert!(fx.surface.message.ends_with("failed to load - press x to retry"));

        fx.surface.failing.clear();
        fx.press(Command::ClearBroken);
        assert!(!fx.viewer.store.is_broken(&fx.path("a.jpg")));
        assert_eq!(fx.shown(), Some(fx.path("a.jpg")));
    }

    #[test]
    fn faster_doubles_speed_and_steps_once() {
        let mut fx = Fixture::new(&["a.jpg", "b.jpg", "c.jpg"], false, false);
        let period = fx.viewer.slideshow.period();
        fx.press(Command::ToggleSlideshow);
        fx.press(Command::Faster);

        assert_eq!(fx.viewer.slideshow.multiplier(), 2.0);
        assert_eq!(fx.shown(), Some(fx.path("b.jpg")));

        fx.advance(period / 4);
        assert_eq!(fx.shown(), Some(fx.path("b.jpg")));
        fx.advance(period / 4);
        assert_eq!(fx.shown(), Some(fx.path("c.jpg")));
        fx.advance(period / 2);
        assert_eq!(fx.shown(), Some(fx.path("a.jpg")));
    }

    #[test]
    fn faster_steps_even_when_slideshow_is_stopped() {
        let mut fx = Fixture::new(&["a.jpg", "b.jpg"], false, false);
        fx.press(Command::Faster);
        assert!(!fx.viewer.slideshow.enabled());
        assert_eq!(fx.shown(), Some(fx.path("b.jpg")));
    }

    #[test]
    fn slower_does_not_step() {
        let mut fx = Fixture::new(&["a.jpg", "b.jpg"], false, false);
        fx.press(Command::Slower);
        assert_eq!(fx.viewer.slideshow.multiplier(), 0.5);
        assert_eq!(fx.shown(), Some(fx.path("a.jpg")));
    }

    #[test]
    fn followed_arrival_stops_the_slideshow() {
        let mut fx = Fixture::new(&["a.jpg"], false, false);
        fx.press(Command::ToggleSlideshow);
        fx.arrive("b.jpg");
        assert!(!fx.viewer.slideshow.enabled());
        assert_eq!(fx.shown(), Some(fx.path("b.jpg")));
    }

    #[test]
    fn paused_updates_ignore_arrivals() {
        let mut fx = Fixture::new(&["a.jpg"], false, false);
        fx.press(Command::ToggleUpdating);
        fx.arrive("b.jpg");
        assert_eq!(fx.viewer.store.len(), 1);

        fx.press(Command::ToggleUpdating);
        fx.advance(Duration::ZERO);
        assert_eq!(fx.viewer.store.len(), 2);
    }

    #[test]
    fn display_toggles_reach_the_surface() {
        let mut fx = Fixture::new(&["a.jpg"], false, false);
        fx.press(Command::ToggleCentered);
        fx.press(Command::ToggleOverlay);
        fx.press(Command::ToggleComment);

        let frame = fx.surface.frames.last().copied().unwrap();
        assert!(frame.centered && frame.overlay && frame.comment);
        assert_eq!((frame.max_width, frame.max_height), (640, 480));
    }

    #[test]
    fn quit_ends_the_loop() {
        let mut fx = Fixture::new(&[], false, false);
        assert_eq!(fx.press(Command::Quit), Flow::Quit);
    }
}
