use std::time::{Duration, Instant};

use crate::constants::{MAX_SPEED, MIN_SPEED};

/// Timer that periodically asks for the next image.
///
/// The timer is a deadline checked from the event loop; nothing fires on
/// its own.
#[derive(Debug)]
pub struct Slideshow {
    interval: Duration,
    multiplier: f64,
    due: Option<Instant>,
}

impl Slideshow {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            multiplier: 1.0,
            due: None,
        }
    }

    pub fn enabled(&self) -> bool {
        self.due.is_some()
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Time between two advances at the current speed.
    pub fn period(&self) -> Duration {
        self.interval.div_f64(self.multiplier)
    }

    pub fn toggle(&mut self, now: Instant) -> bool {
        if self.enabled() {
            self.stop();
        } else {
            self.due = Some(now + self.period());
        }
        self.enabled()
    }

    pub fn stop(&mut self) {
        self.due = None;
    }

    pub fn speed_up(&mut self, now: Instant) {
        self.multiplier = (self.multiplier * 2.0).min(MAX_SPEED);
        self.reschedule(now);
    }

    pub fn slow_down(&mut self, now: Instant) {
        self.multiplier = (self.multiplier / 2.0).max(MIN_SPEED);
        self.reschedule(now);
    }

    /// Returns true when a running slideshow is due to advance, and arms
    /// the following deadline.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = Some(now + self.period());
                true
            }
            _ => false,
        }
    }

    fn reschedule(&mut self, now: Instant) {
        if self.enabled() {
            self.due = Some(now + self.period());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: Duration = Duration::from_secs(8);

    #[test]
    fn disabled_slideshow_never_fires() {
        let mut show = Slideshow::new(T);
        let start = Instant::now();
        assert!(!show.fire(start + T * 10));
    }

    #[test]
    fn fires_every_interval_once_enabled() {
        let mut show = Slideshow::new(T);
        let start = Instant::now();
        assert!(show.toggle(start));

        assert!(!show.fire(start + T / 2));
        assert!(show.fire(start + T));
        assert!(!show.fire(start + T + T / 2));
        assert!(show.fire(start + T * 2));
    }

    #[test]
    fn speed_up_halves_the_period() {
        let mut show = Slideshow::new(T);
        let start = Instant::now();
        show.toggle(start);
        show.speed_up(start);

        assert_eq!(show.multiplier(), 2.0);
        assert_eq!(show.period(), T / 2);
        assert!(!show.fire(start + T / 4));
        assert!(show.fire(start + T / 2));
        assert!(show.fire(start + T));
    }

    #[test]
    fn toggling_keeps_the_multiplier() {
        let mut show = Slideshow::new(T);
        let start = Instant::now();
        show.speed_up(start);
        show.toggle(start);
        assert!(!show.toggle(start));
        assert_eq!(show.multiplier(), 2.0);
        assert!(show.toggle(start));
        assert_eq!(show.period(), T / 2);
    }

    #[test]
    fn multiplier_is_bounded() {
        let mut show = Slideshow::new(T);
        let now = Instant::now();
        for _ in 0..64 {
            show.speed_up(now);
        }
        assert_eq!(show.multiplier(), MAX_SPEED);
        for _ in 0..128 {
            show.slow_down(now);
        }
        assert_eq!(show.multiplier(), MIN_SPEED);
        assert!(show.period() > Duration::ZERO);
    }
}
