use std::time::Duration;

pub const FPS: u32 = 30;                                       // Frames per second of the event loop
pub const POLL_INTERVAL: Duration = Duration::from_millis(250); // Time between hot folder scans
pub const SLIDESHOW_INTERVAL: Duration = Duration::from_secs(10); // Time each slide is shown at speed x1

pub const MIN_SPEED: f64 = 1.0 / 64.0;                         // Slowest slideshow multiplier
pub const MAX_SPEED: f64 = 32.0;                               // Fastest slideshow multiplier

pub const BACKGROUND: (u8, u8, u8) = (0x40, 0x40, 0x40);       // Window background colour
pub const JPEG_EXTENSIONS: &[&str] = &["jpg", "jpeg"];         // Files picked up from the hot folder

pub const HISTOGRAM_LEVELS: usize = 256;                       // One bin per luminosity value
pub const HISTOGRAM_HEIGHT: i32 = 128;                         // Height of the drawn histogram (pixels)
pub const OVERLAY_MARGIN: i32 = 10;                            // Gap between overlay and window edge
pub const OVERLAY_FONT_SIZE: i32 = 10;
pub const COMMENT_WRAP: usize = 60;                            // Column at which EXIF comments wrap
