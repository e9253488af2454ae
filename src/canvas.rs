use std::io::Write;
use std::path::Path;

use chrono::Local;
use raylib::prelude::*;

use crate::constants::*;
use crate::exif_info::ExifSummary;
use crate::histogram::{bar_heights, luminance_histogram};
use crate::surface::{Frame, RenderError, Surface};
use crate::texture_loader::{LoadedImage, fit_within, load_image_with_exif_rotation};

const TITLE: &str = "Image Viewer";

fn background() -> Color {
    let (r, g, b) = BACKGROUND;
    Color::new(r, g, b, 255)
}

/// Histogram bars and EXIF text drawn over the image.
struct Overlay {
    bars: Vec<i32>,
    lines: Vec<String>,
    // Measured width of each line in the default font
    widths: Vec<i32>,
}

impl Overlay {
    fn new(rl: &RaylibHandle, image: &Image, summary: ExifSummary, path: &Path, comment: bool) -> Self {
        let pixels = image.get_image_data();
        let bins = luminance_histogram(pixels.iter().map(|c| (c.r, c.g, c.b)));
        let name = path.file_name().map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let time = Local::now().format("%H:%M:%S").to_string();
        let lines = summary.lines(&name, &time, comment);
        let widths = lines.iter().map(|line| rl.measure_text(line, OVERLAY_FONT_SIZE)).collect();
        Self {
            bars: bar_heights(&bins, HISTOGRAM_HEIGHT),
            lines,
            widths,
        }
    }

    fn draw(&self, d: &mut RaylibDrawHandle, width: i32) {
        let levels = HISTOGRAM_LEVELS as i32;
        let origin_x = width - OVERLAY_MARGIN - levels;
        let origin_y = OVERLAY_MARGIN + HISTOGRAM_HEIGHT;

        d.draw_rectangle(origin_x, OVERLAY_MARGIN, levels, HISTOGRAM_HEIGHT, Color::new(0x20, 0x20, 0x20, 255));
        for (x, height) in self.bars.iter().enumerate() {
            let x = origin_x + x as i32;
            d.draw_line(x, origin_y, x, origin_y - height, Color::WHITE);
        }

        // Text is right aligned under the histogram, on a background patch
        // so it stays readable over a light image
        let line_height = OVERLAY_FONT_SIZE + 2;
        let right = origin_x + levels;
        let top = origin_y + 20;
        let lefts = align_right(&self.widths, right);
        let patch_left = lefts.iter().copied().min().unwrap_or(right);
        d.draw_rectangle(
            patch_left,
            top,
            right - patch_left,
            line_height * self.lines.len() as i32,
            background(),
        );
        for (i, (line, x)) in self.lines.iter().zip(lefts).enumerate() {
            d.draw_text(line, x, top + i as i32 * line_height, OVERLAY_FONT_SIZE, Color::WHITE);
        }
    }
}

/// Left edge of each line so that all of them end at `right`.
fn align_right(widths: &[i32], right: i32) -> Vec<i32> {
    widths.iter().map(|width| right - width).collect()
}

struct Shown {
    texture: Texture2D,
    centered: bool,
    bounds: (i32, i32),
    overlay: Option<Overlay>,
}

/// What is on screen between two redraw requests. Raylib redraws every
/// frame, so the last rendered image is kept here.
pub struct Canvas {
    shown: Option<Shown>,
    message: String,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self {
            shown: None,
            message: String::new(),
        }
    }

    pub fn draw(&self, d: &mut RaylibDrawHandle) {
        d.clear_background(background());

        let Some(shown) = &self.shown else {
            d.draw_text(&self.message, 20, 20, 20, Color::LIGHTGRAY);
            return;
        };
        let (width, height) = shown.bounds;
        let (x, y) = if shown.centered {
            (
                (width - shown.texture.width()) / 2,
                (height - shown.texture.height()) / 2,
            )
        } else {
            (0, 0)
        };
        d.draw_texture(&shown.texture, x, y, Color::WHITE);

        if let Some(overlay) = &shown.overlay {
            overlay.draw(d, width);
        }
    }
}

/// The raylib window as seen by the viewer for one frame.
pub struct RaylibSurface<'a> {
    rl: &'a mut RaylibHandle,
    thread: &'a RaylibThread,
    canvas: &'a mut Canvas,
}

impl<'a> RaylibSurface<'a> {
    pub fn new(rl: &'a mut RaylibHandle, thread: &'a RaylibThread, canvas: &'a mut Canvas) -> Self {
        Self { rl, thread, canvas }
    }
}

impl Surface for RaylibSurface<'_> {
    fn render(&mut self, path: &Path, frame: &Frame) -> Result<(), RenderError> {
        let LoadedImage { mut image, exif } = load_image_with_exif_rotation(path)?;

        let (width, height) = (image.width() as u32, image.height() as u32);
        let (fit_width, fit_height) = fit_within(width, height, frame.max_width, frame.max_height);
        if (fit_width, fit_height) != (width, height) {
            image.resize(fit_width as i32, fit_height as i32);
        }

        let overlay = frame.overlay.then(|| {
            let summary = exif.as_ref().map(ExifSummary::from_exif).unwrap_or_default();
            Overlay::new(self.rl, &image, summary, path, frame.comment)
        });

        let texture = self
            .rl
            .load_texture_from_image(self.thread, &image)
            .map_err(|e| RenderError::Decode {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        // Unload the Image data from CPU memory
        drop(image);

        self.rl.set_window_title(
            self.thread,
            &format!("{TITLE} - {width}x{height} - {}", path.display()),
        );
        self.canvas.shown = Some(Shown {
            texture,
            centered: frame.centered,
            bounds: (frame.max_width as i32, frame.max_height as i32),
            overlay,
        });
        Ok(())
    }

    fn blank(&mut self, message: &str) {
        self.rl.set_window_title(self.thread, TITLE);
        self.canvas.shown = None;
        self.canvas.message = message.to_string();
    }

    // Only audible when started from a terminal
    fn bell(&mut self) {
        let mut stdout = std::io::stdout();
        if let Err(e) = stdout.write_all(b"\x07").and_then(|()| stdout.flush()) {
            tracing::debug!("failed to ring bell: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_end_at_the_histogram_edge() {
        // Narrow and wide glyph lines measure differently but share the right edge
        let lefts = align_right(&[42, 130, 0], 500);
        assert_eq!(lefts, [458, 370, 500]);
        for (left, width) in lefts.iter().zip([42, 130, 0]) {
            assert_eq!(left + width, 500);
        }
    }

    #[test]
    fn no_lines_means_no_offsets() {
        assert!(align_right(&[], 500).is_empty());
    }
}
