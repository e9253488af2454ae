use std::fs;
use std::io::Cursor;
use std::path::Path;
use raylib::prelude::*;
use exif::{Exif, In, Reader, Tag, Value};

use crate::surface::RenderError;

/// A decoded image, upright, plus whatever EXIF it carried.
pub struct LoadedImage {
    pub image: Image,
    pub exif: Option<Exif>,
}

// --- Load Image, Apply EXIF Orientation ---
pub fn load_image_with_exif_rotation(image_path: &Path) -> Result<LoadedImage, RenderError> {
    let file_bytes = fs::read(image_path).map_err(|source| RenderError::Read {
        path: image_path.to_path_buf(),
        source,
    })?;

    // A partially written file has no usable EXIF; that is not an error by itself
    let exif = match Reader::new().read_from_container(&mut Cursor::new(&file_bytes)) {
        Ok(exif) => Some(exif),
        Err(e) => {
            tracing::debug!("no EXIF data for {}: {}", image_path.display(), e);
            None
        }
    };
    let orientation = exif.as_ref().map_or(1, exif_orientation);

    // Provide extension hint for loading from memory
    let extension = image_path.extension().and_then(|s| s.to_str()).unwrap_or("jpg").to_lowercase();
    let mut image = Image::load_image_from_mem(&format!(".{extension}"), &file_bytes)
        .map_err(|e| RenderError::Decode {
            path: image_path.to_path_buf(),
            reason: e.to_string(),
        })?;
    if image.width() <= 0 || image.height() <= 0 {
        return Err(RenderError::Decode {
            path: image_path.to_path_buf(),
            reason: "image has no pixels".to_string(),
        });
    }

    // 1 = Normal, 2 = Mirrored, 3 = 180 deg, 4 = Flipped,
    // 5 = Transposed, 6 = 90 deg CW, 7 = Transversed, 8 = 90 deg CCW
    match orientation {
        2 => image.flip_horizontal(),
        3 => {
            image.rotate_cw();
            image.rotate_cw();
        }
        4 => image.flip_vertical(),
        5 => {
            image.rotate_cw();
            image.flip_horizontal();
        }
        6 => image.rotate_cw(),
        7 => {
            image.rotate_ccw();
            image.flip_horizontal();
        }
        8 => image.rotate_ccw(),
        _ => {}
    }
    if orientation != 1 {
        tracing::debug!("applied EXIF orientation {} to {}", orientation, image_path.display());
    }

    Ok(LoadedImage { image, exif })
}

fn exif_orientation(exif: &Exif) -> u16 {
    match exif.get_field(Tag::Orientation, In::PRIMARY).map(|f| &f.value) {
        Some(Value::Short(values)) => values.first().copied().unwrap_or(1),
        _ => 1,
    }
}

/// Size of a `width` x `height` image shrunk to fit the bounds with its
/// aspect ratio kept. Images that already fit keep their size.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 || (width <= max_width && height <= max_height) {
        return (width, height);
    }
    let scale = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );
    let fitted = |side: u32, max: u32| ((side as f64 * scale).round() as u32).clamp(1, max.max(1));
    (fitted(width, max_width), fitted(height, max_height))
}
