use std::path::{Path, PathBuf};

use thiserror::Error;

/// How the current image should be laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub max_width: u32,
    pub max_height: u32,
    pub centered: bool,
    pub overlay: bool,
    pub comment: bool,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },
}

/// Something the viewer can draw images on.
pub trait Surface {
    /// Shows the image at `path` scaled down to fit the frame.
    fn render(&mut self, path: &Path, frame: &Frame) -> Result<(), RenderError>;

    /// Shows an empty surface with a short message.
    fn blank(&mut self, message: &str);

    /// Audible alert for new arrivals.
    fn bell(&mut self);
}
