use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::store::Ordering;

const KEYS_HELP: &str = "\
navigation keys:
  <Escape>, q, Q   Quit
  <Left>, p, P     Go to previous image
  <Right>, n, N    Go to next image
  <Home>, h, H     Go to the first image in the folder
  <End>, E         Go to the last image in the folder
  <Space>          Toggle the slideshow
  +                Double the speed of the slideshow and step on
  -                Halve the speed of the slideshow
  c                Toggle centring of images
  e                Toggle display of the histogram and EXIF info
  i                Toggle the EXIF user comment in the info display
  x                Clear the list of images skipped because they failed to load
  u                Toggle automatic updating";

/// Display images as they appear in a hot folder
#[derive(Parser, Debug)]
#[command(version, about, after_help = KEYS_HELP)]
pub struct Args {
    /// Path to hot folder
    pub directory: PathBuf,

    /// Width of app window (defaults to the display width)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i32::MAX as i64))]
    pub width: Option<u32>,

    /// Height of app window (defaults to the display height)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i32::MAX as i64))]
    pub height: Option<u32>,

    /// Disable window manager decoration
    #[arg(long)]
    pub bare: bool,

    /// Ring the terminal bell when new images appear
    #[arg(long)]
    pub bell: bool,

    /// Sort images into alphabetical order
    #[arg(long)]
    pub sort: bool,

    /// Print debug info to standard error
    #[arg(long)]
    pub debug: bool,

    /// Randomise the order in which newly found images are added
    #[arg(long)]
    pub randomise: bool,

    /// Include subdirectories in the scan
    #[arg(long)]
    pub treewalk: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("hot folder {0} does not exist")]
    Missing(PathBuf),

    #[error("hot folder {0} is not a directory")]
    NotADirectory(PathBuf),
}

/// Validated startup settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub directory: PathBuf,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub bare: bool,
    pub bell: bool,
    pub ordering: Ordering,
    pub debug: bool,
    pub randomise: bool,
    pub treewalk: bool,
}

impl Settings {
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        if !args.directory.exists() {
            return Err(ConfigError::Missing(args.directory));
        }
        if !args.directory.is_dir() {
            return Err(ConfigError::NotADirectory(args.directory));
        }
        Ok(Self {
            directory: args.directory,
            width: args.width,
            height: args.height,
            bare: args.bare,
            bell: args.bell,
            ordering: if args.sort {
                Ordering::Alphabetical
            } else {
                Ordering::Arrival
            },
            debug: args.debug,
            randomise: args.randomise,
            treewalk: args.treewalk,
        })
    }
}
