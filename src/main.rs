use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use raylib::prelude::*;

mod canvas;
mod config;
mod constants;
mod exif_info;
mod histogram;
mod keys;
mod logging;
mod navigator;
mod slideshow;
mod store;
mod surface;
mod texture_loader;
mod viewer;
mod watcher;

use crate::canvas::{Canvas, RaylibSurface};
use crate::config::{Args, Settings};
use crate::constants::FPS;
use crate::viewer::{Flow, Viewer};

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_tracing(args.debug);

    // Bad folder is reported before any window exists
    let settings = Settings::from_args(args)?;
    tracing::debug!("watching {}", settings.directory.display());

    let mut builder = raylib::init();
    builder.size(
        settings.width.unwrap_or(0) as i32,
        settings.height.unwrap_or(0) as i32,
    );
    builder.title("Image Viewer");
    if settings.bare {
        builder.undecorated();
    }
    let (mut rl, thread) = builder.build();
    rl.set_target_fps(FPS);
    rl.set_exit_key(None);
    rl.set_trace_log(if settings.debug {
        TraceLogLevel::LOG_WARNING
    } else {
        TraceLogLevel::LOG_ERROR
    });

    // --- Window size: requested, else the whole display ---
    let monitor = raylib::core::window::get_current_monitor();
    let width = settings
        .width
        .unwrap_or_else(|| raylib::core::window::get_monitor_width(monitor).max(1) as u32);
    let height = settings
        .height
        .unwrap_or_else(|| raylib::core::window::get_monitor_height(monitor).max(1) as u32);
    rl.set_window_size(width as i32, height as i32);
    rl.set_window_position(0, 0);

    let mut viewer = Viewer::new(&settings, width, height);
    let mut canvas = Canvas::new();
    viewer.load_existing(&mut RaylibSurface::new(&mut rl, &thread, &mut canvas));

    // --- Main Loop ---
    while !rl.window_should_close() {
        let now = Instant::now();
        let commands = keys::poll_commands(&mut rl);

        let mut surface = RaylibSurface::new(&mut rl, &thread, &mut canvas);
        let mut flow = Flow::Continue;
        for command in commands {
            flow = viewer.handle(command, now, &mut surface);
            if flow == Flow::Quit {
                break;
            }
        }
        if flow == Flow::Quit {
            tracing::debug!("quit");
            break;
        }
        viewer.tick(now, &mut surface);

        let mut d = rl.begin_drawing(&thread);
        canvas.draw(&mut d);
    }

    Ok(())
}
