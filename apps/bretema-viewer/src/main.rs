//! Bretema Engine Demo Viewer
//!
//! Opens a window and clears it through the Vulkan renderer, or runs the same
//! loop headless. Optionally imports a glTF file and logs what it contains.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p bretema-viewer -- [OPTIONS]
//! ```
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level (e.g., info, debug, trace)

mod args;

use bretema_app::{init_logging, App, AppConfig, Camera, RenderApi, Renderer};
use glam::{Vec3, Vec4};
use tracing::{debug, info};

use crate::args::ViewerArgs;

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;

fn main() -> anyhow::Result<()> {
    let args = ViewerArgs::from_env()?;
    if args.help {
        print_help();
        return Ok(());
    }

    init_logging();

    if let Some(path) = &args.gltf {
        let group = bretema_import::parse_file(path)?;
        info!("Loaded {} meshes from {}", group.len(), path.display());
        debug!("{group}");
    }

    let api = if args.headless {
        RenderApi::Headless
    } else {
        RenderApi::Vulkan
    };

    let mut config = AppConfig::new("Bretema Viewer").with_size(WIDTH, HEIGHT);
    if let Some(fps) = args.fps {
        config = config.with_target_fps(fps);
    }
    if let Some(frames) = args.frame_limit() {
        config = config.with_max_frames(frames);
    }

    let mut app = App::new("Bretema Viewer", api).with_config(config);
    app.add_camera(
        Camera::new("Overview")
            .with_position(Vec3::new(0.0, 4.0, 12.0))
            .with_clear_color(Vec4::new(0.05, 0.08, 0.12, 1.0)),
    );
    app.run_loop()?;

    if let Some(renderer) = app.renderer() {
        info!("Rendered {} frames", renderer.frame_number());
    }
    Ok(())
}

fn print_help() {
    eprintln!(
        "Bretema Engine Demo Viewer

USAGE:
    cargo run -p bretema-viewer -- [OPTIONS]

OPTIONS:
    --headless              Run without a window or GPU
    --frames <N>            Stop after N loop iterations
                            (default: unlimited, 120 when headless)
    --fps <N>               Cap the loop at N iterations per second
    --gltf <PATH>           Import a .gltf/.glb file and log its meshes
    -h, --help              Print this help message

EXAMPLES:
    # Windowed viewer
    cargo run -p bretema-viewer

    # Headless smoke run
    cargo run -p bretema-viewer -- --headless --frames 300

ENVIRONMENT VARIABLES:
    RUST_LOG                Set log level (e.g., info, debug, trace)"
    );
}
