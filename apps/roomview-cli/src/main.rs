use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use roomview_camera::{Camera, CameraController, ControllerSettings, Projection};
use roomview_config::{RoomConfig, WallConfigStore};
use roomview_geometry::{build_edges, build_prism};
use roomview_input::ControlKey;
use roomview_render::{RecordingBackend, RenderLoop, Viewport};
use roomview_scene::{SceneAssembler, SceneSettings};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roomview-cli", about = "Headless tools for the room visualizer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the generated mesh of a prism (or its edge borders) as JSON
    Geometry {
        #[arg(long, default_value = "1.0")]
        length: f32,
        #[arg(long, default_value = "1.0")]
        height: f32,
        #[arg(long, default_value = "1.0")]
        width: f32,
        /// Emit the 12 edge-border prisms with this thickness instead
        #[arg(long)]
        edges: Option<f32>,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Fly the camera with held keys for a while and print the last frame
    Fly {
        /// YAML file with room and wall settings
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Key codes held for the whole flight, e.g. KeyW or ArrowLeft
        #[arg(long = "hold")]
        held: Vec<String>,
        /// Simulated seconds
        #[arg(long, default_value = "1.0")]
        seconds: f64,
        /// Simulated frames per second
        #[arg(long, default_value = "60")]
        fps: u32,
        #[arg(long, default_value = "800")]
        viewport_width: u32,
        #[arg(long, default_value = "600")]
        viewport_height: u32,
        #[arg(long)]
        orthographic: bool,
        #[arg(long)]
        unclamped_pitch: bool,
    },
    /// Load a room configuration, report suspicious values and print it
    Config {
        /// YAML file; defaults are printed when omitted
        path: Option<PathBuf>,
        /// Exit with an error when any value is outside the panel ranges
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Serialize)]
struct FlightReport {
    frames: u64,
    camera: Camera,
    forward: [f32; 3],
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<RoomConfig> {
    match path {
        Some(path) => RoomConfig::load(path)
            .with_context(|| format!("loading room config from {}", path.display())),
        None => Ok(RoomConfig::default()),
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Geometry {
            length,
            height,
            width,
            edges,
            pretty,
        } => match edges {
            Some(thickness) => {
                print_json(&build_edges(length, height, width, thickness), pretty)?;
            }
            None => print_json(&build_prism(length, height, width), pretty)?,
        },
        Commands::Fly {
            config,
            held,
            seconds,
            fps,
            viewport_width,
            viewport_height,
            orthographic,
            unclamped_pitch,
        } => {
            if fps == 0 {
                bail!("--fps must be positive");
            }
            let mut keys = Vec::with_capacity(held.len());
            for code in &held {
                match ControlKey::from_code(code) {
                    Some(key) => keys.push(key),
                    None => bail!("unknown key code {code:?}"),
                }
            }

            let mut store = WallConfigStore::new(load_config(config.as_ref())?);
            let assembler = SceneAssembler::new(&mut store, SceneSettings::default());

            let mut settings = ControllerSettings::default();
            if unclamped_pitch {
                settings.pitch_limit = None;
            }
            let (mut controller, input) = CameraController::new(Camera::default(), settings);
            for key in &keys {
                input.key_event(key.code(), true, false);
            }

            let mut render_loop = RenderLoop::new(Viewport::new(viewport_width, viewport_height));
            if orthographic {
                render_loop.projection = Projection::Orthographic;
            }
            let mut backend = RecordingBackend::with_history(1);

            let frames = (seconds * fps as f64).round() as u64;
            for frame in 0..=frames {
                let now = frame as f64 / fps as f64;
                render_loop.tick(now, &mut controller, assembler.scene(), &mut backend);
            }

            let camera = *controller.camera();
            print_json(
                &FlightReport {
                    frames: render_loop.frame(),
                    camera,
                    forward: camera.forward().to_array(),
                },
                true,
            )?;
            print!("{}", backend.summary());
        }
        Commands::Config { path, strict } => {
            let config = load_config(path.as_ref())?;
            let suspicious = config.out_of_range_fields();
            for field in &suspicious {
                tracing::warn!(%field, "value outside panel range");
            }
            print!("{}", config.to_yaml()?);
            if strict && !suspicious.is_empty() {
                bail!("{} value(s) outside panel ranges", suspicious.len());
            }
        }
    }

    Ok(())
}
