/// Planar Mirror terminal viewer
///
/// Loads a triangulated OBJ model and renders it above a reflecting floor.
/// Controls:
///   - WASD / Arrow Keys: Rotate the model
///   - E/R: Roll rotation
///   - C: Cycle material
///   - P: Toggle perspective / orthographic projection
///   - L: Reload the model from disk
///   - Q/ESC: Quit
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use mirror_core::{Camera, Material, MeshResource, MirrorPlane, RawMesh, Scene};
use mirror_terminal::{TerminalApp, MODEL_SIZE};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{fmt::writer::BoxMakeWriter, EnvFilter};

#[derive(Parser)]
#[command(name = "mirror-terminal")]
#[command(author, version, about = "OBJ viewer with a planar mirror floor")]
struct Cli {
    /// OBJ file to display (a cube is shown when omitted)
    model: Option<PathBuf>,

    /// Initial material preset (clay, gold, jade, ruby, silver)
    #[arg(long, short = 'm', default_value = "clay")]
    material: String,

    /// Height of the mirror floor
    #[arg(long, default_value_t = -2.0, allow_hyphen_values = true)]
    mirror_height: f32,

    /// Half side length of the square mirror
    #[arg(long, default_value_t = 3.0)]
    mirror_size: f32,

    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Write logs to this file instead of discarding them while the viewer runs
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the load report and exit without starting the viewer
    #[arg(long)]
    inspect: bool,
}

fn init_logging(cli: &Cli) -> io::Result<()> {
    // The viewer owns the terminal, so logs only reach stderr when inspecting
    let writer = match &cli.log_file {
        Some(path) => BoxMakeWriter::new(Mutex::new(File::create(path)?)),
        None if cli.inspect => BoxMakeWriter::new(io::stderr),
        None => BoxMakeWriter::new(io::sink),
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(LevelFilter::INFO.into()))
        .with_writer(writer)
        .with_ansi(cli.log_file.is_none())
        .init();
    Ok(())
}

fn load_model(cli: &Cli) -> io::Result<MeshResource> {
    let to_io = |e: mirror_core::ObjError| io::Error::new(io::ErrorKind::InvalidData, e);

    match &cli.model {
        Some(path) => {
            let mut resource = MeshResource::empty();
            resource.load(path).map_err(to_io)?;
            Ok(resource)
        }
        None => MeshResource::from_raw(&RawMesh::cube(MODEL_SIZE)).map_err(to_io),
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let material = Material::preset(&cli.material).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "unknown material '{}', expected one of: {}",
                cli.material,
                Material::PRESET_NAMES.join(", ")
            ),
        )
    })?;

    let model = load_model(&cli)?;

    if cli.inspect {
        match model.report() {
            Some(report) => {
                println!("lines:               {}", report.lines);
                println!("triangles:           {}", report.triangle_count);
                println!("normals synthesized: {}", report.normals_synthesized);
                println!("skipped lines:       {}", report.skipped.len());
                for skipped in &report.skipped {
                    println!("  {:>6}: {}", skipped.line, skipped.text);
                }
            }
            None => println!("built-in cube: {} triangles", model.mesh().triangle_count()),
        }
        return Ok(());
    }

    info!(
        "Starting viewer with {} triangles",
        model.mesh().triangle_count()
    );

    let (width, height) = crossterm::terminal::size()?;
    let scene = Scene::new(
        model,
        MirrorPlane::floor(cli.mirror_height, cli.mirror_size),
        material,
        Camera::new(width as u32, height as u32 * 2),
    );

    let mut app = TerminalApp::new(scene, &cli.material, cli.fps)?;
    app.run()
}
