mod demo;
mod hud;
mod term;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use demo::Demo;
use rec3d_config::{load_engine_config, DEFAULT_CONFIG_PATH};
use rec3d_model::{CameraSpec, SceneFile, SpaceSpec};
use rec3d_render::{
    build_map, launch, Camera, ConsoleRenderer, Controls, Point, RenderSettings, Vector,
    VectorSpace,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use term::{TerminalDisplay, TerminalInput};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rec3d", version, about = "Ray-cast 3D scenes in the terminal")]
struct Cli {
    /// Engine configuration with the [SPACE] frame and optional [CAMERA] defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON scene file to explore.
    #[arg(long, conflicts_with = "demo")]
    scene: Option<PathBuf>,

    /// Built-in scene, used when no --scene is given.
    #[arg(long, value_enum, default_value_t = Demo::Arch)]
    demo: Demo,

    /// Screen height in cells; the width is twice this.
    #[arg(long)]
    height: Option<usize>,

    /// Horizontal field of view in degrees.
    #[arg(long)]
    fov: Option<f64>,

    #[arg(long, default_value_t = 0.5)]
    move_step: f64,

    #[arg(long, default_value_t = 10.0)]
    turn_step: f64,

    /// Input polling window per frame.
    #[arg(long, default_value_t = 50)]
    tick_ms: u64,

    /// Distance that maps to the faintest glyph.
    #[arg(long, default_value_t = 20.0)]
    max_distance: f64,

    /// Render threads (0 = rayon default).
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Write logs here instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "rec3d_render=trace". Overrides RUST_LOG.
    #[arg(long)]
    log_level: Option<String>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref(), cli.log_file.as_deref())?;

    let (space_spec, config_camera) = load_config(cli.config.as_deref())?;
    let space = VectorSpace::try_from(&space_spec).context("invalid [SPACE] section")?;

    let scene = match &cli.scene {
        Some(path) => read_scene(path)?,
        None => cli.demo.scene(),
    };
    let map = build_map(&scene, space).context("invalid scene")?;

    let flags = CameraSpec {
        position: None,
        facing: None,
        fov: cli.fov,
        height: cli.height,
    };
    let camera_spec = flags
        .or(&scene.camera.clone().unwrap_or_default())
        .or(&config_camera);
    let camera = build_camera(&camera_spec, space)?;

    let settings = RenderSettings {
        max_distance: cli.max_distance,
        threads: cli.threads,
    };
    let renderer = ConsoleRenderer::new(map, camera, settings)?;
    let controls = Controls {
        move_step: cli.move_step,
        turn_step: cli.turn_step,
    };

    let quit = install_quit_handler()?;
    let mut input = TerminalInput::new(Duration::from_millis(cli.tick_ms), quit);
    let mut display = TerminalDisplay::new().context("failed to set up terminal")?;
    let result = launch(renderer, controls, &mut input, &mut display);
    drop(display);

    let frames = result?;
    tracing::info!(frames, "exited");
    Ok(())
}

fn init_logging(level: Option<&str>, log_file: Option<&Path>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level)
            .map_err(|err| anyhow!("invalid --log-level {level:?}: {err}"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            let file = fs::File::create(path)
                .map_err(|err| anyhow!("failed to create log file {:?}: {}", path, err))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

/// Reads the engine config, `engine_config.cfg` in the working directory
/// unless `--config` names another file. A missing file is an error.
fn load_config(path: Option<&Path>) -> Result<(SpaceSpec, CameraSpec)> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
    let config = load_engine_config(path)?;
    Ok((config.space, config.camera))
}

/// Turns SIGINT and SIGTERM into a quit flag checked at tick boundaries.
fn install_quit_handler() -> Result<Arc<AtomicBool>> {
    let quit = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&quit);
    ctrlc::set_handler(move || handler_flag.store(true, Ordering::SeqCst))
        .map_err(|err| anyhow!("failed to install signal handler: {err}"))?;
    Ok(quit)
}

fn read_scene(path: &Path) -> Result<SceneFile> {
    let contents = fs::read_to_string(path)
        .map_err(|err| anyhow!("failed to read scene {:?}: {}", path, err))?;
    let scene: SceneFile = serde_json::from_str(&contents)
        .map_err(|err| anyhow!("failed to parse scene {:?}: {}", path, err))?;
    tracing::debug!(path = %path.display(), primitives = scene.primitives.len(), "loaded scene");
    Ok(scene)
}

fn default_camera() -> CameraSpec {
    CameraSpec {
        position: Some([-6.0, 2.0, 0.0]),
        facing: Some([1.0, 0.0, 0.0]),
        fov: Some(90.0),
        height: Some(20),
    }
}

fn build_camera(spec: &CameraSpec, space: VectorSpace) -> Result<Camera> {
    let defaults = default_camera();
    let spec = spec.clone().or(&defaults);
    let position = spec.position.map(Point::from).unwrap_or_else(Point::origin);
    let facing = spec.facing.map(Vector::from).unwrap_or_default();
    let fov = spec.fov.unwrap_or_default();
    let height = spec.height.unwrap_or_default();

    Camera::new(position, facing, fov, height, space).context("invalid camera")
}
