mod app;
mod camera;
mod setup;

use clap::Parser;
use lumis_radiosity::RadiosityConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lumis")]
#[command(version, about = "Progressive hemicube radiosity viewer", long_about = None)]
struct Args {
    /// TOML file with a [radiosity] table
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scene description ([[model]] tables); the Cornell box when omitted
    #[arg(long, conflicts_with = "load")]
    scene: Option<PathBuf>,

    /// Resume from a saved patch file instead of building a scene
    #[arg(long)]
    load: Option<PathBuf>,

    /// Patch file written after a headless solve, or on F5 in the window
    #[arg(long)]
    save: Option<PathBuf>,

    /// Solve on the CPU without opening a window
    #[arg(long)]
    headless: bool,

    /// Step limit for headless runs
    #[arg(long, default_value_t = 500)]
    steps: u64,

    #[arg(long, default_value_t = 1280)]
    width: i32,

    #[arg(long, default_value_t = 720)]
    height: i32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RadiosityConfig::from_path(path)?,
        None => RadiosityConfig::default(),
    };
    log::info!(target: "lumis", "config: {:?}", config);

    let source = match (&args.load, &args.scene) {
        (Some(path), _) => setup::SceneSource::Patches(path.clone()),
        (None, Some(path)) => setup::SceneSource::Description(path.clone()),
        (None, None) => setup::SceneSource::Cornell,
    };

    if args.headless {
        let scene = source.build(&config)?;
        setup::run_headless(config, scene, args.steps, args.save.as_deref())?;
        return Ok(());
    }
    app::run(config, source, args.save, args.width, args.height)
}
