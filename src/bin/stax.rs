use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use stax::{
    AssetRegistry, BlockShaper, DirSource, Game, LayeredSource, ParleyShaper, SceneConfig,
    ScriptedInput, TextShaper,
};

/// Platform path list of extra asset directories, searched after `--assets`.
const ASSET_DIRS_ENV: &str = "STAX_ASSET_DIRS";

#[derive(Parser, Debug)]
#[command(name = "stax", version)]
struct Cli {
    /// Log at debug level.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the stacks and animations of a staxie file as JSON.
    Inspect(InspectArgs),
    /// Run a scene headless and save the last frame as a PNG.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input staxie PNG.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Asset directory; repeat for more, earlier ones win.
    #[arg(long = "assets")]
    assets: Vec<PathBuf>,

    /// Ticks to run before drawing.
    #[arg(long, default_value_t = 1)]
    ticks: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read staxie '{}'", args.in_path.display()))?;
    let staxie = stax::decode_staxie_metadata(&bytes)
        .with_context(|| format!("decode staxie '{}'", args.in_path.display()))?;
    let json = serde_json::to_string_pretty(&staxie.summary())?;
    println!("{json}");
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = SceneConfig::from_path(&args.scene)?;
    let scene_dir = args.scene.parent().unwrap_or_else(|| Path::new("."));

    let mut source = LayeredSource::new();
    for dir in asset_dirs(&args.assets, scene_dir) {
        tracing::debug!(dir = %dir.display(), "asset layer");
        source.push(DirSource::new(dir));
    }
    let mut assets = AssetRegistry::init(source);

    let shaper: Box<dyn TextShaper> = match &config.font {
        Some(path) => {
            let id = assets.load_font(path)?;
            Box::new(ParleyShaper::new(assets.font(id)?.to_vec())?)
        }
        None => Box::new(BlockShaper),
    };

    let mut game = Game::from_config(&config, assets, shaper)?;
    let mut input = ScriptedInput::new(config.input.clone());
    for tick in 0..args.ticks {
        input.seek(tick);
        game.update(&input)?;
    }
    let frame = game.render_frame()?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    frame
        .to_rgba_image()?
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    tracing::debug!(stats = ?game.assets().stats(), "assets");
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

/// `--assets` flags, then the environment list, then the scene's own directory.
fn asset_dirs(flags: &[PathBuf], scene_dir: &Path) -> Vec<PathBuf> {
    let mut dirs = flags.to_vec();
    if let Some(list) = std::env::var_os(ASSET_DIRS_ENV) {
        dirs.extend(std::env::split_paths(&list).filter(|p| !p.as_os_str().is_empty()));
    }
    dirs.push(scene_dir.to_path_buf());
    dirs
}
