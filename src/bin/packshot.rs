use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use packshot::{
    BitmapLoader, Compositor, DeliveryChain, DeliveryOutcome, EncodedImage, ExportOutcome,
    Exporter, FontBook, FsResolver, LiveView, LoadOutcome, PackshotConfig, ParamsPatch,
    SourceRef, StateStore,
};

#[derive(Parser, Debug)]
#[command(name = "packshot", version)]
struct Cli {
    /// Configuration file (JSON). Defaults to the platform config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the composition at its canvas size.
    Render(RenderArgs),
    /// Export the composition at a resolution multiplier.
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Parameter patch as JSON, or `@path` to read it from a file. Applied in order.
    #[arg(long = "patch")]
    patches: Vec<String>,

    /// Product photo.
    #[arg(long)]
    image: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Resolution multiplier applied to the canvas size.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Output PNG path. Without it the image goes through the delivery chain.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Run the delivery chain even when `--out` is given.
    #[arg(long, default_value_t = false)]
    deliver: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = PackshotConfig::load(cli.config.as_deref())?;
    packshot::init_logging(&cfg.logging);

    match cli.cmd {
        Command::Render(args) => cmd_render(&cfg, args).await,
        Command::Export(args) => cmd_export(&cfg, args).await,
    }
}

async fn cmd_render(cfg: &PackshotConfig, args: RenderArgs) -> anyhow::Result<()> {
    let view = build_view(cfg, &args.scene).await?;
    let frame = view
        .frame()
        .context("live view produced no frame")?;
    let image = EncodedImage::png(&frame.surface)?;
    write_png(&args.out, &image)?;
    eprintln!("wrote {} ({})", args.out.display(), image.size());
    Ok(())
}

async fn cmd_export(cfg: &PackshotConfig, args: ExportArgs) -> anyhow::Result<()> {
    let view = build_view(cfg, &args.scene).await?;
    let exporter = Exporter::new(view.compositor().clone());
    let image = match exporter.export(&view, args.scale)? {
        ExportOutcome::Exported(image) => image,
        ExportOutcome::Unavailable => anyhow::bail!("nothing rendered yet, export unavailable"),
    };

    if let Some(out) = &args.out {
        write_png(out, &image)?;
        eprintln!("wrote {} ({})", out.display(), image.size());
    }
    if args.out.is_none() || args.deliver {
        let report = DeliveryChain::from_config(&cfg.delivery)
            .deliver(&image)
            .await;
        for attempt in &report.attempts {
            eprintln!("{}: {:?}", attempt.kind, attempt.result);
        }
        for notice in &report.notices {
            eprintln!("{notice}");
        }
        if report.outcome == DeliveryOutcome::Undelivered {
            anyhow::bail!("{} could not be delivered", image.file_name());
        }
    }
    Ok(())
}

async fn build_view(cfg: &PackshotConfig, scene: &SceneArgs) -> anyhow::Result<LiveView> {
    let store = StateStore::new();
    let mut patch = ParamsPatch::default();
    for raw in &scene.patches {
        patch = patch.merged(&read_patch(raw)?);
    }
    store.apply(&patch);

    let loader = BitmapLoader::new(FsResolver::new());
    if let Some(path) = &scene.image {
        match loader.load(Some(SourceRef::from(path.as_path()))).await {
            LoadOutcome::Failed { failure, .. } => {
                anyhow::bail!("failed to load '{}': {}", failure.source, failure.reason)
            }
            outcome => tracing::debug!(?outcome, "product photo loaded"),
        }
    }

    let compositor = Arc::new(Compositor::new(FontBook::system(&cfg.fonts)));
    let mut view = LiveView::new(compositor, &store, &loader);
    view.refresh()?;
    Ok(view)
}

fn read_patch(raw: &str) -> anyhow::Result<ParamsPatch> {
    let json = match raw.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("read patch file '{path}'"))?,
        None => raw.to_string(),
    };
    ParamsPatch::from_json(&json).with_context(|| format!("parse patch '{raw}'"))
}

fn write_png(path: &Path, image: &EncodedImage) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, image.bytes())
        .with_context(|| format!("write png '{}'", path.display()))
}
