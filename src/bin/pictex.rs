use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use pictex::BoxModel as _;

#[derive(Parser, Debug)]
#[command(name = "pictex", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recreate the flattened image described by an overlay document.
    Render(RenderArgs),
    /// Print the computed geometry of every overlay as JSON.
    Layout(LayoutArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input overlay document (JSON).
    doc: PathBuf,

    /// Output PNG path.
    #[arg(short, long)]
    out: PathBuf,

    /// Directory relative image sources resolve against. Defaults to the document's directory.
    #[arg(long)]
    root: Option<PathBuf>,

    /// Clear color painted under the composition, e.g. `#ffffff`.
    #[arg(long)]
    clear: Option<String>,

    /// Extra font file to register (repeatable).
    #[arg(long = "font")]
    fonts: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Input overlay document (JSON).
    doc: PathBuf,

    /// Directory relative image sources resolve against. Defaults to the document's directory.
    #[arg(long)]
    root: Option<PathBuf>,
}

#[derive(serde::Serialize)]
struct LayoutReport {
    base_width: f64,
    base_height: f64,
    overlays: Vec<OverlayGeometry>,
}

#[derive(serde::Serialize)]
struct OverlayGeometry {
    index: usize,
    kind: &'static str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Layout(args) => cmd_layout(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn loader_for(doc: &Path, root: Option<PathBuf>) -> pictex::FileLoader {
    let root = root.unwrap_or_else(|| {
        doc.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf()
    });
    pictex::FileLoader::new().with_root(root)
}

fn read_doc(path: &Path) -> anyhow::Result<pictex::OverlayDocument> {
    pictex::OverlayDocument::from_path(path)
        .with_context(|| format!("read overlay document '{}'", path.display()))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let doc = read_doc(&args.doc)?;
    let loader = loader_for(&args.doc, args.root);

    let clear_rgba = args
        .clear
        .as_deref()
        .map(|s| {
            s.parse::<pictex::Color>()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("parse --clear '{s}'"))
        })
        .transpose()?
        .map(|c| [c.r, c.g, c.b, c.a]);

    let text = args
        .fonts
        .into_iter()
        .fold(pictex::TextEngineOpts::from_env(), |opts, f| opts.with_font_file(f));
    let opts = pictex::RendererOpts::default()
        .with_clear_rgba(clear_rgba)
        .with_text(text);

    let mut comp = pictex::Composition::import(&doc, &loader);
    let mut renderer = pictex::Renderer::with_loader(opts, loader).context("create renderer")?;
    let frame = comp.render(&mut renderer).context("render composition")?;

    pictex::save_png(frame, &args.out)?;
    eprintln!("wrote {} ({}x{})", args.out.display(), frame.width, frame.height);
    Ok(())
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let doc = read_doc(&args.doc)?;
    let loader = loader_for(&args.doc, args.root);

    let mut comp = pictex::Composition::import(&doc, &loader);
    let opts = pictex::RendererOpts::default().with_text(pictex::TextEngineOpts::from_env());
    let mut renderer = pictex::Renderer::with_loader(opts, loader).context("create renderer")?;
    comp.layout(&mut renderer);

    let base = comp.base_size();
    let report = LayoutReport {
        base_width: base.width,
        base_height: base.height,
        overlays: comp
            .overlays()
            .iter()
            .enumerate()
            .map(|(index, n)| {
                let (x, y) = n.position();
                let s = n.computed_size();
                OverlayGeometry {
                    index,
                    kind: n.kind(),
                    x,
                    y,
                    width: s.width,
                    height: s.height,
                }
            })
            .collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serialize layout report")?
    );
    Ok(())
}
