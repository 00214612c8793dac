use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use cs_app_state::Editor;
use cs_common::{EditorConfig, ElementType};

#[derive(Parser, Debug)]
#[command(name = "canvas-studio", version)]
struct Cli {
    /// Editor config JSON (defaults apply to anything it omits).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a template and summarize its elements.
    Check(InArgs),
    /// Rewrite a template in canonical form.
    Fmt(FmtArgs),
    /// Print the interpolated elements at a point in time.
    Sample(SampleArgs),
    /// Print the timeline lanes.
    Lanes(InArgs),
}

#[derive(Parser, Debug)]
struct InArgs {
    /// Input template JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct FmtArgs {
    /// Input template JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output path; defaults to rewriting the input in place.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Write compact JSON instead of pretty-printed.
    #[arg(long, default_value_t = false)]
    compact: bool,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    /// Input template JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Time in seconds.
    #[arg(long, default_value_t = 0.0)]
    at: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "canvas_studio=info,cs_project=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EditorConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => EditorConfig::default(),
    };

    match cli.cmd {
        Command::Check(args) => cmd_check(config, args),
        Command::Fmt(args) => cmd_fmt(config, args),
        Command::Sample(args) => cmd_sample(config, args),
        Command::Lanes(args) => cmd_lanes(config, args),
    }
}

fn open(config: EditorConfig, path: &Path) -> anyhow::Result<Editor> {
    let mut editor = Editor::new(config);
    editor
        .load_template_file(path)
        .with_context(|| format!("load template '{}'", path.display()))?;
    Ok(editor)
}

fn cmd_check(config: EditorConfig, args: InArgs) -> anyhow::Result<()> {
    let editor = open(config, &args.in_path)?;
    let elements = editor.elements();
    println!("{}: {} elements", args.in_path.display(), elements.len());
    for ty in ElementType::ALL {
        let count = elements.iter().filter(|e| e.element_type() == ty).count();
        if count > 0 {
            println!("  {ty}: {count}");
        }
    }
    let keyframed = elements.iter().filter(|e| !e.keyframes.is_empty()).count();
    if keyframed > 0 {
        println!("  animated: {keyframed}");
    }
    Ok(())
}

fn cmd_fmt(config: EditorConfig, args: FmtArgs) -> anyhow::Result<()> {
    let editor = open(config, &args.in_path)?;
    let out = args.out.unwrap_or_else(|| args.in_path.clone());
    if args.compact {
        let json = cs_project::to_json_string_compact(editor.elements())?;
        std::fs::write(&out, json).with_context(|| format!("write '{}'", out.display()))?;
    } else {
        editor
            .save_template_file(&out)
            .with_context(|| format!("write '{}'", out.display()))?;
    }
    tracing::info!(path = %out.display(), "Formatted template");
    Ok(())
}

fn cmd_sample(config: EditorConfig, args: SampleArgs) -> anyhow::Result<()> {
    let mut editor = open(config, &args.in_path)?;
    editor.seek(args.at);
    let frame = editor.evaluated_elements();
    println!("{}", serde_json::to_string_pretty(&frame)?);
    Ok(())
}

fn cmd_lanes(config: EditorConfig, args: InArgs) -> anyhow::Result<()> {
    let editor = open(config, &args.in_path)?;
    for lane in editor.timeline_lanes() {
        let times: Vec<String> = lane.keyframe_times.iter().map(|t| format!("{t}s")).collect();
        println!(
            "{:<8} {:<6} {:>6.2}s +{:<6.2}s {}  [{}]",
            lane.track_label(),
            lane.label,
            lane.start_time,
            lane.duration,
            lane.element_id,
            times.join(", ")
        );
    }
    Ok(())
}
