use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "retrofx", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the preset catalog as JSON.
    Presets,
    /// Filter an image and write a JPEG.
    Apply(ApplyArgs),
}

#[derive(Parser, Debug)]
struct ApplyArgs {
    /// Input image (any format the `image` crate decodes).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output JPEG path, or a directory to write `retro-<brand>-<name>.jpg` into.
    #[arg(long)]
    out: PathBuf,

    /// Preset id (see `retrofx presets`).
    #[arg(long)]
    preset: Option<String>,

    /// Override one effect, e.g. `--set grain=0.4 --set lightLeak=true`. Applied after
    /// `--preset` and `--params`.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// Full effect parameter set as JSON (missing fields take identity values).
    #[arg(long)]
    params: Option<PathBuf>,

    /// Use the narrow-viewport working size.
    #[arg(long)]
    narrow: bool,

    /// Editor config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for grain and sparkles.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Presets => cmd_presets(),
        Command::Apply(args) => cmd_apply(args),
    }
}

fn cmd_presets() -> anyhow::Result<()> {
    let json =
        serde_json::to_string_pretty(retrofx::presets()).context("serialize preset catalog")?;
    println!("{json}");
    Ok(())
}

fn load_config(args: &ApplyArgs) -> anyhow::Result<retrofx::EditorConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let s = std::fs::read_to_string(path)
                .with_context(|| format!("read config '{}'", path.display()))?;
            retrofx::EditorConfig::from_json_str(&s)?
        }
        None => retrofx::EditorConfig::default(),
    }
    .with_env_overrides();
    if args.narrow {
        cfg.viewport = retrofx::ViewportClass::Narrow;
    }
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn parse_assignment(raw: &str) -> anyhow::Result<(retrofx::EffectKey, retrofx::EffectValue)> {
    let (key, value) = raw
        .split_once('=')
        .with_context(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key: retrofx::EffectKey = key.parse()?;
    let value = retrofx::EffectValue::parse_for(key, value)?;
    Ok((key, value))
}

fn mime_for(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    image::ImageFormat::from_extension(&ext)
        .map(|f| f.to_mime_type().to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string())
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args)?;
    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read image '{}'", args.in_path.display()))?;

    let mut editor = retrofx::Editor::new(cfg)?;
    let now = Instant::now();

    if let Some(id) = &args.preset {
        editor.select_preset(id, now)?;
    }
    if let Some(path) = &args.params {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read params '{}'", path.display()))?;
        let params: retrofx::EffectParameters =
            serde_json::from_str(&s).with_context(|| "parse effect parameters JSON")?;
        editor.set_params(params, now);
    }
    for raw in &args.set {
        let (key, value) = parse_assignment(raw)?;
        editor.edit(key, value, now)?;
    }

    let mime = mime_for(&args.in_path);
    match editor.upload(&mime, &bytes, now)? {
        retrofx::UploadOutcome::Ignored => {
            anyhow::bail!("'{}' is not a supported image", args.in_path.display())
        }
        retrofx::UploadOutcome::Accepted { width, height } => {
            tracing::info!(width, height, "loaded source image");
        }
    }

    editor.settle(now)?;
    let exported = editor.export()?;

    let out = if args.out.is_dir() {
        args.out.join(&exported.filename)
    } else {
        args.out.clone()
    };
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&out, &exported.bytes)
        .with_context(|| format!("write jpeg '{}'", out.display()))?;

    eprintln!(
        "wrote {} ({}x{})",
        out.display(),
        exported.width,
        exported.height
    );
    Ok(())
}
