use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "matboard", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a framed-photo preview as a PNG.
    Preview(PreviewArgs),
    /// Validate a frame spec JSON and print the solved layout.
    Validate(ValidateArgs),
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Frame spec JSON.
    #[arg(long)]
    spec: PathBuf,

    /// Photo to frame.
    #[arg(long)]
    photo: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Surface width in pixels.
    #[arg(long, default_value_t = 480)]
    width: u32,

    /// Surface height in pixels.
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Backdrop color as straight-alpha `r,g,b` (default is transparent).
    #[arg(long, value_parser = parse_rgb)]
    backdrop: Option<(u8, u8, u8)>,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Frame spec JSON.
    #[arg(long)]
    spec: PathBuf,

    /// Surface width in pixels.
    #[arg(long, default_value_t = 480)]
    width: u32,

    /// Surface height in pixels.
    #[arg(long, default_value_t = 480)]
    height: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Preview(args) => cmd_preview(args),
        Command::Validate(args) => cmd_validate(args),
    }
}

fn read_spec_json(path: &Path) -> anyhow::Result<matboard::FrameSpec> {
    let f = File::open(path).with_context(|| format!("open spec '{}'", path.display()))?;
    let r = BufReader::new(f);
    let spec: matboard::FrameSpec =
        serde_json::from_reader(r).with_context(|| "parse frame spec JSON")?;
    Ok(spec)
}

fn parse_rgb(s: &str) -> Result<(u8, u8, u8), String> {
    let parts: Vec<_> = s.split(',').collect();
    if parts.len() != 3 {
        return Err("expected r,g,b".to_string());
    }
    let parse = |p: &str| p.trim().parse::<u8>().map_err(|e| e.to_string());
    Ok((parse(parts[0])?, parse(parts[1])?, parse(parts[2])?))
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let spec = read_spec_json(&args.spec)?;
    spec.validate()?;

    // Texture paths in the spec resolve next to the spec file.
    let assets_root = args.spec.parent().unwrap_or_else(|| Path::new("."));
    let mut store = matboard::ImageStore::new(assets_root);

    let photo_path = std::path::absolute(&args.photo)
        .with_context(|| format!("resolve photo path '{}'", args.photo.display()))?;
    let photo_source = photo_path.to_string_lossy().into_owned();
    let decoded = store.get_or_load(&photo_source)?;
    let photo = matboard::PhotoAsset::new(photo_source, decoded.width, decoded.height)?;

    let mut surface = matboard::Surface::new(args.width, args.height)?;
    let opts = matboard::RenderOpts {
        backdrop: args
            .backdrop
            .map(|(r, g, b)| matboard::Rgba8Premul::opaque(r, g, b)),
        ..matboard::RenderOpts::default()
    };
    let mut session = matboard::RenderSession::new(opts);
    let report = session.render(&mut surface, &photo, &spec, &mut store)?;

    if report.texture_fallback {
        eprintln!("warning: material texture failed to load; used flat tint");
    }

    let rgba = surface.to_straight_rgba8();
    let img = image::RgbaImage::from_raw(surface.width, surface.height, rgba)
        .context("assemble output image")?;
    img.save(&args.out)
        .with_context(|| format!("write PNG '{}'", args.out.display()))?;

    println!(
        "wrote {} ({}x{}, photo {}, generation {})",
        args.out.display(),
        args.width,
        args.height,
        orientation_label(&photo),
        report.generation
    );
    Ok(())
}

fn orientation_label(photo: &matboard::PhotoAsset) -> &'static str {
    match photo.orientation() {
        matboard::Orientation::Portrait => "portrait",
        matboard::Orientation::Landscape => "landscape",
        matboard::Orientation::Square => "square",
    }
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let spec = read_spec_json(&args.spec)?;
    spec.validate()?;

    let layout = matboard::layout::solve(args.width, args.height, &spec)?;
    println!("{}", serde_json::to_string_pretty(&layout)?);
    Ok(())
}
