use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "imagedraw", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw one image onto a fresh canvas and write a PNG.
    Draw(DrawArgs),
    /// Run a JSON draw script and write a PNG.
    Script(ScriptArgs),
}

#[derive(Parser, Debug)]
struct DrawArgs {
    /// Source image.
    #[arg(long)]
    image: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = 256)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = 256)]
    height: u32,

    /// Destination rectangle as `x,y,w,h`.
    #[arg(long, value_parser = parse_rect)]
    rect: imagedraw::DestRect,

    /// Draw mode.
    #[arg(long, value_enum, default_value_t = ModeChoice::Static)]
    mode: ModeChoice,

    /// Rotation delta in degrees applied on every rotate draw.
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    angle: i32,

    /// Number of draws; rotate draws accumulate their deltas.
    #[arg(long, default_value_t = 1)]
    repeat: u32,

    /// Interpolation for zoom draws (e.g. `nearest_neighbor`, `high_quality_bicubic`).
    #[arg(long, value_parser = parse_interp)]
    interp: Option<imagedraw::InterpolationMode>,

    /// Background color as `RRGGBBAA` hex.
    #[arg(long, value_parser = parse_rgba_hex)]
    clear: Option<[u8; 4]>,

    /// How cache misses read the file [default: `IMAGEDRAW_LOAD_STRATEGY`, else memory].
    #[arg(long, value_enum)]
    load: Option<LoadChoice>,

    /// Print every draw and the cache decode count.
    #[arg(long)]
    verbose: bool,
}

#[derive(Parser, Debug)]
struct ScriptArgs {
    /// Input draw script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Print every draw and the cache decode count.
    #[arg(long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    Static,
    Rotate,
    Zoom,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LoadChoice {
    Memory,
    Filesystem,
}

impl From<LoadChoice> for imagedraw::LoadStrategy {
    fn from(c: LoadChoice) -> Self {
        match c {
            LoadChoice::Memory => imagedraw::LoadStrategy::Memory,
            LoadChoice::Filesystem => imagedraw::LoadStrategy::Filesystem,
        }
    }
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct Script {
    width: u32,
    height: u32,
    #[serde(default)]
    clear: Option<[u8; 4]>,
    #[serde(default)]
    settings: imagedraw::DrawerSettings,
    draws: Vec<ScriptDraw>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum ScriptDraw {
    Static {
        image: PathBuf,
        rect: imagedraw::DestRect,
    },
    Rotate {
        image: PathBuf,
        rect: imagedraw::DestRect,
        #[serde(default)]
        delta: i32,
    },
    Zoom {
        image: PathBuf,
        rect: imagedraw::DestRect,
        #[serde(default)]
        mode: Option<imagedraw::InterpolationMode>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Draw(args) => cmd_draw(args),
        Command::Script(args) => cmd_script(args),
    }
}

fn cmd_draw(args: DrawArgs) -> anyhow::Result<()> {
    let mut settings = imagedraw::DrawerSettings::from_env()?;
    if let Some(load) = args.load {
        settings.load_strategy = load.into();
    }
    if args.verbose {
        eprintln!("load strategy: {}", settings.load_strategy.as_str());
    }
    let drawer = imagedraw::ImageDrawer::with_settings(settings);
    let mut surface = imagedraw::CpuSurface::new(
        args.width,
        args.height,
        &imagedraw::RenderSettings {
            clear_rgba: args.clear,
        },
    )?;

    for i in 0..args.repeat.max(1) {
        match args.mode {
            ModeChoice::Static => drawer.try_draw_image(&mut surface, &args.image, args.rect)?,
            ModeChoice::Rotate => {
                drawer.try_draw_image_rotation(&mut surface, &args.image, args.rect, args.angle)?
            }
            ModeChoice::Zoom => {
                drawer.try_draw_image_zoom(&mut surface, &args.image, args.rect, args.interp)?
            }
        }
        if args.verbose {
            eprintln!(
                "draw {i}: {:?} {} angle={}",
                args.mode,
                args.image.display(),
                drawer.engine().current_angle()
            );
        }
    }

    if args.verbose {
        eprintln!("decodes: {}", drawer.cache().decode_count());
    }
    write_png(&mut surface, &args.out)
}

fn cmd_script(args: ScriptArgs) -> anyhow::Result<()> {
    let script = read_script_json(&args.in_path)?;
    let root = args.in_path.parent().unwrap_or_else(|| Path::new("."));

    let drawer = imagedraw::ImageDrawer::with_settings(script.settings);
    let mut surface = imagedraw::CpuSurface::new(
        script.width,
        script.height,
        &imagedraw::RenderSettings {
            clear_rgba: script.clear,
        },
    )?;

    let mut failed = 0usize;
    for (i, draw) in script.draws.iter().enumerate() {
        let (image, ok) = match draw {
            ScriptDraw::Static { image, rect } => {
                let path = root.join(image);
                let ok = drawer.draw_image(&mut surface, &path, *rect);
                (path, ok)
            }
            ScriptDraw::Rotate { image, rect, delta } => {
                let path = root.join(image);
                let ok = drawer.draw_image_rotation(&mut surface, &path, *rect, *delta);
                (path, ok)
            }
            ScriptDraw::Zoom { image, rect, mode } => {
                let path = root.join(image);
                let ok = drawer.draw_image_zoom(&mut surface, &path, *rect, *mode);
                (path, ok)
            }
        };
        if !ok {
            failed += 1;
            eprintln!("draw {i} failed: {}", image.display());
        } else if args.verbose {
            eprintln!("draw {i}: {}", image.display());
        }
    }

    if args.verbose {
        eprintln!("decodes: {}", drawer.cache().decode_count());
    }
    write_png(&mut surface, &args.out)?;

    if failed > 0 {
        anyhow::bail!("{failed} of {} draws failed", script.draws.len());
    }
    Ok(())
}

fn read_script_json(path: &Path) -> anyhow::Result<Script> {
    let f = File::open(path).with_context(|| format!("open script '{}'", path.display()))?;
    let r = BufReader::new(f);
    let script: Script = serde_json::from_reader(r).with_context(|| "parse script JSON")?;
    Ok(script)
}

fn write_png(surface: &mut imagedraw::CpuSurface, out: &Path) -> anyhow::Result<()> {
    let frame = surface.readback()?;

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    frame
        .to_rgba_image()?
        .save_with_format(out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", out.display()))?;

    eprintln!("wrote {}", out.display());
    Ok(())
}

fn parse_rect(s: &str) -> Result<imagedraw::DestRect, String> {
    imagedraw::DestRect::parse(s).map_err(|e| e.to_string())
}

fn parse_interp(s: &str) -> Result<imagedraw::InterpolationMode, String> {
    imagedraw::InterpolationMode::parse(s).map_err(|e| e.to_string())
}

fn parse_rgba_hex(s: &str) -> Result<[u8; 4], String> {
    let s = s.trim_start_matches('#');
    if s.len() != 8 || !s.is_ascii() {
        return Err(format!("expected RRGGBBAA, got '{s}'"));
    }
    let mut out = [0u8; 4];
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16)
            .map_err(|_| format!("invalid hex color '{s}'"))?;
    }
    Ok(out)
}
