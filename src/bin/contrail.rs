use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "contrail",
    version,
    about = "Render the rocket flyby as a PNG frame sequence"
)]
struct Cli {
    /// Output directory for frame_####.png files.
    #[arg(long, default_value = "frames")]
    out_dir: PathBuf,

    /// Number of frames to render.
    #[arg(long, default_value_t = 300)]
    frames: u32,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Rockets per formation.
    #[arg(long, default_value_t = 5)]
    count: u32,

    /// Start anchor: left|right|top|bottom|center|random.
    #[arg(long, default_value = "random")]
    start: String,

    /// Determinism seed.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Optional sprite image (PNG/JPEG); vector art is used when omitted.
    #[arg(long)]
    image: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let start: contrail::AnchorSpec =
        serde_json::from_value(serde_json::Value::String(cli.start.clone()))
            .with_context(|| format!("invalid start anchor '{}'", cli.start))?;

    let canvas = contrail::Canvas::new(cli.width, cli.height)?;
    let mut opts = contrail::FlybyOptions::new(canvas);
    opts.start = start;
    opts.count = cli.count;
    opts.seed = cli.seed;
    opts.image = cli.image.clone();

    let mut flyby = contrail::Flyby::start(opts)?;

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("create output dir '{}'", cli.out_dir.display()))?;

    for i in 0..cli.frames {
        let (_status, frame) = flyby.frame()?;
        let mut rgba = frame.data;
        unpremultiply_rgba8_in_place(&mut rgba);

        let path = cli.out_dir.join(format!("frame_{i:04}.png"));
        image::save_buffer_with_format(
            &path,
            &rgba,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
    }

    flyby.stop();
    Ok(())
}

// PNG expects straight alpha; frames come out premultiplied.
fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}
