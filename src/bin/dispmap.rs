use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use dispmap::{DispError, Image, LogSink, PacedKeys, PixelFormat, Preview, PreviewConfig};
use tracing_subscriber::EnvFilter;

/// Exit status for unreadable inputs, a target without alpha, or a target larger than the map.
const STARTUP_FAILURE: u8 = 255;

#[derive(Parser, Debug)]
#[command(name = "dispmap", version, about = "Animated displacement map filter preview")]
struct Cli {
    /// Opaque map image whose colour channels drive the displacement.
    #[arg(long, default_value = "map.jpg")]
    map: PathBuf,

    /// Target image; must have a transparency channel.
    #[arg(long, default_value = "target.png")]
    target: PathBuf,

    /// JSON preview preset. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Map channel driving horizontal displacement.
    #[arg(long, value_enum)]
    component_x: Option<ChannelChoice>,

    /// Map channel driving vertical displacement.
    #[arg(long, value_enum)]
    component_y: Option<ChannelChoice>,

    /// Horizontal displacement strength (may be negative).
    #[arg(long, allow_negative_numbers = true)]
    scale_x: Option<i32>,

    /// Vertical displacement strength (may be negative).
    #[arg(long, allow_negative_numbers = true)]
    scale_y: Option<i32>,

    /// Pixels the crop window advances per frame.
    #[arg(long)]
    step: Option<u32>,

    /// Frame pacing in milliseconds.
    #[arg(long)]
    frame_ms: Option<u64>,

    /// Stop after this many frames, as if the quit key had been pressed.
    #[arg(long)]
    max_frames: Option<u64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ChannelChoice {
    Blue,
    Green,
    Red,
}

impl From<ChannelChoice> for dispmap::Channel {
    fn from(choice: ChannelChoice) -> Self {
        match choice {
            ChannelChoice::Blue => Self::Blue,
            ChannelChoice::Green => Self::Green,
            ChannelChoice::Red => Self::Red,
        }
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            let startup = err
                .downcast_ref::<DispError>()
                .is_some_and(DispError::is_startup_fatal);
            if startup {
                ExitCode::from(STARTUP_FAILURE)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;

    let map = dispmap::load_image(&cli.map, PixelFormat::Bgr8)?;
    describe("map", &cli.map, &map);

    let target = dispmap::load_image_unchanged(&cli.target)?;
    describe("target", &cli.target, &target);

    let preview = Preview::new(map.view(), target.view(), config)?;
    let mut sink = LogSink::new();
    let mut keys = PacedKeys::new(cli.max_frames, preview.config().quit_key);

    let report = preview.run(&mut sink, &mut keys)?;
    eprintln!(
        "showed {} frames (last offset {}, {:?})",
        sink.frames_shown(),
        report.last_offset,
        report.outcome
    );
    Ok(())
}

fn resolve_config(cli: &Cli) -> anyhow::Result<PreviewConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("read preset '{}'", path.display()))?;
            PreviewConfig::from_json(&json)?
        }
        None => PreviewConfig::default(),
    };

    if let Some(c) = cli.component_x {
        config.displace.component_x = c.into();
    }
    if let Some(c) = cli.component_y {
        config.displace.component_y = c.into();
    }
    if let Some(s) = cli.scale_x {
        config.displace.scale_x = s;
    }
    if let Some(s) = cli.scale_y {
        config.displace.scale_y = s;
    }
    if let Some(step) = cli.step {
        config.step = step;
    }
    if let Some(ms) = cli.frame_ms {
        config.frame_interval_ms = ms;
    }

    tracing::debug!(?config, "resolved preview config");
    Ok(config)
}

fn describe(role: &str, path: &Path, image: &Image) {
    tracing::info!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        channels = image.channels(),
        "loaded {role}"
    );
}
