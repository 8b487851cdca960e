use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use milestone_export::assets::fonts::FontBook;
use milestone_export::stats::cosmic::compute_cosmic;
use milestone_export::stats::elapsed::compute_elapsed;
use milestone_export::{
    DeliveryMode, DeliveryOutcome, DirectoryHost, EngineSettings, ExportConfig, Exported,
    Exporter, FrameClock, MilestonePayload, OutputKind, Payload, Profile, StaticFormat,
    SteppedClock, VideoStyle, WallClock,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "milestone-export", version)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Engine settings JSON; environment overrides still apply.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export a static card (PNG, SVG or PDF).
    Still(StillArgs),
    /// Export an animated stat video (requires `ffmpeg` on PATH).
    Video(VideoArgs),
    /// Print elapsed and cosmic stats as JSON.
    Stats(StatsArgs),
}

#[derive(Parser, Debug)]
struct RequestArgs {
    /// Request JSON: `{ "profile": {...}, "milestone": {...} | null, "config": {...} }`.
    #[arg(long)]
    request: PathBuf,

    /// Directory the artifact is written to.
    #[arg(long)]
    out_dir: PathBuf,

    /// Avatar image, overriding the request.
    #[arg(long)]
    avatar: Option<PathBuf>,

    /// Cover image, overriding the request.
    #[arg(long)]
    cover: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct StillArgs {
    #[command(flatten)]
    req: RequestArgs,

    /// Output format, overriding the request config.
    #[arg(long)]
    format: Option<StaticFormat>,
}

#[derive(Parser, Debug)]
struct VideoArgs {
    #[command(flatten)]
    req: RequestArgs,

    /// Video style, overriding the request config.
    #[arg(long)]
    style: Option<VideoStyle>,

    /// Length in seconds, overriding the request config.
    #[arg(long)]
    duration: Option<u32>,

    /// Pace frames against the wall clock instead of rendering as fast as possible.
    #[arg(long, default_value_t = false)]
    realtime: bool,
}

#[derive(Parser, Debug)]
struct StatsArgs {
    /// Date of birth, `YYYY-MM-DD`.
    #[arg(long)]
    birth: NaiveDate,

    /// Time of birth, `HH:MM`.
    #[arg(long, default_value = "00:00")]
    time: String,

    /// Instant to measure to, `YYYY-MM-DDTHH:MM:SS`; defaults to now.
    #[arg(long)]
    at: Option<NaiveDateTime>,
}

#[derive(serde::Deserialize, Debug)]
struct Request {
    profile: Profile,
    #[serde(default)]
    milestone: Option<MilestonePayload>,
    #[serde(default)]
    config: ExportConfig,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Still(args) => cmd_still(args, cli.settings.as_deref()),
        Command::Video(args) => cmd_video(args, cli.settings.as_deref()),
        Command::Stats(args) => cmd_stats(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<EngineSettings> {
    let settings = match path {
        Some(p) => EngineSettings::from_path(p)?.with_env_overrides()?,
        None => EngineSettings::from_env()?,
    };
    Ok(settings)
}

fn read_request(args: &RequestArgs) -> anyhow::Result<Request> {
    let text = std::fs::read_to_string(&args.request)
        .with_context(|| format!("read request '{}'", args.request.display()))?;
    let mut req: Request =
        serde_json::from_str(&text).with_context(|| "parse request JSON")?;
    if let Some(p) = &args.avatar {
        req.profile.avatar =
            Some(std::fs::read(p).with_context(|| format!("read avatar '{}'", p.display()))?);
    }
    if let Some(p) = &args.cover {
        req.profile.cover =
            Some(std::fs::read(p).with_context(|| format!("read cover '{}'", p.display()))?);
    }
    Ok(req)
}

fn payload_for(req: &Request, now: NaiveDateTime) -> anyhow::Result<Payload> {
    Ok(match &req.milestone {
        Some(m) => Payload::Milestone(m.clone()),
        None => {
            let birth = req.profile.birth_instant()?;
            Payload::Stats(milestone_export::StatPayload::between(birth, now))
        }
    })
}

fn exporter(
    req: &Request,
    config: ExportConfig,
    settings: EngineSettings,
    out_dir: &Path,
) -> anyhow::Result<Exporter<DirectoryHost>> {
    let fonts = FontBook::load(settings.font_path.as_deref());
    Ok(Exporter::with_ffmpeg(
        config,
        req.profile.clone(),
        settings,
        fonts,
        DirectoryHost::new(out_dir),
    )?)
}

fn report(exported: &Exported) {
    match &exported.outcome {
        DeliveryOutcome::Delivered { location: Some(p) } => println!("{}", p.display()),
        DeliveryOutcome::Delivered { location: None } => println!("{}", exported.artifact.filename),
        DeliveryOutcome::Skipped { reason } => eprintln!("not delivered: {reason}"),
    }
}

fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

fn cmd_still(args: StillArgs, settings: Option<&Path>) -> anyhow::Result<()> {
    let req = read_request(&args.req)?;
    let mut config = req.config;
    if let Some(format) = args.format {
        config.output = OutputKind::Static { format };
    }
    if matches!(config.output, OutputKind::Animated { .. }) {
        anyhow::bail!("request config selects a video; use the `video` subcommand or --format");
    }
    let settings = load_settings(settings)?;
    let now = now();
    let payload = payload_for(&req, now)?;
    let mut ex = exporter(&req, config, settings, &args.req.out_dir)?;
    let exported = ex
        .export_static(&payload, DeliveryMode::Download, now)
        .map_err(|e| anyhow::anyhow!("{}: {e}", e.user_notice()))?;
    report(&exported);
    Ok(())
}

fn cmd_video(args: VideoArgs, settings: Option<&Path>) -> anyhow::Result<()> {
    let req = read_request(&args.req)?;
    let mut config = req.config;
    let (mut duration_secs, mut style) = match config.output {
        OutputKind::Animated {
            duration_secs,
            style,
        } => (duration_secs, style),
        OutputKind::Static { .. } => (10, VideoStyle::default()),
    };
    duration_secs = args.duration.unwrap_or(duration_secs);
    style = args.style.unwrap_or(style);
    config.output = OutputKind::Animated {
        duration_secs,
        style,
    };

    let settings = load_settings(settings)?;
    let now = now();
    let payload = payload_for(&req, now)?;
    let mut ex = exporter(&req, config, settings, &args.req.out_dir)?;
    let mut clock: Box<dyn FrameClock> = if args.realtime {
        Box::new(WallClock::start())
    } else {
        Box::new(SteppedClock::new(ex.engine().fps()))
    };
    let exported = ex
        .export_animated(&payload, DeliveryMode::Download, now, clock.as_mut())
        .map_err(|e| anyhow::anyhow!("{}: {e}", e.user_notice()))?;
    report(&exported);
    Ok(())
}

fn cmd_stats(args: StatsArgs) -> anyhow::Result<()> {
    let time = NaiveTime::parse_from_str(args.time.trim(), "%H:%M")
        .with_context(|| format!("invalid --time '{}' (expected HH:MM)", args.time))?;
    let birth = args.birth.and_time(time);
    let at = args.at.unwrap_or_else(now);
    let out = serde_json::json!({
        "birth": birth,
        "at": at,
        "elapsed": compute_elapsed(birth, at),
        "cosmic": compute_cosmic(birth, at),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
