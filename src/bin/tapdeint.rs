use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "tapdeint", version)]
struct Cli {
    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Deinterlace a Y4M stream into a progressive Y4M stream.
    Run(RunArgs),
    /// Write the luma plane of one output frame as a grayscale PNG.
    Frame(FrameArgs),
    /// Print an xxh3 fingerprint for every output frame.
    Hash(HashArgs),
}

#[derive(clap::Args, Debug)]
struct JobArgs {
    /// JSON job config; flags given on the command line take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// 0 = double-rate (one frame per field), 1 = single-rate.
    #[arg(long)]
    mode: Option<i64>,

    /// 1 = top field first, 0 = bottom field first. Defaults to the stream header.
    #[arg(long)]
    tff: Option<i64>,

    /// Kernel backend.
    #[arg(long, value_enum)]
    backend: Option<BackendChoice>,

    /// Fetch frames of a chunk in parallel.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for parallel rendering.
    #[arg(long)]
    threads: Option<usize>,

    /// Frames per chunk.
    #[arg(long)]
    chunk_size: Option<usize>,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Input Y4M.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output Y4M.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    job: JobArgs,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input Y4M.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    job: JobArgs,
}

#[derive(Parser, Debug)]
struct HashArgs {
    /// Input Y4M.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[command(flatten)]
    job: JobArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendChoice {
    Cpu,
    Gpu,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Hash(args) => cmd_hash(args),
    }
}

fn load_job(args: &JobArgs) -> anyhow::Result<tapdeint::JobConfig> {
    let mut job = match &args.config {
        Some(path) => tapdeint::JobConfig::from_path(path)?,
        None => tapdeint::JobConfig::default(),
    };
    if args.mode.is_some() {
        job.mode = args.mode;
    }
    if args.tff.is_some() {
        job.tff = args.tff;
    }
    if let Some(choice) = args.backend {
        job.backend = match choice {
            BackendChoice::Cpu => tapdeint::BackendKind::Cpu,
            BackendChoice::Gpu => tapdeint::BackendKind::Gpu,
        };
    }
    if args.parallel {
        job.threading.parallel = true;
    }
    if args.threads.is_some() {
        job.threading.threads = args.threads;
    }
    if let Some(n) = args.chunk_size {
        job.threading.chunk_size = n;
    }
    Ok(job)
}

/// Open the source and wire it through the registered `Bob` filter.
fn build_graph(
    in_path: &Path,
    job: &tapdeint::JobConfig,
) -> anyhow::Result<(tapdeint::Core, tapdeint::Clip)> {
    let source = tapdeint::Y4mClip::open(in_path)
        .with_context(|| format!("open y4m '{}'", in_path.display()))?;
    let params = job.bob_params(source.field_based())?;
    let mode = match params.mode {
        tapdeint::Mode::DoubleRate => 0,
        tapdeint::Mode::SingleRate => 1,
    };
    let tff = match params.field_order {
        tapdeint::FieldOrder::TopFirst => 1,
        tapdeint::FieldOrder::BottomFirst => 0,
    };

    let core = tapdeint::Core::with_backend(job.backend).context("create kernel backend")?;
    let mut registry = tapdeint::Registry::new();
    tapdeint::register(&mut registry)?;

    let mut args = tapdeint::Args::new();
    args.set_clip("clip", tapdeint::Clip::new(source))
        .set_int("mode", mode)
        .set_int("tff", tff);
    let clip = registry.invoke(tapdeint::BOB_FILTER, &args, &core)?;

    tracing::info!(
        backend = core.kernel().name(),
        mode = ?params.mode,
        field_order = ?params.field_order,
        frames = clip.info().num_frames,
        fps = clip.info().fps.as_f64(),
        "graph ready"
    );
    Ok((core, clip))
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let job = load_job(&args.job)?;
    let (core, clip) = build_graph(&args.in_path, &job)?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let mut sink = tapdeint::Y4mSink::create(&args.out)
        .with_context(|| format!("create '{}'", args.out.display()))?;

    let range = tapdeint::FrameRange::full(clip.info().num_frames);
    let stats = tapdeint::render_range(&core, &clip, range, &job.threading, &mut sink)?;

    tracing::info!(frames = stats.frames_total, "wrote {}", args.out.display());
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let job = load_job(&args.job)?;
    let (core, clip) = build_graph(&args.in_path, &job)?;

    let frame = core.get_frame(&clip, tapdeint::FrameIndex(args.frame))?;
    let luma = frame.plane(0).view();
    let mut data = Vec::with_capacity(luma.width() * luma.height());
    for y in 0..luma.height() {
        data.extend_from_slice(luma.row(y));
    }

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &data,
        frame.width(),
        frame.height(),
        image::ColorType::L8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    tracing::info!("wrote {}", args.out.display());
    Ok(())
}

/// Prints `index<TAB>fingerprint` per frame.
struct HashSink;

impl tapdeint::FrameSink for HashSink {
    fn begin(&mut self, _cfg: tapdeint::SinkConfig) -> tapdeint::DeintResult<()> {
        Ok(())
    }

    fn push_frame(
        &mut self,
        idx: tapdeint::FrameIndex,
        frame: &tapdeint::FrameRef,
    ) -> tapdeint::DeintResult<()> {
        println!("{}\t{:016x}", idx.0, tapdeint::frame_fingerprint(frame));
        Ok(())
    }

    fn end(&mut self) -> tapdeint::DeintResult<()> {
        Ok(())
    }
}

fn cmd_hash(args: HashArgs) -> anyhow::Result<()> {
    let job = load_job(&args.job)?;
    let (core, clip) = build_graph(&args.in_path, &job)?;
    let range = tapdeint::FrameRange::full(clip.info().num_frames);
    tapdeint::render_range(&core, &clip, range, &job.threading, &mut HashSink)?;
    Ok(())
}
