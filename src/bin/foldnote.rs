use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use foldnote::{
    GreetingConfig, GreetingSession, ParleyMeasurer, RecordingSink, SessionEvent, TextMeasurer,
};

#[derive(Parser, Debug)]
#[command(name = "foldnote", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the grid plan for a viewport width as JSON.
    Plan(PlanArgs),
    /// Drive a session through shuffle, open and close, printing one JSON line per event.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Viewport width in pixels.
    #[arg(long)]
    width: f64,

    /// Optional config JSON (breakpoint table).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Optional config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of notes in the bowl.
    #[arg(long)]
    notes: u32,

    /// Frame budget for the whole run.
    #[arg(long, default_value_t = 2000)]
    frames: u64,

    /// Seconds per frame.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,

    /// Shape text with this font file instead of the fixed-advance measurer.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Poster image for the wall; repeatable. Missing files are skipped.
    #[arg(long = "image")]
    images: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Plan(args) => cmd_plan(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn read_config(path: Option<&Path>) -> anyhow::Result<GreetingConfig> {
    match path {
        Some(p) => GreetingConfig::from_json_path(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(GreetingConfig::default()),
    }
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let cfg = read_config(args.config.as_deref())?;
    let plan = foldnote::plan(args.width, &cfg.grid.breakpoints);
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

fn make_measurer(
    cfg: &GreetingConfig,
    font: Option<&Path>,
) -> anyhow::Result<Box<dyn TextMeasurer>> {
    let Some(path) = font else {
        return Ok(Box::new(cfg.text.fixed_measurer()?));
    };
    let bytes =
        std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
    let m = ParleyMeasurer::new(
        &bytes,
        cfg.text.font_size_px as f32,
        cfg.text.max_line_width_px.map(|w| w as f32),
    )?;
    Ok(Box::new(m))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Shuffle,
    Open,
    Read(u64),
    Close,
    Settle,
    Done,
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let cfg = read_config(args.config.as_deref())?;
    let measurer = make_measurer(&cfg, args.font.as_deref())?;
    let notes = (1..=args.notes)
        .map(|i| format!("Note {i}: thinking of you today."))
        .collect();
    let on_disk = |image: &str| Path::new(image).is_file();
    let mut session = GreetingSession::with_probe(cfg, measurer, args.images, notes, &on_disk)?;
    let mut sink = RecordingSink::new().with_capacity_limit(1);

    let mut step = Step::Shuffle;
    let mut opened = 0u32;
    let mut closed = 0u32;
    for _ in 0..args.frames {
        step = match step {
            Step::Shuffle if session.shuffle() => Step::Open,
            Step::Shuffle => Step::Done,
            Step::Close if session.close_note() => Step::Settle,
            other => other,
        };
        if step == Step::Done {
            break;
        }

        let events = session.tick(args.dt, &mut sink);
        for ev in &events {
            let frame = session.frame_index();
            println!("{}", serde_json::json!({ "frame": frame, "event": ev }));
            step = match (step, ev) {
                (_, SessionEvent::Faulted(_)) => Step::Done,
                (Step::Open, SessionEvent::NoteSelected(_)) => {
                    if !session.open_selected() {
                        anyhow::bail!("selected note refused to open");
                    }
                    Step::Open
                }
                (Step::Open, SessionEvent::Opened) => {
                    opened += 1;
                    Step::Read(30)
                }
                (Step::Settle, SessionEvent::Closed) => {
                    closed += 1;
                    Step::Settle
                }
                (Step::Settle, SessionEvent::BowlSettled) => Step::Shuffle,
                (s, _) => s,
            };
        }
        step = match step {
            Step::Read(0) => Step::Close,
            Step::Read(n) => Step::Read(n - 1),
            s => s,
        };
        if opened >= args.notes && step == Step::Shuffle {
            break;
        }
    }

    let summary = serde_json::json!({
        "frames": session.frame_index(),
        "opened": opened,
        "closed": closed,
        "unseen": session.bowl().unseen_note_ids().len(),
        "fault": session.fault(),
    });
    println!("{summary}");
    Ok(())
}
