mod checks;
mod data;
mod evaluation;
mod reports;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use stampbook_engine::constants::DEFAULT_GOAL_LIMIT;
use stampbook_engine::{ProgressionEngine, default_unlocked};

use checks::run_checks;
use data::{DataSet, read_id_set, read_statistics};
use evaluation::{Evaluation, evaluate_player};
use reports::{Report, generate_console_report, generate_json_report, generate_markdown_report};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored summary for humans
    Console,
    /// Machine-readable report
    Json,
    /// Report suitable for CI summaries
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "stampbook-tester", version)]
#[command(about = "Validates Stampbook catalogs and reports player progress against them")]
struct Args {
    /// Directory holding courses.json, stamps.json and unlockables.json
    /// (missing files fall back to the bundled data)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Player statistics snapshot (JSON) to evaluate
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Previously earned stamp ids (JSON array), added to the snapshot's own set
    #[arg(long)]
    earned: Option<PathBuf>,

    /// Previously unlocked ids (JSON array); defaults to the starter entries
    #[arg(long)]
    unlocked: Option<PathBuf>,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Number of goals to list for the evaluated player
    #[arg(long, default_value_t = DEFAULT_GOAL_LIMIT)]
    goals: usize,

    /// Only validate the data; skip player evaluation
    #[arg(long)]
    validate_only: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    announce_banner();

    let start_time = Instant::now();
    let data = load_data(&args)?;
    let checks = run_checks(&data);
    log::debug!(
        "{} findings across {} courses, {} stamps, {} unlockables",
        checks.findings.len(),
        data.courses.len(),
        data.stamps.len(),
        data.unlockables.len()
    );

    let evaluation = if checks.passed() && !args.validate_only {
        evaluate_snapshot(&args, &data)?
    } else {
        None
    };

    let report = Report::new(&data, checks, evaluation);
    write_report(&args, &report, start_time)?;

    if !report.passed {
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn announce_banner() {
    println!("{}", "🏅 Stampbook Tester".bright_cyan().bold());
    println!("{}", "===================".cyan());
}

fn load_data(args: &Args) -> Result<DataSet> {
    let data = match &args.data_dir {
        Some(dir) => DataSet::from_dir(dir)
            .with_context(|| format!("loading data from {}", dir.display()))?,
        None => DataSet::bundled().context("loading bundled data")?,
    };
    Ok(data)
}

fn evaluate_snapshot(args: &Args, data: &DataSet) -> Result<Option<Evaluation>> {
    let Some(stats_path) = &args.stats else {
        return Ok(None);
    };
    let mut stats = read_statistics(stats_path)?;
    if let Some(path) = &args.earned {
        stats.earned_stamps.extend(read_id_set(path)?);
    }
    let earned = stats.earned_stamps.clone();
    let engine = ProgressionEngine::from_catalogs(data.stamps.clone(), data.unlockables.clone());
    let unlocked: BTreeSet<String> = match &args.unlocked {
        Some(path) => read_id_set(path)?,
        None => default_unlocked(engine.unlockables())
            .into_iter()
            .map(|entry| entry.id.clone())
            .collect(),
    };
    Ok(Some(evaluate_player(
        &engine, &stats, &earned, &unlocked, args.goals,
    )))
}

fn write_report(args: &Args, report: &Report, start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report {
        ReportFormat::Json => generate_json_report(&mut output_target, report)?,
        ReportFormat::Markdown => generate_markdown_report(&mut output_target, report)?,
        ReportFormat::Console => {
            generate_console_report(&mut output_target, report)?;
            let duration = start_time.elapsed();
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
