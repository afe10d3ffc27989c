mod config;
mod models;
mod parser;
mod report;
mod util;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use config::Config;
use models::ParsedData;
use report::ReportInput;

#[derive(Parser, Debug)]
#[command(
    name = "iostat-report",
    about = "Turn `iostat -x -c` output into an interactive HTML report",
    version
)]
struct Cli {
    /// File holding the captured `iostat -x -c <interval>` output
    #[arg(required_unless_present_any = ["print_config", "completions"])]
    input: Option<PathBuf>,

    /// Output HTML file path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report title
    #[arg(short = 'n', long)]
    name: Option<String>,

    /// Additional metadata, shown as a table when given as a JSON object
    #[arg(short, long, default_value = "")]
    metadata: String,

    /// Print the parsed series as JSON and exit
    #[arg(long, conflicts_with = "summary")]
    json: bool,

    /// Print a human-readable summary and exit
    #[arg(long)]
    summary: bool,

    /// Print config file path and current values, then exit
    #[arg(long)]
    print_config: bool,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "iostat-report", &mut io::stdout());
        return Ok(());
    }

    let cfg = Config::load();
    if cli.print_config {
        return run_print_config(&cfg);
    }

    let input = cli.input.as_deref().context("no input file given")?;
    let data = std::fs::read(input)
        .with_context(|| format!("failed to read input file {}", input.display()))?;
    let parsed = parser::parse_iostat(&data)
        .with_context(|| format!("failed to parse iostat output in {}", input.display()))?;
    if parsed.is_empty() {
        warn!(path = %input.display(), "no iostat blocks found");
    }

    let title = cli.name.clone().unwrap_or_else(|| cfg.report.title.clone());
    let file_name = display_name(input);
    let file_hash = report::fingerprint(&data);

    if cli.json {
        let snapshot = report::json::snapshot(&parsed, &file_name, &file_hash);
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }
    if cli.summary {
        print!("{}", report::summary::generate(&parsed, &title));
        return Ok(());
    }

    let output = cli.output.clone().unwrap_or_else(|| cfg.report.output.clone());
    run_report(&cli, &cfg, &parsed, &title, &file_name, &file_hash, &output)?;
    println!("report '{}' written to {}", title, output.display());
    Ok(())
}

fn run_report(
    cli:       &Cli,
    cfg:       &Config,
    parsed:    &ParsedData,
    title:     &str,
    file_name: &str,
    file_hash: &str,
    output:    &Path,
) -> Result<()> {
    let generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let input = ReportInput {
        parsed,
        title,
        metadata:    &cli.metadata,
        file_name,
        file_hash,
        version:     env!("CARGO_PKG_VERSION"),
        generated:   &generated,
        axis_splits: cfg.report.axis_splits,
        echarts_url: &cfg.report.echarts_url,
    };
    report::write_report(output, &input)?;
    info!(
        path = %output.display(),
        intervals = parsed.cpus.len(),
        devices = parsed.devices.len(),
        "report written"
    );
    Ok(())
}

fn run_print_config(cfg: &Config) -> Result<()> {
    let path = Config::config_path()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(unknown)".to_string());
    println!("Config: {}", path);
    println!();
    print!("{}", cfg.to_toml()?);
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Default level is INFO; `-v` is DEBUG, `-vv` TRACE, `-q` errors only.
/// `RUST_LOG` still takes precedence for individual targets.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
