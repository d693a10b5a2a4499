mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::classify::{ClassifyArgs, RatiosArgs};
use commands::compliance::{CitArgs, ComplyArgs, RulesArgs};
use commands::evaluate::EvaluateArgs;
use commands::risk::AssessArgs;
use commands::sampling::SampleArgs;
use naija_audit_core::EngineConfig;

/// Nigerian trial-balance classification, risk and compliance checks
#[derive(Parser)]
#[command(
    name = "naudit",
    version,
    about = "Nigerian trial-balance classification, risk and compliance checks",
    long_about = "Classifies a trial balance into IFRS statement sections, derives \
                  financial ratios, scores risk against industry benchmarks and \
                  evaluates FRC, FIRS, CAMA and CBN rules with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Engine configuration file (JSON, or YAML by .yaml/.yml extension)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Debug-level logs on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a trial balance into statement sections with a lead schedule
    Classify(ClassifyArgs),
    /// Compute financial ratios from a trial balance
    Ratios(RatiosArgs),
    /// Score financial risk against industry benchmarks
    Assess(AssessArgs),
    /// Check FRC, FIRS, CAMA and CBN compliance
    Comply(ComplyArgs),
    /// Run classification, ratios, risk and compliance in one pass
    Evaluate(EvaluateArgs),
    /// Suggest a substantive-testing sample from materiality and risk
    Sample(SampleArgs),
    /// Size band and statutory CIT rate for a turnover
    Cit(CitArgs),
    /// List the compliance rule registry
    Rules(RulesArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();
}

fn load_config(path: Option<&str>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => input::file::read_config(path)?,
        None => EngineConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn exit_with_error(e: Box<dyn std::error::Error>) -> ! {
    eprintln!("{}: {}", "error".red().bold(), e);
    process::exit(1);
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => exit_with_error(e),
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Classify(args) => commands::classify::run_classify(args),
        Commands::Ratios(args) => commands::classify::run_ratios(args),
        Commands::Assess(args) => commands::risk::run_assess(args, &config),
        Commands::Comply(args) => commands::compliance::run_comply(args, &config),
        Commands::Evaluate(args) => commands::evaluate::run_evaluate(args, config),
        Commands::Sample(args) => commands::sampling::run_sample(args, &config),
        Commands::Cit(args) => commands::compliance::run_cit(args, &config),
        Commands::Rules(args) => commands::compliance::run_rules(args),
        Commands::Version => {
            println!("naudit {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => exit_with_error(e),
    }
}
