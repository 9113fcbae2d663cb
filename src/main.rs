//! Command-line entry point for pairwise-judge
//!
//! Ranks translation systems from judge output, computes annotator agreement,
//! and builds comparison schedules.

use anyhow::Result;
use clap::{Parser, Subcommand};
use pairwise_judge::agreement::{alpha_by_dimension, AgreementCalculator, MeasurementLevel};
use pairwise_judge::config::{validate_config, AppConfig};
use pairwise_judge::io;
use pairwise_judge::pairing::PairScheduler;
use pairwise_judge::ranking::{GroupBy, RankingAggregator, RankingReport};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Pairwise Judge - consensus rankings and annotator agreement for MT evaluation
#[derive(Parser)]
#[command(
    name = "pairwise-judge",
    version,
    about = "Rank translation systems from pairwise judgments and measure annotator agreement",
    long_about = "Pairwise Judge parses free-text verdicts from an automated judge, ranks the \
                 compared translation systems per group with win counts and TrueSkill, averages \
                 the groups into an overall ranking, and computes Krippendorff's alpha between \
                 two human annotators."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        global = true,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, global = true, help = "Enable debug mode with verbose logging")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a ranking report from judge output
    Rank {
        /// Judge output (JSON array of judgments)
        input: PathBuf,

        #[arg(
            short,
            long,
            value_name = "FILE",
            help = "Report path (default: ../ranking/<name>_ranking.json)"
        )]
        output: Option<PathBuf>,

        #[arg(long, value_name = "KEY", help = "Grouping key (language, all)")]
        group_by: Option<GroupBy>,

        #[arg(long, value_name = "LIST", value_delimiter = ',', help = "Only rank these groups")]
        groups: Option<Vec<String>>,

        #[arg(long, help = "Use draw probability 0.1 and per-match dynamics")]
        legacy_trueskill: bool,
    },

    /// Krippendorff's alpha between two annotators
    Alpha {
        /// First annotator's table
        first: PathBuf,

        /// Second annotator's table
        second: PathBuf,

        #[arg(long, value_name = "LEVEL", help = "Measurement level (nominal, ordinal, interval)")]
        level: Option<MeasurementLevel>,

        #[arg(long, value_name = "FILE", help = "Write the joined annotations as CSV")]
        merged_output: Option<PathBuf>,

        #[arg(long, help = "Also report alpha for each dimension")]
        per_dimension: bool,
    },

    /// Build the comparison schedule for a source dataset
    Pairs {
        /// Source dataset (JSON array of items with one field per competitor)
        input: PathBuf,

        #[arg(long, value_name = "SEED", help = "Override the shuffle seed")]
        seed: Option<u64>,

        #[arg(short, long, value_name = "FILE", help = "Write the schedule here instead of stdout")]
        output: Option<PathBuf>,
    },
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    match &args.command {
        Command::Rank {
            group_by,
            groups,
            legacy_trueskill,
            ..
        } => {
            if let Some(group_by) = group_by {
                config.ranking.group_by = *group_by;
            }
            if let Some(groups) = groups {
                config.ranking.groups = Some(groups.clone());
            }
            if *legacy_trueskill {
                config.rating.trueskill = config.rating.trueskill.with_legacy_dynamics();
            }
        }
        Command::Alpha { level, .. } => {
            if let Some(level) = level {
                config.agreement.level = *level;
            }
        }
        Command::Pairs { seed, .. } => {
            if let Some(seed) = seed {
                config.pairing.seed = *seed;
            }
        }
    }

    validate_config(&config)?;
    Ok(config)
}

fn print_report(report: &RankingReport) {
    for (name, ranking) in std::iter::once(("Overall", &report.overall))
        .chain(report.groups.iter().map(|(k, v)| (k.as_str(), v)))
    {
        println!("{}", name);
        for entry in ranking.skill_score.entries() {
            println!(
                "  {:<12} trueskill {:>7.2}  wins {:>6}",
                entry.competitor,
                entry.score,
                ranking
                    .winner_count
                    .get(&entry.competitor)
                    .map(|w| w.to_string())
                    .unwrap_or_else(|| "-".to_string())
            );
        }
    }
}

fn run_rank(config: &AppConfig, input: &Path, output: Option<&Path>) -> Result<()> {
    let records = io::load_judgments(input)?;
    let aggregator = RankingAggregator::from_config(config)?;
    let group_by = config.ranking.group_by;

    let (report, stats) = aggregator.aggregate_with_stats(&records, |r| group_by.key(r))?;
    if stats.failed() > 0 {
        warn!(
            failed = stats.failed(),
            parsed = stats.parsed(),
            "Some judgments could not be parsed and were skipped"
        );
    }

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| io::default_report_path(input));
    io::write_report(&output, &report)?;

    print_report(&report);
    println!("Ranking saved to {}", output.display());
    Ok(())
}

fn run_alpha(
    config: &AppConfig,
    first: &Path,
    second: &Path,
    merged_output: Option<&Path>,
    per_dimension: bool,
) -> Result<()> {
    let settings = &config.agreement;
    let first_table = io::load_annotation_table(
        first,
        settings.first_delimiter,
        &settings.key_columns,
        &settings.dimensions,
    )?;
    let second_table = io::load_annotation_table(
        second,
        settings.second_delimiter,
        &settings.key_columns,
        &settings.dimensions,
    )?;

    let joined = first_table.join(&second_table, &settings.dimensions)?;
    info!(
        first = first_table.len(),
        second = second_table.len(),
        common = joined.len(),
        "Joined annotation tables"
    );

    if let Some(path) = merged_output {
        io::write_joined_csv(path, &joined, &settings.key_columns, settings.first_delimiter)?;
    }

    let calculator = AgreementCalculator::new(settings.level);
    let summary = calculator.compute(&joined.reliability_units())?;

    println!("file: {}", second.display());
    println!("annotator: {}", first.display());
    println!("Krippendorff's alpha ({}): {:.4}", summary.level, summary.alpha);

    if per_dimension {
        for (dimension, alpha) in alpha_by_dimension(&calculator, &joined) {
            match alpha {
                Ok(alpha) => println!("  {:<10} {:.4}", dimension, alpha),
                Err(e) => println!("  {:<10} undefined ({})", dimension, e),
            }
        }
    }

    Ok(())
}

fn run_pairs(config: &AppConfig, input: &Path, output: Option<&Path>) -> Result<()> {
    let items = io::load_source_items(input)?;
    let scheduler = PairScheduler::new(config.pairing.seed, config.rating.competitors.clone());
    let requests = scheduler.schedule(&items);

    match output {
        Some(path) => {
            io::write_json(path, &requests)?;
            info!(path = %path.display(), "Schedule saved");
        }
        None => println!("{}", serde_json::to_string_pretty(&requests)?),
    }
    Ok(())
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration (CLI args can override environment/config file)
    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!(service = %config.service.name, version = pairwise_judge::VERSION, "Starting");

    match &args.command {
        Command::Rank { input, output, .. } => run_rank(&config, input, output.as_deref()),
        Command::Alpha {
            first,
            second,
            merged_output,
            per_dimension,
            ..
        } => run_alpha(&config, first, second, merged_output.as_deref(), *per_dimension),
        Command::Pairs { input, output, .. } => run_pairs(&config, input, output.as_deref()),
    }
}
