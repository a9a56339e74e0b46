use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use mcq_accuracy::output::{OutputFormat, ScoredQuestion};
use mcq_accuracy::scoring::{Scorer, ScoringConfig, ScoringRequest, ScoringResponse};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;
const EXIT_PRECONDITION: i32 = 5;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score one question read from a JSON/YAML file or stdin
    Score {
        /// Request file (`.yaml`/`.yml` for YAML, anything else JSON); stdin if absent or `-`
        file: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Score the built-in sample questions
    Samples {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Score a list of questions concurrently
    Batch {
        /// File holding a JSON or YAML list of requests
        file: PathBuf,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Also write a JSON report to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Create a config file interactively
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,

        /// Skip the prompts and write the defaults
        #[arg(short, long)]
        yes: bool,

        /// Where to write the config (defaults to --config or ~/.config/mcq-accuracy/config.yaml)
        path: Option<PathBuf>,
    },
    /// Validate the config file and report every problem
    CheckConfig,
}

#[derive(Parser, Debug)]
#[command(name = "mcq-accuracy")]
#[command(about = "Multiple-choice question accuracy scorer", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/mcq-accuracy/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    mcq_accuracy::logging::init_tracing(cli.verbose);
    let config_path = cli.config.map(PathBuf::from);

    let use_colors = mcq_accuracy::output::should_use_colors();

    match cli.command {
        Commands::Init { force, yes, path } => {
            match mcq_accuracy::config::init::run_init_wizard(path.or(config_path), force, yes) {
                Ok(path) => println!("Config written to {}", path.display()),
                Err(e) => {
                    eprintln!("Init failed: {:#}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            }
        }
        Commands::CheckConfig => {
            load_scoring(config_path);
            println!("Configuration OK");
        }
        Commands::Score { file, format } => {
            let scorer = build_scorer(config_path);
            let request = match mcq_accuracy::input::read_source(file.as_deref())
                .and_then(|(content, fmt)| mcq_accuracy::input::parse_request(&content, fmt))
            {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Input error: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };

            if let Err(errors) = request.validate() {
                eprintln!("Invalid request:");
                for error in errors {
                    eprintln!("  - {}", error);
                }
                std::process::exit(EXIT_PRECONDITION);
            }

            let response = scorer.score(&request);
            let scored = ScoredQuestion {
                request: &request,
                response: &response,
            };
            match format {
                OutputFormat::Text => {
                    println!("{}", mcq_accuracy::output::format_report(&scored, use_colors))
                }
                OutputFormat::Json => print_json(&response),
                OutputFormat::Tsv => println!("{}", mcq_accuracy::output::format_tsv(&[scored])),
            }
        }
        Commands::Samples { format } => {
            let scorer = build_scorer(config_path);
            let samples = mcq_accuracy::samples::sample_requests();
            let responses: Vec<ScoringResponse> = samples.iter().map(|r| scorer.score(r)).collect();
            print_results(&samples, &responses, format, use_colors);
        }
        Commands::Batch {
            file,
            format,
            output,
        } => {
            let scorer = build_scorer(config_path);
            let requests = match mcq_accuracy::input::read_source(Some(&file))
                .and_then(|(content, fmt)| mcq_accuracy::input::parse_requests(&content, fmt))
            {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Input error: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };

            let (valid, rejected) = mcq_accuracy::batch::partition_requests(requests);
            for rejection in &rejected {
                eprintln!("Request {} rejected:", rejection.index);
                for error in &rejection.errors {
                    eprintln!("  - {}", error);
                }
            }

            let start_time = Instant::now();
            let entries = match mcq_accuracy::batch::score_all(Arc::new(scorer), valid).await {
                Ok(entries) => entries,
                Err(e) => {
                    eprintln!("Batch failed: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };
            info!(
                count = entries.len(),
                elapsed = %humantime::format_duration(start_time.elapsed()),
                "batch scored"
            );

            let any_rejected = !rejected.is_empty();
            let report = mcq_accuracy::batch::BatchReport::new(entries, rejected);

            let scored: Vec<ScoredQuestion> = report
                .results
                .iter()
                .map(|entry| ScoredQuestion {
                    request: &entry.request,
                    response: &entry.response,
                })
                .collect();
            match format {
                OutputFormat::Text => {
                    println!("{}", mcq_accuracy::output::format_scored_table(&scored, use_colors));
                    println!();
                    println!(
                        "{}",
                        mcq_accuracy::output::format_batch_summary(&report, use_colors)
                    );
                }
                OutputFormat::Json => print_json(&report),
                OutputFormat::Tsv => println!("{}", mcq_accuracy::output::format_tsv(&scored)),
            }

            if let Some(path) = output {
                if let Err(e) = mcq_accuracy::batch::save_report(&path, &report) {
                    eprintln!("Failed to write report: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
                info!(path = %path.display(), "report written");
            }

            if any_rejected {
                std::process::exit(EXIT_PRECONDITION);
            }
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

/// Load and validate the scoring config, exiting with EXIT_CONFIG on failure.
fn load_scoring(config_path: Option<PathBuf>) -> ScoringConfig {
    let config = match mcq_accuracy::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let scoring = config.scoring();
    if let Err(errors) = mcq_accuracy::scoring::validate_scoring(&scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }
    scoring
}

/// Build the scorer from the validated config and log what it will use.
fn build_scorer(config_path: Option<PathBuf>) -> Scorer {
    let scorer = Scorer::new(load_scoring(config_path));
    let config = scorer.config();
    debug!(
        weights = ?config.weights,
        confidence = ?config.confidence,
        solve_variable = %config.solve_variable,
        "scorer configured"
    );
    scorer
}

fn print_results(
    requests: &[ScoringRequest],
    responses: &[ScoringResponse],
    format: OutputFormat,
    use_colors: bool,
) {
    let scored: Vec<ScoredQuestion> = requests
        .iter()
        .zip(responses)
        .map(|(request, response)| ScoredQuestion { request, response })
        .collect();
    match format {
        OutputFormat::Text => {
            println!("{}", mcq_accuracy::output::format_scored_table(&scored, use_colors))
        }
        OutputFormat::Json => print_json(responses),
        OutputFormat::Tsv => println!("{}", mcq_accuracy::output::format_tsv(&scored)),
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match mcq_accuracy::output::format_json(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("{:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    }
}
