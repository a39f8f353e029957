use clap::{Parser, Subcommand};
use std::path::PathBuf;

use qbit_calc::api::ApiClient;
use qbit_calc::catalog::{Combination, Subject};
use qbit_calc::output::RenderOptions;
use qbit_calc::scoring::RawScorePoints;
use qbit_calc::search::{build_query, FacultyFilters, Pagination};
use qbit_calc::selection::{FacultyRef, FacultySelector};
use qbit_calc::submit::SubmitError;

const EXIT_SUCCESS: i32 = 0;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;
const EXIT_VALIDATION: i32 = 5;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive calculator (default if no subcommand)
    Tui,
    /// Submit scores once and print grant and enrollment results
    Analyze {
        /// Subject combination (see `combinations`)
        #[arg(long, default_value_t = Combination::default())]
        combination: Combination,

        /// Raw points as SUBJECT=POINTS, e.g. --score MATHEMATICS=40
        #[arg(long = "score", value_parser = parse_score, required = true)]
        scores: Vec<(Subject, f64)>,

        /// Faculty to check as ID:YEAR, e.g. --faculty 17:2024
        #[arg(long = "faculty", value_parser = parse_faculty)]
        faculties: Vec<FacultyRef>,

        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Search faculties admitting a subject combination
    Faculties {
        #[arg(long, default_value_t = Combination::default())]
        combination: Combination,

        /// University name (substring)
        #[arg(long)]
        university: Option<String>,

        /// Faculty name (substring)
        #[arg(long)]
        faculty: Option<String>,

        #[arg(long)]
        year: Option<u16>,

        /// Page number (1-based)
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
    /// List the subject combinations
    Combinations,
    /// Write a default config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "qbit-calc")]
#[command(about = "Exam score grant and enrollment calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/qbit-calc/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Analysis service base URL (overrides config and QBIT_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// `MATHEMATICS=40` or `"foreign language=65"`
fn parse_score(s: &str) -> Result<(Subject, f64), String> {
    let (subject, points) = s
        .split_once('=')
        .ok_or_else(|| format!("expected SUBJECT=POINTS, got '{}'", s))?;
    let subject: Subject = subject.trim().parse().map_err(|e| format!("{}", e))?;
    let points: f64 = points
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", points.trim()))?;
    Ok((subject, points))
}

/// `17:2024`
fn parse_faculty(s: &str) -> Result<FacultyRef, String> {
    let (id, year) = s
        .rsplit_once(':')
        .ok_or_else(|| format!("expected ID:YEAR, got '{}'", s))?;
    if id.is_empty() {
        return Err(format!("missing faculty id in '{}'", s));
    }
    let year: u16 = year
        .parse()
        .map_err(|_| format!("'{}' is not a year", year))?;
    Ok(FacultyRef::new(id, year))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);
    let config_path = cli.config.map(PathBuf::from);

    // Init does not need a loadable config
    if let Commands::Init { force } = command {
        let path = match config_path.map(Ok).unwrap_or_else(qbit_calc::config::get_config_path) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Config error: {}", e);
                std::process::exit(EXIT_CONFIG);
            }
        };
        if let Err(e) = qbit_calc::config::write_default_config(&path, force) {
            eprintln!("{:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        println!("Wrote {}", path.display());
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let mut config = match qbit_calc::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    qbit_calc::config::apply_overrides(
        &mut config,
        std::env::var(qbit_calc::config::API_URL_ENV).ok(),
        cli.api_url,
    );

    if let Err(errors) = qbit_calc::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    if let Err(e) = qbit_calc::telemetry::init(&config.log_level, cli.verbose) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    // Both durations were checked by validate_config
    let (debounce, request_timeout) = match (config.debounce(), config.request_timeout()) {
        (Ok(d), Ok(t)) => (d, t),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let client = match ApiClient::new(&config.api_url, request_timeout) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    tracing::debug!(api_url = client.base_url(), "client ready");

    let opts = RenderOptions::detect(config.scale.grant_pad, config.scale.enrollment_pad);

    match command {
        Commands::Tui => {
            let app = qbit_calc::tui::App::new(config, client.clone(), debounce);
            if let Err(e) = qbit_calc::tui::run_tui(app, client, request_timeout).await {
                eprintln!("TUI error: {:#}", e);
                std::process::exit(EXIT_NETWORK);
            }
        }
        Commands::Analyze {
            combination,
            scores,
            faculties,
            tsv,
        } => {
            let points: RawScorePoints = scores.into_iter().collect();
            let selection: qbit_calc::selection::FacultySelection = faculties.iter().map(FacultySelector::from_ref).collect();

            match qbit_calc::submit::submit_analysis(&client, combination, &points, &selection).await {
                Ok(report) => {
                    if tsv {
                        println!("{}", qbit_calc::output::format_report_tsv(&report));
                    } else {
                        println!("{}", qbit_calc::output::format_report(&report, &opts));
                    }
                }
                Err(SubmitError::Validation(errors)) => {
                    eprintln!("Invalid scores for {}:", combination.display_name());
                    for error in errors {
                        eprintln!("  - {}", error);
                    }
                    std::process::exit(EXIT_VALIDATION);
                }
                Err(SubmitError::Api(e)) => {
                    eprintln!("Analysis failed: {}", e);
                    std::process::exit(EXIT_NETWORK);
                }
            }
        }
        Commands::Faculties {
            combination,
            university,
            faculty,
            year,
            page,
        } => {
            let filters = FacultyFilters {
                university: university.unwrap_or_default(),
                faculty: faculty.unwrap_or_default(),
                year,
            };
            let page0 = page as usize - 1;
            let params = build_query(&filters, &combination.subjects(), page0);

            match client.search_faculties(&params).await {
                Ok(result) => {
                    let pagination = Pagination {
                        page: page0,
                        limit: result.limit,
                        total: result.total,
                    };
                    println!(
                        "{}",
                        qbit_calc::output::format_faculty_page(
                            &result.items,
                            &pagination,
                            opts.use_colors
                        )
                    );
                }
                Err(e) => {
                    eprintln!("Faculty search failed: {}", e);
                    std::process::exit(EXIT_NETWORK);
                }
            }
        }
        Commands::Combinations => {
            println!("{}", qbit_calc::output::format_combinations(opts.use_colors));
        }
        // handled before config load
        Commands::Init { .. } => {}
    }

    std::process::exit(EXIT_SUCCESS);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("georgian_language=55").unwrap(), (Subject::GeorgianLanguage, 55.0));
        assert!(parse_score("HISTORY").is_err());
        assert!(parse_score("HISTORY=abc").is_err());
        assert!(parse_score("NOPE=10").is_err());
    }

    #[test]
    fn test_parse_faculty() {
        assert_eq!(parse_faculty("17:2024").unwrap(), FacultyRef::new("17", 2024));
        assert!(parse_faculty("17").is_err());
        assert!(parse_faculty(":2024").is_err());
        assert!(parse_faculty("17:year").is_err());
    }

    #[test]
    fn test_cli_parses_analyze() {
        let cli = Cli::try_parse_from([
            "qbit-calc",
            "analyze",
            "--combination",
            "mathematics",
            "--score",
            "GEORGIAN_LANGUAGE=55",
            "--score",
            "MATHEMATICS=40",
            "--faculty",
            "17:2024",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Analyze { scores, faculties, .. }) => {
                assert_eq!(scores.len(), 2);
                assert_eq!(faculties.len(), 1);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_page_zero() {
        assert!(Cli::try_parse_from(["qbit-calc", "faculties", "--page", "0"]).is_err());
    }
}
