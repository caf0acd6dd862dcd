use clap::value_parser;
use clap::{Arg, ArgAction, ArgMatches, Command};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use mathpad::parsing;
use mathpad::segmenting;

mod editor;
mod output;
mod problem;

use output::{Identity, Render, Terminal};

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    // Logging always goes to stderr; when running as a language server
    // stdout carries the protocol.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("mathpad")
        .version(VERSION)
        .propagate_version(true)
        .about("Find the expressions in a notebook of mathematics.")
        .disable_help_subcommand(true)
        .subcommand(
            Command::new("check")
                .about("Check that every expression in the given notebook parses")
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_parser(["full", "concise"])
                        .default_value("full")
                        .action(ArgAction::Set)
                        .help("How much detail to give when reporting a problem."),
                )
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .value_parser(value_parser!(String))
                        .help("The file containing the notebook you want to check. Use - to read standard input."),
                ),
        )
        .subcommand(
            Command::new("segment")
                .about("List the regions of the given notebook that parse on their own")
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_parser(["text", "json"])
                        .default_value("text")
                        .action(ArgAction::Set)
                        .help("Which format to list the regions in."),
                )
                .arg(
                    Arg::new("raw-control-chars")
                        .short('R')
                        .long("raw-control-chars")
                        .action(ArgAction::SetTrue)
                        .help("Emit ANSI escape codes for highlighting even if output is redirected to a pipe or file."),
                )
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .value_parser(value_parser!(String))
                        .help("The file containing the notebook you want to segment. Use - to read standard input."),
                ),
        )
        .subcommand(
            Command::new("language")
                .about("Run the mathpad Language Server, communicating over standard input and output"),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("check", submatches)) => {
            let filename = filename_argument(submatches);
            let concise = submatches
                .get_one::<String>("output")
                .map(|value| value == "concise")
                .unwrap_or(false);

            debug!(?filename, concise);

            if std::io::stderr().is_terminal() {
                check(filename, concise, &Terminal)
            } else {
                check(filename, concise, &Identity)
            }
        }
        Some(("segment", submatches)) => {
            let filename = filename_argument(submatches);
            let json = submatches
                .get_one::<String>("output")
                .map(|value| value == "json")
                .unwrap_or(false);
            let raw_output = submatches.get_flag("raw-control-chars");

            debug!(?filename, json, raw_output);

            let content = load_or_exit(filename);
            let spans = segmenting::segment(&content);

            if json {
                match output::spans_to_json(&spans) {
                    Ok(result) => println!("{}", result),
                    Err(error) => {
                        eprintln!("{}: {}", "error".bright_red(), error);
                        std::process::exit(1);
                    }
                }
            } else if raw_output || std::io::stdout().is_terminal() {
                print!("{}", output::render_spans(&spans, &Terminal));
            } else {
                print!("{}", output::render_spans(&spans, &Identity));
            }
        }
        Some(("language", _)) => {
            info!("Starting Language Server");

            if let Err(error) = editor::run_language_server() {
                eprintln!("{}: {}", "error".bright_red(), error);
                std::process::exit(1);
            }
        }
        Some(_) => {
            println!("No valid subcommand was used")
        }
        None => {
            println!("usage: mathpad [COMMAND] ...");
            println!("Try '--help' for more information.");
        }
    }
}

fn filename_argument(submatches: &ArgMatches) -> &Path {
    match submatches.get_one::<String>("filename") {
        Some(filename) => Path::new(filename),
        None => {
            eprintln!("{}: no filename given", "error".bright_red());
            std::process::exit(2);
        }
    }
}

fn load_or_exit(filename: &Path) -> String {
    match parsing::load(filename) {
        Ok(content) => content,
        Err(error) => {
            eprintln!("{}", problem::concise_loading_error(&error));
            std::process::exit(1);
        }
    }
}

fn check(filename: &Path, concise: bool, renderer: &impl Render) {
    let content = load_or_exit(filename);
    let spans = segmenting::segment(&content);

    let mut failed = false;

    for span in &spans {
        if let Some(error) = &span.error {
            let message = if concise {
                problem::concise_parsing_error(error, span.from, filename, &content, renderer)
            } else {
                problem::full_parsing_error(error, span.from, filename, &content, renderer)
            };
            eprintln!("{}", message);
            failed = true;
        }
    }

    if failed {
        std::process::exit(1);
    }

    info!(
        "{} parsed into {} region{}",
        filename.display(),
        spans.len(),
        if spans.len() == 1 { "" } else { "s" }
    );
}
