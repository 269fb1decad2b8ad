//! Command-line interface for qmarkup
//! This binary inspects annotation files: one marked-up query per line.
//!
//! Usage:
//!   qmarkup parse `<path>` [--format `<format>`] [--skip-errors]  - Parse queries and print snapshots
//!   qmarkup strip `<path>`                                      - Strip annotation syntax
//!   qmarkup check `<path>`                                      - Verify load/dump round-trips

use clap::{Arg, ArgAction, Command};
use std::fs;
use std::process;

use qmarkup::core::snapshot::snapshot_from_query;
use qmarkup::markup;
use qmarkup::query::QueryFactory;

fn main() {
    let matches = Command::new("qmarkup")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting annotated query markup files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("parse")
                .about("Parse each line and print the structured query")
                .arg(
                    Arg::new("path")
                        .help("Path to the annotation file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format ('json' or 'yaml')")
                        .default_value("json"),
                )
                .arg(
                    Arg::new("skip-errors")
                        .long("skip-errors")
                        .help("Report malformed lines and continue instead of aborting")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("strip")
                .about("Print each line with annotation syntax removed")
                .arg(
                    Arg::new("path")
                        .help("Path to the annotation file")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Verify that every line survives a load/dump round-trip")
                .arg(
                    Arg::new("path")
                        .help("Path to the annotation file")
                        .required(true)
                        .index(1),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("parse", parse_matches)) => {
            let path = parse_matches.get_one::<String>("path").unwrap();
            let format = parse_matches.get_one::<String>("format").unwrap();
            let skip_errors = parse_matches.get_flag("skip-errors");
            handle_parse_command(path, format, skip_errors);
        }
        Some(("strip", strip_matches)) => {
            let path = strip_matches.get_one::<String>("path").unwrap();
            handle_strip_command(path);
        }
        Some(("check", check_matches)) => {
            let path = check_matches.get_one::<String>("path").unwrap();
            handle_check_command(path);
        }
        _ => unreachable!(),
    }
}

fn read_lines(path: &str) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(content) => content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.to_string())
            .collect(),
        Err(e) => {
            eprintln!("Error reading {}: {}", path, e);
            process::exit(1);
        }
    }
}

/// Parse each line; `--skip-errors` makes malformed records a warning rather
/// than an abort (the skip-or-abort policy belongs to the caller, not the
/// engine).
fn handle_parse_command(path: &str, format: &str, skip_errors: bool) {
    let factory = QueryFactory::new();
    let mut failed = false;

    for (number, line) in read_lines(path).iter().enumerate() {
        match markup::load_query(line, &factory) {
            Ok(processed) => {
                let snapshot = snapshot_from_query(&processed);
                let rendered = match format {
                    "json" => serde_json::to_string_pretty(&snapshot)
                        .expect("snapshot serializes to JSON"),
                    "yaml" => {
                        serde_yaml::to_string(&snapshot).expect("snapshot serializes to YAML")
                    }
                    other => {
                        eprintln!("Unknown format: {}", other);
                        process::exit(1);
                    }
                };
                println!("{}", rendered);
            }
            Err(e) => {
                eprintln!("Line {}: {}", number + 1, e);
                if !skip_errors {
                    process::exit(1);
                }
                failed = true;
            }
        }
    }
    if failed {
        process::exit(1);
    }
}

fn handle_strip_command(path: &str) {
    for line in read_lines(path) {
        println!("{}", markup::mark_down(&line));
    }
}

fn handle_check_command(path: &str) {
    let factory = QueryFactory::new();
    let mut failed = false;

    for (number, line) in read_lines(path).iter().enumerate() {
        let result = markup::load_query(line, &factory).and_then(|p| markup::dump_query(&p));
        match result {
            Ok(dumped) if dumped == *line => {}
            Ok(dumped) => {
                eprintln!(
                    "Line {}: round-trip mismatch\n  original: {}\n  dumped:   {}",
                    number + 1,
                    line,
                    dumped
                );
                failed = true;
            }
            Err(e) => {
                eprintln!("Line {}: {}", number + 1, e);
                failed = true;
            }
        }
    }

    if failed {
        process::exit(1);
    }
    println!("OK");
}
