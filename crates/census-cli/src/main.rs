//! Census record manager CLI.

use clap::{ColorChoice, Parser};
use std::io::{self, IsTerminal};
use tracing::Level;

use census_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use census_cli::commands::{
    run_add, run_export, run_list, run_remove, run_serve, run_show, run_validate,
};
use census_cli::logging::{LogConfig, LogFormat, init_logging};
use census_cli::summary::{print_person_list, print_report};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    std::process::exit(run(cli.command));
}

fn run(command: Command) -> i32 {
    match command {
        Command::Validate(args) => match run_validate(&args) {
            Ok(outcome) => {
                if outcome.report.is_clean() {
                    println!("record is valid");
                    0
                } else {
                    print_report(&outcome.report);
                    1
                }
            }
            Err(error) => fail(&error),
        },
        Command::Add(args) => match run_add(&args) {
            Ok(outcome) => match outcome.id {
                Some(id) => {
                    println!("added record {id}");
                    0
                }
                None => {
                    print_report(&outcome.validation.report);
                    1
                }
            },
            Err(error) => fail(&error),
        },
        Command::List(args) => match run_list(&args) {
            Ok(people) => {
                print_person_list(&people);
                0
            }
            Err(error) => fail(&error),
        },
        Command::Show(args) => match run_show(&args) {
            Ok(person) => match serde_json::to_string_pretty(&person) {
                Ok(json) => {
                    println!("{json}");
                    0
                }
                Err(error) => {
                    eprintln!("error: {error}");
                    1
                }
            },
            Err(error) => fail(&error),
        },
        Command::Remove(args) => match run_remove(&args) {
            Ok(id) => {
                println!("removed record {id}");
                0
            }
            Err(error) => fail(&error),
        },
        Command::Export(args) => match run_export(&args) {
            Ok(count) => {
                println!("exported {count} record(s) to {}", args.output.display());
                0
            }
            Err(error) => fail(&error),
        },
        Command::Serve(args) => match run_serve(&args) {
            Ok(()) => 0,
            Err(error) => fail(&error),
        },
    }
}

fn fail(error: &anyhow::Error) -> i32 {
    eprintln!("error: {error:#}");
    1
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level = match cli.log_level {
        Some(LogLevelArg::Error) => Level::ERROR,
        Some(LogLevelArg::Warn) => Level::WARN,
        Some(LogLevelArg::Info) => Level::INFO,
        Some(LogLevelArg::Debug) => Level::DEBUG,
        Some(LogLevelArg::Trace) => Level::TRACE,
        None => cli
            .verbosity
            .tracing_level_filter()
            .into_level()
            .unwrap_or(Level::ERROR),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig {
        level,
        format,
        log_file: cli.log_file.clone(),
        with_ansi,
        ..LogConfig::default()
    }
}
