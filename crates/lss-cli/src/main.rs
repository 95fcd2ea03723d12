//! Label sheet CLI.

use clap::{ColorChoice, Parser};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

use lss_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg, OutputArg};
use lss_cli::commands::{run_layout, run_render, run_style, run_templates};
use lss_cli::logging::{LogConfig, LogFormat, init_logging};
use lss_cli::output::{render_json, render_text};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::Templates => report(run_templates()),
        Command::Render(args) => match run_render(&args) {
            Ok(outcome) => {
                let printed = match args.output {
                    OutputArg::Text => Ok(render_text(&outcome.pages, &outcome.options)),
                    OutputArg::Json => {
                        render_json(&outcome.pages, &outcome.options, &outcome.status)
                    }
                };
                match printed {
                    Ok(text) => print!("{text}"),
                    Err(error) => eprintln!("error: failed to write output: {error}"),
                }
                if outcome.is_ok() {
                    0
                } else {
                    eprintln!("error: {}", outcome.status);
                    1
                }
            }
            Err(error) => report::<()>(Err(error)),
        },
        Command::Layout(args) => report(run_layout(&args).map(drop)),
        Command::Style(args) => report(run_style(&args).map(drop)),
    };
    std::process::exit(exit_code);
}

fn report<T>(result: anyhow::Result<T>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
