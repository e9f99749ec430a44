// src/cli.rs
use anyhow::Result;
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, Command};
use std::{env, path::PathBuf};

use crate::core::config::DEFAULT_CONFIG_FILE;
use crate::infra::t;

pub mod commands;

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` argument.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    args.iter()
        .position(|arg| arg == "--lang")
        .and_then(|pos| args.get(pos + 1))
        .cloned()
}

pub fn build_cli(locale: &str) -> Command {
    Command::new("ota-cmd-runner")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli_about", locale = locale).to_string())
        .arg_required_else_help(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli_lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand(
            Command::new("run")
                .about(t!("cmd_run_about", locale = locale).to_string())
                .arg(
                    Arg::new("commands")
                        .short('f')
                        .long("commands")
                        .help(t!("arg_commands", locale = locale).to_string())
                        .value_name("COMMANDS")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("imei")
                        .short('i')
                        .long("imei")
                        .help(t!("arg_imei", locale = locale).to_string())
                        .value_name("IMEI")
                        .required(true)
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("tester")
                        .short('t')
                        .long("tester")
                        .help(t!("arg_tester", locale = locale).to_string())
                        .value_name("TESTER")
                        .required(true)
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help(t!("arg_config", locale = locale).to_string())
                        .value_name("CONFIG")
                        .default_value(DEFAULT_CONFIG_FILE)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("delay-ms")
                        .long("delay-ms")
                        .help(t!("arg_delay_ms", locale = locale).to_string())
                        .value_name("MILLIS")
                        .value_parser(clap::value_parser!(u64))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("skip-network-check")
                        .long("skip-network-check")
                        .help(t!("arg_skip_network_check", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("init")
                .about(t!("cmd_init_about", locale = locale).to_string())
                .arg(
                    Arg::new("non-interactive")
                        .long("non-interactive")
                        .help(t!("arg_non_interactive", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
}

pub async fn run() -> Result<()> {
    // Pre-parse language and initialize i18n first.
    let language = pre_parse_language();
    if let Some(lang) = &language {
        rust_i18n::set_locale(crate::resolve_locale(lang));
    }
    let locale = rust_i18n::locale().to_string();

    let matches = build_cli(&locale).get_matches();

    match matches.subcommand() {
        Some(("run", run_matches)) => {
            let args = commands::run::RunArgs {
                commands: run_matches
                    .get_one::<PathBuf>("commands")
                    .cloned()
                    .unwrap_or_default(),
                imei: run_matches
                    .get_one::<String>("imei")
                    .cloned()
                    .unwrap_or_default(),
                tester: run_matches
                    .get_one::<String>("tester")
                    .cloned()
                    .unwrap_or_default(),
                config: run_matches
                    .get_one::<PathBuf>("config")
                    .cloned()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
                config_explicit: run_matches.value_source("config")
                    != Some(ValueSource::DefaultValue),
                delay_ms: run_matches.get_one::<u64>("delay-ms").copied(),
                skip_network_check: run_matches.get_flag("skip-network-check"),
                language,
            };
            commands::run::execute(args).await?;
        }
        Some(("init", init_matches)) => {
            let non_interactive = init_matches.get_flag("non-interactive");
            commands::init::run_init_wizard(&env::current_dir()?, &locale, non_interactive)?;
        }
        _ => {
            // Clap has already printed the help text.
        }
    }
    Ok(())
}
