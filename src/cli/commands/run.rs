//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` command, which validates the inputs,
//! checks network reachability, probes the device firmware version, executes
//! the command set sequentially and writes the report and transcript.
//!
//! 此模块实现了 `run` 命令：验证输入、检查网络可达性、探测设备固件版本、
//! 顺序执行命令集并写入报告和调用记录。

use anyhow::{Context, Result};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::{
    core::{
        config::{self, RunnerConfig},
        models::{Imei, RunContext, RunState, ValidationError, validate_tester},
        scheduler::{RunPolicy, Scheduler},
        version::probe_version,
    },
    infra::{
        command::ExternalTool,
        fs::{ReportPaths, absolute_path},
        logging,
        network::{GatePolicy, HttpProbe, check_reachable},
        t,
    },
    reporting::{ConsoleObserver, Report, Transcript, print_summary, write_html_report},
};

/// Arguments of the `run` command as parsed from the command line.
#[derive(Debug, Clone)]
pub struct RunArgs {
    /// Command-set file (`.toml` or `.json`) / 命令集文件
    pub commands: PathBuf,
    pub imei: String,
    pub tester: String,
    /// Runner configuration file / 运行器配置文件
    pub config: PathBuf,
    /// Whether `config` was given explicitly rather than defaulted.
    pub config_explicit: bool,
    /// Overrides `schedule.command_delay_ms` / 覆盖命令间延迟
    pub delay_ms: Option<u64>,
    pub skip_network_check: bool,
    /// `--lang` from the command line, which wins over the configured language.
    pub language: Option<String>,
}

/// Executes the run command with the provided arguments.
///
/// # Returns
/// `Ok(())` for a completed or aborted run; an error when validation, the
/// network gate, loading the command set or writing an artifact fails.
///
/// 对于已完成或已中止的运行返回 `Ok(())`；
/// 当验证、网络检查、加载命令集或写入产物失败时返回错误。
pub async fn execute(args: RunArgs) -> Result<()> {
    let runner_config = setup_and_parse_config(&args.config, args.config_explicit)?;
    let locale = crate::resolve_locale(
        args.language
            .as_deref()
            .unwrap_or(runner_config.language.as_str()),
    )
    .to_string();
    rust_i18n::set_locale(&locale);

    if let Err(e) = logging::init(Path::new(&runner_config.log_file)) {
        eprintln!(
            "{} {:#}",
            t!("log_init_failed", locale = &locale).yellow(),
            e
        );
    }

    let imei = Imei::parse(&args.imei)?;
    let tester = validate_tester(&args.tester)?.to_string();
    if !args.commands.is_file() {
        return Err(ValidationError::MissingCommandFile(args.commands.display().to_string()).into());
    }

    if runner_config.network.enabled && !args.skip_network_check {
        ensure_network(&runner_config, &locale).await?;
    } else {
        info!("Network check skipped");
    }

    println!(
        "{}",
        t!("loading_commands", locale = &locale, path = args.commands.display())
    );
    let commands = config::load_command_set(&args.commands)?;
    if commands.is_empty() {
        println!("{}", t!("no_commands", locale = &locale).yellow());
    }

    let tool = ExternalTool::from_config(&runner_config.tool)?;
    let version_info = probe_version(&tool, &imei).await;
    println!(
        "{}",
        t!("version_detected", locale = &locale, version = version_info.as_str()).cyan()
    );

    let abort = setup_signal_handler(&locale);
    let ctx = RunContext::with_abort_token(imei, tester, version_info, abort);
    let paths = ReportPaths::beside(&args.commands, &ctx.imei, &ctx.started_at);

    info!(
        imei = %ctx.imei,
        tester = %ctx.tester_name,
        version = %ctx.version_info,
        commands = commands.len(),
        "Run started"
    );
    println!(
        "{}",
        t!(
            "run_started",
            locale = &locale,
            count = commands.len(),
            imei = ctx.imei.as_str()
        )
        .bold()
    );

    let mut transcript = Transcript::create(&paths.transcript)?;
    let mut policy = RunPolicy::from(&runner_config.schedule);
    if let Some(ms) = args.delay_ms {
        policy.command_delay = Duration::from_millis(ms);
    }
    let scheduler = Scheduler::new(tool, policy);
    let mut observer = ConsoleObserver::new(&locale, commands.len());

    let record = scheduler
        .run(&commands, &ctx, &mut transcript, &mut observer)
        .await;
    drop(transcript);

    let state = record.state.clone();
    let report = Report::build(record, &ctx);
    let report_written = write_html_report(&report, &paths.report, &locale);
    if report_written.is_ok() {
        info!(path = %paths.report.display(), "Report written");
    }

    let folder = absolute_path(&paths.folder).unwrap_or_else(|_| paths.folder.clone());
    print_summary(&report.summary.counters, &state, &folder, &locale);

    report_written.context(t!("report_write_failed", locale = &locale).to_string())?;

    match state {
        RunState::Completed => {
            info!(counters = ?report.summary.counters, "All commands executed");
            Ok(())
        }
        RunState::Aborted(reason) => {
            warn!(?reason, counters = ?report.summary.counters, "Run aborted");
            Ok(())
        }
        RunState::Failed(message) => {
            error!(%message, "Run failed");
            anyhow::bail!(message)
        }
    }
}

/// Loads the runner configuration.
///
/// A missing default configuration file falls back to built-in defaults; a
/// missing file given explicitly with `--config` is an error.
fn setup_and_parse_config(config_path: &Path, explicit: bool) -> Result<RunnerConfig> {
    // For config parsing, we don't have the locale yet.
    let locale = rust_i18n::locale().to_string();
    if !explicit && !config_path.exists() {
        return Ok(RunnerConfig::default());
    }
    config::load_runner_config(config_path).with_context(|| {
        t!("config_load_failed", locale = &locale, path = config_path.display()).to_string()
    })
}

/// Refuses to start the run when the reachability URL cannot be reached.
async fn ensure_network(runner_config: &RunnerConfig, locale: &str) -> Result<()> {
    println!("{}", t!("checking_network", locale = locale));
    let probe = HttpProbe::from_config(&runner_config.network)?;
    let policy = GatePolicy::from(&runner_config.network);

    if check_reachable(&probe, &policy).await {
        info!(url = %runner_config.network.url, "Network reachable");
        Ok(())
    } else {
        error!(url = %runner_config.network.url, "Network unreachable");
        anyhow::bail!(t!("network_unreachable", locale = locale).to_string())
    }
}

/// Sets up a signal handler for graceful shutdown.
///
/// The first Ctrl-C requests an abort, which the scheduler honours at the
/// next command boundary. A second Ctrl-C terminates the process.
fn setup_signal_handler(locale: &str) -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();
    let locale = locale.to_string();

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_err() {
            warn!("Failed to listen for Ctrl-C");
            return;
        }
        println!("\n{}", t!("shutdown_signal", locale = &locale).yellow());
        warn!("Abort requested by user");
        token_clone.cancel();

        if signal::ctrl_c().await.is_ok() {
            eprintln!("{}", t!("forced_exit", locale = &locale).red());
            std::process::exit(130);
        }
    });

    token
}
