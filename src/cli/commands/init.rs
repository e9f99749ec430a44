//! # Init Command Module / 初始化命令模块
//!
//! This module implements the `init` command, which writes a default
//! `OtaRunner.toml` and a sample command set into a directory. In interactive
//! mode it asks for the tool command line and confirms before overwriting;
//! non-interactive mode keeps files that already exist.
//!
//! 此模块实现了 `init` 命令，在目录中写入默认的 `OtaRunner.toml` 和示例命令集。
//! 在交互模式下，它会询问工具命令行，并在覆盖文件前进行确认。

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};
use std::fs;
use std::path::Path;

use crate::core::config::{CommandEntry, CommandSet, DEFAULT_CONFIG_FILE, RunnerConfig};
use crate::infra::t;

/// File name of the generated sample command set.
pub const SAMPLE_COMMANDS_FILE: &str = "Sample_Commands.toml";

/// Runs the wizard that generates the configuration and sample command set
/// inside `dir`.
///
/// 运行向导，在 `dir` 中生成配置文件和示例命令集。
pub fn run_init_wizard(dir: &Path, language: &str, non_interactive: bool) -> Result<()> {
    let theme = ColorfulTheme::default();
    let mut config = RunnerConfig {
        language: language.to_string(),
        ..RunnerConfig::default()
    };

    if !non_interactive {
        println!("\n{}", t!("init_wizard_welcome", locale = language).cyan().bold());
        println!("{}", t!("init_wizard_description", locale = language));

        config.tool.command = Input::with_theme(&theme)
            .with_prompt(t!("init_tool_command_prompt", locale = language).to_string())
            .default(config.tool.command.clone())
            .interact_text()
            .context(t!("init_user_confirmation_failed", locale = language).to_string())?;
    }

    let config_text = toml::to_string_pretty(&config).context("Failed to serialize configuration")?;
    let sample_text =
        toml::to_string_pretty(&sample_command_set()).context("Failed to serialize command set")?;

    for (name, content) in [(DEFAULT_CONFIG_FILE, config_text), (SAMPLE_COMMANDS_FILE, sample_text)] {
        let path = dir.join(name);
        // Existing files are only replaced after an explicit confirmation.
        if path.exists() && (non_interactive || !confirm_overwrite(&theme, &path, language)?) {
            println!("{}", t!("init_skipped", locale = language, path = path.display()));
            continue;
        }
        fs::write(&path, content).with_context(|| {
            t!("init_write_failed", locale = language, path = path.display()).to_string()
        })?;
        println!(
            "{}",
            t!("init_written", locale = language, path = path.display()).green()
        );
    }

    println!("{}", t!("init_next_steps", locale = language));
    Ok(())
}

fn confirm_overwrite(theme: &ColorfulTheme, path: &Path, language: &str) -> Result<bool> {
    Confirm::with_theme(theme)
        .with_prompt(t!("init_overwrite_prompt", locale = language, path = path.display()).to_string())
        .default(false)
        .interact()
        .context(t!("init_user_confirmation_failed", locale = language).to_string())
}

/// A small command set showing the file layout.
fn sample_command_set() -> CommandSet {
    let entry = |command: &str, expected: &str| CommandEntry {
        command: command.to_string(),
        expected_response: expected.to_string(),
    };
    CommandSet {
        commands: vec![
            entry("GET VERINF", ""),
            entry("GET IMEI", ""),
            entry("SET APN internet", "OK"),
            entry("GET APN", "internet"),
        ],
    }
}
