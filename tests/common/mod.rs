// Shared test helpers for integration tests
#![allow(dead_code)]

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use ota_cmd_runner::infra::command::CommandInvoker;
use ota_cmd_runner::models::{Imei, RawInvocation, RunContext, TestCommand};

pub const TEST_IMEI: &str = "123456789012345";

/// An invoker that answers with scripted outputs, in order, and records every call.
/// Once the script is exhausted it answers with an empty output.
#[derive(Clone, Default)]
pub struct ScriptedInvoker {
    outputs: Arc<Mutex<VecDeque<String>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl ScriptedInvoker {
    pub fn new<I, S>(outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            outputs: Arc::new(Mutex::new(outputs.into_iter().map(Into::into).collect())),
            calls: Arc::default(),
        }
    }

    /// `(imei, command)` pairs in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn commands_sent(&self) -> Vec<String> {
        self.calls().into_iter().map(|(_, command)| command).collect()
    }
}

impl CommandInvoker for ScriptedInvoker {
    async fn invoke(&self, imei: &str, command: &str) -> RawInvocation {
        self.calls
            .lock()
            .unwrap()
            .push((imei.to_string(), command.to_string()));
        let stdout = self.outputs.lock().unwrap().pop_front().unwrap_or_default();
        RawInvocation {
            invocation: format!("tool {imei} {command}"),
            stdout,
            succeeded: true,
        }
    }
}

pub fn context() -> RunContext {
    RunContext::new(Imei::parse(TEST_IMEI).unwrap(), "Tester", "RSW1.2.3")
}

/// Builds a command set from `(command, expected)` pairs.
pub fn commands(pairs: &[(&str, &str)]) -> Vec<TestCommand> {
    pairs
        .iter()
        .enumerate()
        .map(|(i, (command, expected))| TestCommand::new(i + 1, *command, *expected))
        .collect()
}

/// Writes a shell script that mimics the device tool: it is called as
/// `sh <script> <imei> <command>` and prints a canned answer per command.
pub fn write_fake_tool(dir: &Path) -> PathBuf {
    let script = r#"#!/bin/sh
imei="$1"
shift
case "$*" in
  "GET VERINF") echo "Response: VERINF,$imei,RSW9.8.7,2024" ;;
  "GET STATUS") echo "Response: OK" ;;
  "GET TEMP") echo "Response: 42" ;;
  "SLEEP") sleep 5; echo "Response: late" ;;
  "SLOW") sleep 3; echo "Response: OK" ;;
  "OFFLINE") echo "ERROR: operation failed" ;;
  "MISSING") echo "error code 404001" ;;
  *) echo "unknown command" >&2; exit 1 ;;
esac
"#;
    let path = dir.join("fake_tool.sh");
    fs::write(&path, script).expect("Failed to write fake tool");
    path
}
