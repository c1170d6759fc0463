//! Scena CLI - Command line interface
//!
//! Project-based execution - all configuration from scenario.json

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;

use scena_api::{init_config, run_script, RunConfig, ScenaError};
use scena_config::{LimitConfig, LogLevel, VmConfig};
use scena_log::{Level, LogConfig};

/// scenario.json 结构
#[derive(Debug, serde::Deserialize)]
struct ScenarioJson {
    /// 脚本字节流文件路径
    script: String,
    /// 运行选项
    options: Option<RunOptions>,
}

/// 运行选项
#[derive(Debug, Default, serde::Deserialize)]
struct RunOptions {
    /// tick 预算上限
    max_ticks: Option<u64>,
    /// 单 tick 派发上限
    max_ops_per_tick: Option<usize>,
    /// 日志级别: "silent", "error", "warn", "info", "debug", "trace"
    log_level: Option<String>,
    /// 是否逐条打印派发的 opcode
    trace: Option<bool>,
    /// 是否自动收口消息等待
    auto_ack: Option<bool>,
}

#[derive(Parser)]
#[command(
    name = "scena",
    about = "Scena script VM - scenario-based execution",
    version = "0.1.0"
)]
struct Cli {
    /// Configuration file path (default: ./scenario.json)
    #[arg(value_name = "CONFIG", default_value = "scenario.json")]
    config: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    // Read scenario.json
    let scenario = match read_scenario_json(&cli.config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    // Resolve script path (relative to scenario.json directory)
    let script_path = resolve_script_path(&cli.config, &scenario.script);

    // Read script blob
    let code = match std::fs::read(&script_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!(
                "Error: Cannot read script file '{}': {}",
                script_path.display(),
                e
            );
            process::exit(1);
        }
    };

    // Build run configuration from scenario.json
    let run_config = build_run_config(&scenario);

    // Initialize API config (global singleton for convenience)
    init_config(run_config.clone());

    println!("[Scena VM]");
    println!("Script: {} ({} bytes)", script_path.display(), code.len());

    // Execute
    match run_script(&code, &run_config) {
        Ok(output) => {
            println!("Finished after {} ticks", output.ticks);
            if output.saved_vars.is_empty() {
                println!("Saved vars: (none)");
            } else {
                println!("Saved vars:");
                for (id, value) in &output.saved_vars {
                    println!("  {:#06x} = {}", id, value);
                }
            }
        }
        Err(e @ ScenaError::TickBudgetExceeded { .. }) => {
            eprintln!("Error: {}", e);
            eprintln!("Hint: the script may wait on an operation that never completes");
            process::exit(2);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Read and parse scenario.json
fn read_scenario_json(path: &Path) -> Result<ScenarioJson, String> {
    if !path.exists() {
        return Err(format!(
            "未找到 '{}'\n\n当前目录不是一个 Scena 场景。\n提示: 创建 '{}' 文件并指定 'script' 字段",
            path.display(),
            path.display()
        ));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read '{}': {}", path.display(), e))?;

    serde_json::from_str(&content)
        .map_err(|e| format!("Invalid scenario file '{}': {}", path.display(), e))
}

/// Resolve script path relative to the scenario.json directory
fn resolve_script_path(config_path: &Path, script: &str) -> PathBuf {
    let script_path = Path::new(script);
    if script_path.is_absolute() {
        return script_path.to_path_buf();
    }
    match config_path.parent() {
        Some(dir) => dir.join(script_path),
        None => script_path.to_path_buf(),
    }
}

/// Build run configuration from scenario options
fn build_run_config(scenario: &ScenarioJson) -> RunConfig {
    let options = scenario.options.as_ref();

    let log_level = options
        .and_then(|o| o.log_level.as_deref())
        .and_then(LogLevel::parse)
        .unwrap_or(LogLevel::Warn);

    let trace = options.and_then(|o| o.trace).unwrap_or(false);

    let (logger, _ring) = match to_sink_level(log_level) {
        Some(level) => LogConfig::new(level).with_stderr().init(),
        None => (scena_log::Logger::noop(), None),
    };

    let mut limits = LimitConfig::default();
    if let Some(max_ticks) = options.and_then(|o| o.max_ticks) {
        limits.max_ticks = max_ticks;
    }

    let mut vm = VmConfig::default();
    if let Some(max_ops) = options.and_then(|o| o.max_ops_per_tick) {
        vm.max_ops_per_tick = max_ops;
    }

    RunConfig {
        trace_dispatch: trace,
        auto_ack_messages: options.and_then(|o| o.auto_ack).unwrap_or(true),
        vm,
        limits,
        logger,
    }
}

/// Map manifest log level to sink level ("silent" means no logger at all)
fn to_sink_level(level: LogLevel) -> Option<Level> {
    match level {
        LogLevel::Silent => None,
        LogLevel::Error => Some(Level::Error),
        LogLevel::Warn => Some(Level::Warn),
        LogLevel::Info => Some(Level::Info),
        LogLevel::Debug => Some(Level::Debug),
        LogLevel::Trace => Some(Level::Trace),
    }
}
