mod adapter;
mod cli;
mod domain;
mod ports;
mod usecase;
mod wiring;

#[cfg(test)]
mod tests;

use std::process;
use common::error::Error;
use common::ports::outbound::{LogLevel, LogRecord};
use cli::{config_to_command, parse_args, print_completion, Config, ParseOutcome};
use domain::{Command, Settings};
use ports::inbound::UseCaseRunner;
use wiring::{wire_speedlog, App};

/// Command をディスパッチする Runner（match は main レイヤーに集約）
struct Runner;

impl UseCaseRunner for Runner {
    fn run(&self, config: Config) -> Result<i32, Error> {
        match config_to_command(&config) {
            Command::Help => {
                print_help();
                Ok(0)
            }
            Command::Unknown(name) => Err(unknown_command(&name)),
            command => {
                let app = wire_speedlog(&config)?;
                dispatch(&app, command)
            }
        }
    }
}

fn unknown_command(name: &str) -> Error {
    Error::invalid_argument(format!("Command '{}' is not implemented.", name))
}

/// App を使うコマンドの実行（開始・終了を構造化ログに残す）
fn dispatch(app: &App, command: Command) -> Result<i32, Error> {
    let _ = app.logger.log(
        &LogRecord::new(LogLevel::Debug, "cli", "lifecycle", "command started")
            .with_field("command", serde_json::json!(command.name())),
    );

    let result = match &command {
        Command::Record => app.record_use_case.run().map(|outcome| outcome.exit_code()),
        Command::Watch { count } => {
            print_watch_banner(&app.settings);
            app.watch_use_case().run(*count).map(|summary| {
                if summary.interrupted {
                    println!();
                    println!("Interrupted.");
                }
                println!(
                    "Stopped after {} run(s): {} appended, {} skipped, {} error(s).",
                    summary.runs, summary.appended, summary.skipped, summary.errors
                );
                0
            })
        }
        Command::ShowConfig => {
            print_settings(app);
            Ok(0)
        }
        Command::Help => {
            print_help();
            Ok(0)
        }
        Command::Unknown(name) => Err(unknown_command(name)),
    };

    let (level, message) = match &result {
        Ok(0) => (LogLevel::Debug, "command finished".to_string()),
        Ok(code) => (LogLevel::Debug, format!("command finished with exit code {}", code)),
        Err(e) => (LogLevel::Error, format!("command failed: {}", e)),
    };
    let _ = app.logger.log(
        &LogRecord::new(level, "cli", "lifecycle", message)
            .with_field("command", serde_json::json!(command.name())),
    );
    result
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("speedlog: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

fn print_usage() {
    eprintln!("Usage: speedlog [-h] [-v] [-c file] [-o file] [-e path] [-s id] [--timezone tz] [--record-failures|--skip-failures] [record|watch|config]");
}

fn print_help() {
    println!("Usage: speedlog [-h] [-v] [-c file] [-o file] [-e path] [-s id] [--timezone tz] [--record-failures|--skip-failures] [<command>]");
    println!("  -h, --help            Display this help message.");
    println!("  -v, --verbose         Also print info/debug logs to stderr.");
    println!("  -c, --config          Config file (default: $XDG_CONFIG_HOME/speedlog/config.json).");
    println!("  -o, --output          CSV file to append to (default: ~/speedtest/output.csv).");
    println!("  -e, --executable      Speed-test executable (default: speedtest).");
    println!("  -s, --server-id       Server id passed to the tool (default: 48463).");
    println!("  --timezone <tz>       Timestamp zone: local (default), utc or an offset like +09:00.");
    println!("  --record-failures     Append a line even when the measurement fails (default for record).");
    println!("  --skip-failures       Append nothing when the measurement fails; record exits 70 (default for watch).");
    println!("  --generate <shell>    Generate shell completion script (bash, zsh, fish).");
    println!();
    println!("Commands:");
    println!("  record                Measure once and append one line (default).");
    println!("  watch                 Measure at fixed minutes of every hour until Ctrl+C.");
    println!("    --interval <min>    Minutes between runs; must divide 60 (default: 10).");
    println!("    --offset <min>      Minute offset inside each interval (default: 3).");
    println!("    -n, --count <runs>  Stop after this many runs.");
    println!("  config                Show the resolved settings.");
    println!();
    println!("Environment:");
    println!("  SPEEDLOG_HOME         Put config.json, output.csv and logs/ under this directory.");
    println!("  SPEEDLOG_EXECUTABLE, SPEEDLOG_SERVER_ID, SPEEDLOG_OUTPUT, SPEEDLOG_TIMEZONE");
    println!("                        Override the config file (command-line options win).");
    println!();
    println!("Each line is: \"YYYY-MM-DD HH:MM:SS\",<tool csv output>");
}

fn print_watch_banner(settings: &Settings) {
    println!("speedlog watch (PID: {})", process::id());
    println!("Output file:  {}", settings.output_file.display());
    println!(
        "Schedule:     minutes {} of every hour ({})",
        settings.schedule.describe(),
        settings.timezone
    );
    println!("Server id:    {}", settings.server_id);
    println!("Press Ctrl+C to stop.");
}

fn print_settings(app: &App) {
    let s = &app.settings;
    println!("executable       {}", s.executable.display());
    println!("server_id        {}", s.server_id);
    println!("output_file      {}", s.output_file.display());
    println!("timezone         {}", s.timezone);
    println!("interval_minutes {}", s.schedule.interval_minutes());
    println!("offset_minutes   {}", s.schedule.offset_minutes());
    match s.on_failure {
        Some(p) => println!("on_failure       {}", p),
        None => println!("on_failure       (record: append, watch: skip)"),
    }
    match &app.dirs {
        Some(d) => {
            println!("config_file      {}", d.config_file().display());
            println!("log_file         {}", d.log_file().display());
        }
        None => println!("config_file      (unresolved: HOME is not set)"),
    }
}

pub fn run() -> Result<i32, Error> {
    let config = match parse_args()? {
        ParseOutcome::Config(c) => c,
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
    };
    Runner.run(config)
}
