use crate::domain::{Command, FailurePolicy, SettingsOverrides};
use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::error::Error;
use std::ffi::OsString;
use std::path::PathBuf;

/// CLI から受け取った生の設定（command は文字列のまま保持）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub help: bool,
    pub verbose: bool,
    pub config_file: Option<String>,
    pub output: Option<String>,
    pub executable: Option<String>,
    pub server_id: Option<String>,
    pub timezone: Option<String>,
    pub record_failures: bool,
    pub skip_failures: bool,
    /// watch 用
    pub interval: Option<u32>,
    pub offset: Option<u32>,
    pub count: Option<u32>,
    /// コマンド名（None の場合は record）
    pub command_name: Option<String>,
}

impl Config {
    /// 設定読み込みに渡す上書き値
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            config_file: self.config_file.as_ref().map(PathBuf::from),
            executable: self.executable.clone(),
            server_id: self.server_id.clone(),
            output_file: self.output.clone(),
            timezone: self.timezone.clone(),
            interval_minutes: self.interval,
            offset_minutes: self.offset,
            on_failure: if self.skip_failures {
                Some(FailurePolicy::Skip)
            } else if self.record_failures {
                Some(FailurePolicy::Append)
            } else {
                None
            },
        }
    }
}

/// 解析結果: 通常の Config または補完スクリプト生成
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

fn global_args(cmd: clap::Command) -> clap::Command {
    cmd.disable_help_flag(true)
        .disable_help_subcommand(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Print help")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Also print info/debug logs to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            clap::Arg::new("config")
                .short('c')
                .long("config")
                .value_name("file")
                .help("Config file (default: $XDG_CONFIG_HOME/speedlog/config.json)")
                .num_args(1)
                .global(true),
        )
        .arg(
            clap::Arg::new("output")
                .short('o')
                .long("output")
                .value_name("file")
                .help("CSV file to append to (default: ~/speedtest/output.csv)")
                .num_args(1)
                .global(true),
        )
        .arg(
            clap::Arg::new("executable")
                .short('e')
                .long("executable")
                .value_name("path")
                .help("Speed-test executable (default: speedtest)")
                .num_args(1)
                .global(true),
        )
        .arg(
            clap::Arg::new("server-id")
                .short('s')
                .long("server-id")
                .value_name("id")
                .help("Server id passed as --server-id (default: 48463)")
                .num_args(1)
                .global(true),
        )
        .arg(
            clap::Arg::new("timezone")
                .long("timezone")
                .value_name("tz")
                .help("Timestamp zone: local, utc or an offset like +09:00")
                .num_args(1)
                .global(true),
        )
        .arg(
            clap::Arg::new("record-failures")
                .long("record-failures")
                .help("Append a line even when the measurement fails (default for record)")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            clap::Arg::new("skip-failures")
                .long("skip-failures")
                .help("Append nothing when the measurement fails (default for watch)")
                .action(ArgAction::SetTrue)
                .conflicts_with("record-failures")
                .global(true),
        )
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
}

fn build_watch_subcommand() -> clap::Command {
    clap::Command::new("watch")
        .about("Measure repeatedly at fixed minutes of every hour until Ctrl+C")
        .arg(
            clap::Arg::new("interval")
                .long("interval")
                .value_name("minutes")
                .help("Minutes between runs; must divide 60 (default: 10)")
                .value_parser(value_parser!(u32))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("offset")
                .long("offset")
                .value_name("minutes")
                .help("Minute offset inside each interval (default: 3)")
                .value_parser(value_parser!(u32))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("count")
                .short('n')
                .long("count")
                .value_name("runs")
                .help("Stop after this many runs")
                .value_parser(value_parser!(u32))
                .num_args(1),
        )
}

pub(crate) fn build_clap_command() -> clap::Command {
    global_args(
        clap::Command::new("speedlog")
            .about("Append speed-test results to a CSV log")
            .subcommand_required(false)
            .subcommand(clap::Command::new("record").about("Measure once and append one line (default)"))
            .subcommand(build_watch_subcommand())
            .subcommand(clap::Command::new("config").about("Show the resolved settings"))
            .subcommand(clap::Command::new("help").about("Display this help message")),
    )
}

/// グローバル引数はサブコマンド側を優先して読む
fn string_arg(top: &clap::ArgMatches, sub: Option<&clap::ArgMatches>, id: &str) -> Option<String> {
    sub.and_then(|m| m.get_one::<String>(id).cloned())
        .or_else(|| top.get_one::<String>(id).cloned())
}

fn flag_arg(top: &clap::ArgMatches, sub: Option<&clap::ArgMatches>, id: &str) -> bool {
    top.get_flag(id) || sub.map(|m| m.get_flag(id)).unwrap_or(false)
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    let sub = matches.subcommand();
    let sub_matches = sub.map(|(_, m)| m);

    let (help, command_name) = match sub {
        None => (false, None),
        Some(("help", _)) => (true, None),
        Some((name, _)) => (false, Some(name.to_string())),
    };
    let watch = matches.subcommand_matches("watch");

    Config {
        help: help || flag_arg(matches, sub_matches, "help"),
        verbose: flag_arg(matches, sub_matches, "verbose"),
        config_file: string_arg(matches, sub_matches, "config"),
        output: string_arg(matches, sub_matches, "output"),
        executable: string_arg(matches, sub_matches, "executable"),
        server_id: string_arg(matches, sub_matches, "server-id"),
        timezone: string_arg(matches, sub_matches, "timezone"),
        record_failures: flag_arg(matches, sub_matches, "record-failures"),
        skip_failures: flag_arg(matches, sub_matches, "skip-failures"),
        interval: watch.and_then(|m| m.get_one::<u32>("interval").copied()),
        offset: watch.and_then(|m| m.get_one::<u32>("offset").copied()),
        count: watch.and_then(|m| m.get_one::<u32>("count").copied()),
        command_name,
    }
}

/// 任意の引数列を解析する（先頭はプログラム名）
pub fn parse_args_from<I, T>(args: I) -> Result<ParseOutcome, Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_clap_command()
        .try_get_matches_from(args)
        .map_err(|e| Error::invalid_argument(e.to_string().trim_end().to_string()))?;

    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }

    Ok(ParseOutcome::Config(matches_to_config(&matches)))
}

/// コマンドラインを解析する。補完生成が要求された場合は ParseOutcome::GenerateCompletion を返す。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    parse_args_from(std::env::args_os())
}

/// 補完スクリプトを標準出力に出力する。
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, "speedlog", &mut std::io::stdout());
}

/// Config を Command に変換する
pub fn config_to_command(config: &Config) -> Command {
    if config.help {
        return Command::Help;
    }
    match &config.command_name {
        Some(name) => Command::parse(name, config.count),
        None => Command::Record,
    }
}
