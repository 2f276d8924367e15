//! 配線: 標準アダプタで UseCase を組み立てる

use std::sync::Arc;

use common::adapter::{
    FanoutLog, FileJsonLog, StderrLog, StdClock, StdEnvResolver, StdFileSystem, StdProcess,
};
use common::domain::Dirs;
use common::error::Error;
use common::ports::outbound::{Clock, EnvResolver, FileSystem, Log, LogLevel, LogRecord, Process};

use crate::adapter::{
    load_settings, CsvFileSink, NoopInterruptChecker, SigintChecker, SpeedtestCli, ThreadSleeper,
};
use crate::cli::Config;
use crate::domain::Settings;
use crate::ports::outbound::{InterruptChecker, RecordSink, Sleeper, SpeedTester};
use crate::usecase::{RecordUseCase, WatchUseCase};

/// 配線で組み立てたポート群（main の Command ディスパッチで利用）
pub struct App {
    pub settings: Settings,
    /// 解決できなかった場合（HOME 未設定で -o 指定など）は None
    pub dirs: Option<Dirs>,
    /// 構造化ログ（ファイルへ JSONL + stderr）
    pub logger: Arc<dyn Log>,
    pub clock: Arc<dyn Clock>,
    pub record_use_case: Arc<RecordUseCase>,
}

impl App {
    /// Watch ユースケースを組み立てる。
    /// Ctrl+C ハンドラはここで初めて登録する（record 単発では既定の SIGINT 動作のまま）。
    pub fn watch_use_case(&self) -> WatchUseCase {
        let interrupt: Arc<dyn InterruptChecker> = match SigintChecker::install() {
            Ok(c) => Arc::new(c),
            Err(e) => {
                let _ = self.logger.log(&LogRecord::new(
                    LogLevel::Warn,
                    "wiring",
                    "lifecycle",
                    e.to_string(),
                ));
                Arc::new(NoopInterruptChecker)
            }
        };
        let sleeper: Arc<dyn Sleeper> = Arc::new(ThreadSleeper::new(Arc::clone(&interrupt)));
        WatchUseCase::new(
            Arc::clone(&self.record_use_case),
            Arc::clone(&self.clock),
            sleeper,
            interrupt,
            Arc::clone(&self.logger),
            self.settings.clone(),
        )
    }
}

/// ログ: dirs があれば JSONL ファイル、常に stderr
pub fn wire_logger(fs: Arc<dyn FileSystem>, dirs: Option<&Dirs>, verbose: bool) -> Arc<dyn Log> {
    let mut logs: Vec<Arc<dyn Log>> = vec![Arc::new(StderrLog::for_verbosity(verbose))];
    if let Some(d) = dirs {
        logs.push(Arc::new(FileJsonLog::new(fs, d.log_file())));
    }
    Arc::new(FanoutLog::new(logs))
}

/// 配線: 標準アダプタで App を組み立てる
pub fn wire_speedlog(config: &Config) -> Result<App, Error> {
    wire_speedlog_with(config, Arc::new(StdEnvResolver), Arc::new(StdProcess))
}

/// 環境変数解決とプロセス実行を差し替えて App を組み立てる（テスト用の入口も兼ねる）
pub fn wire_speedlog_with(
    config: &Config,
    env_resolver: Arc<dyn EnvResolver>,
    process: Arc<dyn Process>,
) -> Result<App, Error> {
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let dirs = env_resolver.resolve_dirs().ok();
    let logger = wire_logger(Arc::clone(&fs), dirs.as_ref(), config.verbose);
    let settings = load_settings(
        env_resolver.as_ref(),
        fs.as_ref(),
        dirs.as_ref(),
        &config.overrides(),
    )?;

    let clock: Arc<dyn Clock> = Arc::new(StdClock);
    let tester: Arc<dyn SpeedTester> =
        Arc::new(SpeedtestCli::new(process, settings.executable.clone()));
    let sink: Arc<dyn RecordSink> =
        Arc::new(CsvFileSink::new(Arc::clone(&fs), &settings.output_file));
    let record_use_case = Arc::new(RecordUseCase::new(
        Arc::clone(&clock),
        tester,
        sink,
        Arc::clone(&logger),
        settings.clone(),
    ));

    Ok(App {
        settings,
        dirs,
        logger,
        clock,
        record_use_case,
    })
}
