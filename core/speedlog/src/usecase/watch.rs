//! Watch コマンドのユースケース
//!
//! 次の実行時刻まで待ち、Record を 1 回実行する、を繰り返す。
//! Record の I/O エラーでは止まらず、ERROR_BACKOFF 待ってから続行する。

use super::record::{RecordOutcome, RecordUseCase};
use crate::domain::Settings;
use crate::ports::outbound::{InterruptChecker, SleepOutcome, Sleeper};
use common::error::Error;
use common::ports::outbound::{Clock, Log, LogLevel, LogRecord};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// 予期しないエラー後の待機時間
pub const ERROR_BACKOFF: Duration = Duration::from_secs(60);

/// ループ終了時の集計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchSummary {
    pub runs: u32,
    pub appended: u32,
    pub skipped: u32,
    pub errors: u32,
    /// Ctrl+C で止まった
    pub interrupted: bool,
}

impl WatchSummary {
    fn tally(&mut self, outcome: &RecordOutcome) {
        match outcome {
            RecordOutcome::Appended(_) | RecordOutcome::AppendedFailure { .. } => self.appended += 1,
            RecordOutcome::Skipped { .. } => self.skipped += 1,
        }
    }
}

/// Watch コマンドのユースケース
pub struct WatchUseCase {
    record: Arc<RecordUseCase>,
    clock: Arc<dyn Clock>,
    sleeper: Arc<dyn Sleeper>,
    interrupt: Arc<dyn InterruptChecker>,
    log: Arc<dyn Log>,
    settings: Settings,
}

impl WatchUseCase {
    pub fn new(
        record: Arc<RecordUseCase>,
        clock: Arc<dyn Clock>,
        sleeper: Arc<dyn Sleeper>,
        interrupt: Arc<dyn InterruptChecker>,
        log: Arc<dyn Log>,
        settings: Settings,
    ) -> Self {
        Self {
            record,
            clock,
            sleeper,
            interrupt,
            log,
            settings,
        }
    }

    fn emit(&self, record: LogRecord) {
        let _ = self.log.log(&record);
    }

    /// count 回実行したら終了（None なら割り込みまで続ける）
    pub fn run(&self, count: Option<u32>) -> Result<WatchSummary, Error> {
        let schedule = self.settings.schedule;
        let mut summary = WatchSummary::default();
        self.emit(
            LogRecord::new(LogLevel::Info, "usecase", "lifecycle", "watch started")
                .with_field("minutes", json!(schedule.describe()))
                .with_field("timezone", json!(self.settings.timezone.to_string())),
        );

        loop {
            if count.is_some_and(|max| summary.runs >= max) {
                break;
            }
            if self.interrupt.is_interrupted() {
                summary.interrupted = true;
                break;
            }

            let tz = self.settings.timezone;
            let now_utc = self.clock.now_utc();
            let now = tz.to_local_naive(now_utc);
            let next = schedule.next_run_after(now);
            // 壁時計の差ではなく UTC で測る（DST の切り替えをまたぐ待機）
            let wait = tz
                .to_utc(next)
                .map(|next_utc| next_utc - now_utc)
                .unwrap_or(next - now)
                .to_std()
                .unwrap_or(Duration::ZERO);
            self.emit(
                LogRecord::new(LogLevel::Info, "usecase", "schedule", "next run scheduled")
                    .with_field("now", json!(now.format("%Y-%m-%d %H:%M:%S").to_string()))
                    .with_field("next", json!(next.format("%Y-%m-%d %H:%M:%S").to_string()))
                    .with_field("wait_secs", json!(wait.as_secs_f64())),
            );
            if self.sleeper.sleep(wait) == SleepOutcome::Interrupted {
                summary.interrupted = true;
                break;
            }

            summary.runs += 1;
            match self.record.run_scheduled(&*self.interrupt) {
                Ok(outcome) => summary.tally(&outcome),
                Err(e) => {
                    summary.errors += 1;
                    self.emit(
                        LogRecord::new(
                            LogLevel::Error,
                            "usecase",
                            "error",
                            format!("record failed: {}; retrying after backoff", e),
                        )
                        .with_field("backoff_secs", json!(ERROR_BACKOFF.as_secs())),
                    );
                    let last_run = count.is_some_and(|max| summary.runs >= max);
                    if !last_run && self.sleeper.sleep(ERROR_BACKOFF) == SleepOutcome::Interrupted {
                        summary.interrupted = true;
                        break;
                    }
                }
            }
        }

        self.emit(
            LogRecord::new(LogLevel::Info, "usecase", "lifecycle", "watch stopped")
                .with_field("runs", json!(summary.runs))
                .with_field("appended", json!(summary.appended))
                .with_field("skipped", json!(summary.skipped))
                .with_field("errors", json!(summary.errors))
                .with_field("interrupted", json!(summary.interrupted)),
        );
        Ok(summary)
    }
}
