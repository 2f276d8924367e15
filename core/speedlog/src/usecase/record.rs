//! Record コマンドのユースケース
//!
//! 現在時刻 → 計測ツール実行 → 行を組み立てて追記。
//! 計測失敗時は既定で空または途中までの出力のまま追記する（毎回 1 行）。watch からの実行は既定で追記しない。

use crate::domain::{FailurePolicy, Settings, SpeedRecord};
use crate::ports::outbound::{InterruptChecker, RecordSink, SpeedTester};
use common::error::Error;
use common::ports::outbound::{Clock, Log, LogLevel, LogRecord};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

/// 計測失敗で何も追記しなかったときの終了コード（--skip-failures 指定時のみ）
pub const EXIT_MEASUREMENT_FAILED: i32 = 70;

/// 1 回分の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// 計測成功、行を追記した
    Appended(SpeedRecord),
    /// 計測失敗だが行を追記した
    AppendedFailure { record: SpeedRecord, reason: String },
    /// 計測失敗、何も追記していない
    Skipped { reason: String },
}

impl RecordOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Appended(_) | Self::AppendedFailure { .. } => 0,
            Self::Skipped { .. } => EXIT_MEASUREMENT_FAILED,
        }
    }
}

/// Record コマンドのユースケース
pub struct RecordUseCase {
    clock: Arc<dyn Clock>,
    tester: Arc<dyn SpeedTester>,
    sink: Arc<dyn RecordSink>,
    log: Arc<dyn Log>,
    settings: Settings,
}

impl RecordUseCase {
    pub fn new(
        clock: Arc<dyn Clock>,
        tester: Arc<dyn SpeedTester>,
        sink: Arc<dyn RecordSink>,
        log: Arc<dyn Log>,
        settings: Settings,
    ) -> Self {
        Self {
            clock,
            tester,
            sink,
            log,
            settings,
        }
    }

    fn emit(&self, record: LogRecord) {
        let _ = self.log.log(&record);
    }

    /// 単発実行: 1 回計測して追記する。追記自体の失敗（I/O）のみ Err。
    pub fn run(&self) -> Result<RecordOutcome, Error> {
        self.run_with(self.settings.failure_policy_or(FailurePolicy::Append), None)
    }

    /// watch からの実行。失敗は既定で追記せず、計測中に Ctrl+C が来た回は常に追記しない。
    pub fn run_scheduled(&self, interrupt: &dyn InterruptChecker) -> Result<RecordOutcome, Error> {
        self.run_with(self.settings.failure_policy_or(FailurePolicy::Skip), Some(interrupt))
    }

    fn run_with(
        &self,
        policy: FailurePolicy,
        interrupt: Option<&dyn InterruptChecker>,
    ) -> Result<RecordOutcome, Error> {
        let started_at = self.settings.timezone.to_local_naive(self.clock.now_utc());
        let started = Instant::now();
        self.emit(
            LogRecord::new(LogLevel::Info, "usecase", "record", "measurement started")
                .with_field("server_id", json!(self.settings.server_id))
                .with_field("executable", json!(self.settings.executable.display().to_string())),
        );

        let (stdout, failure) = match self.tester.measure(&self.settings.server_id) {
            Ok(m) => {
                let failure = m.failure_reason();
                if failure.is_some() && !m.stderr.trim().is_empty() {
                    self.emit(
                        LogRecord::new(LogLevel::Debug, "usecase", "record", "speedtest stderr")
                            .with_field("stderr", json!(m.stderr.trim())),
                    );
                }
                (m.stdout, failure)
            }
            Err(e) => (String::new(), Some(e.to_string())),
        };
        let duration_ms = started.elapsed().as_millis() as u64;

        let interrupted = interrupt.is_some_and(|i| i.is_interrupted());
        let policy = if interrupted { FailurePolicy::Skip } else { policy };

        let record = SpeedRecord::new(started_at, &stdout);
        match failure {
            None => {
                self.sink.append(&record)?;
                self.emit(
                    LogRecord::new(LogLevel::Info, "usecase", "record", "record appended")
                        .with_field("timestamp", json!(record.timestamp()))
                        .with_field("payload", json!(record.payload()))
                        .with_field("duration_ms", json!(duration_ms))
                        .with_field("output", json!(self.settings.output_file.display().to_string())),
                );
                Ok(RecordOutcome::Appended(record))
            }
            Some(reason) if policy == FailurePolicy::Append => {
                self.sink.append(&record)?;
                self.emit(
                    LogRecord::new(
                        LogLevel::Warn,
                        "usecase",
                        "record",
                        format!("measurement failed ({}); appended anyway", reason),
                    )
                    .with_field("duration_ms", json!(duration_ms)),
                );
                Ok(RecordOutcome::AppendedFailure { record, reason })
            }
            Some(reason) => {
                let reason = if interrupted {
                    format!("{}; interrupted", reason)
                } else {
                    reason
                };
                self.emit(
                    LogRecord::new(
                        LogLevel::Error,
                        "usecase",
                        "record",
                        format!("measurement failed ({}); nothing appended", reason),
                    )
                    .with_field("duration_ms", json!(duration_ms)),
                );
                Ok(RecordOutcome::Skipped { reason })
            }
        }
    }
}
