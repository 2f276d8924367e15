//! ユースケース単位のテストと、そのためのフェイク実装



use crate::domain::{Measurement, Settings, SpeedRecord, TimeZoneSpec};
use crate::ports::outbound::{InterruptChecker, RecordSink, SleepOutcome, Sleeper, SpeedTester};
use chrono::{DateTime, TimeZone, Utc};
use common::error::Error;
use common::ports::outbound::{Clock, Log, LogLevel, LogRecord};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub(crate) fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

/// UTC 基準・既定サーバーのテスト用設定
pub(crate) fn test_settings() -> Settings {
    Settings {
        timezone: TimeZoneSpec::Utc,
        ..Settings::with_output("/unused/output.csv")
    }
}

pub(crate) fn ok_measurement(stdout: &str) -> Measurement {
    Measurement {
        exit_code: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

/// 手で進める時計
pub(crate) struct FakeClock {
    now: Mutex<DateTime<Utc>>,
}

impl FakeClock {
    pub(crate) fn new(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub(crate) fn advance(&self, d: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += chrono::Duration::from_std(d).unwrap();
    }
}

impl Clock for FakeClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// 用意した結果を順に返す。尽きたら成功を返す。
#[derive(Default)]
pub(crate) struct ScriptedTester {
    results: Mutex<VecDeque<Result<Measurement, Error>>>,
    pub(crate) calls: Mutex<Vec<String>>,
}

impl ScriptedTester {
    pub(crate) fn new(results: Vec<Result<Measurement, Error>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl SpeedTester for ScriptedTester {
    fn measure(&self, server_id: &str) -> Result<Measurement, Error> {
        self.calls.lock().unwrap().push(server_id.to_string());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ok_measurement("\"isp\",\"1.0\"")))
    }
}

/// 追記内容をメモリに貯める。fail なら常に I/O エラー。
#[derive(Default)]
pub(crate) struct MemorySink {
    pub(crate) lines: Mutex<Vec<String>>,
    pub(crate) fail: bool,
}

impl MemorySink {
    pub(crate) fn failing() -> Self {
        Self {
            lines: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl RecordSink for MemorySink {
    fn append(&self, record: &SpeedRecord) -> Result<(), Error> {
        if self.fail {
            return Err(Error::io_msg("disk full"));
        }
        self.lines.lock().unwrap().push(record.to_csv_line());
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct MemoryLog {
    pub(crate) records: Mutex<Vec<LogRecord>>,
}

impl MemoryLog {
    pub(crate) fn count(&self, level: LogLevel) -> usize {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.level == level)
            .count()
    }

    pub(crate) fn has_kind(&self, kind: &str) -> bool {
        self.records
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.kind.as_deref() == Some(kind))
    }
}

impl Log for MemoryLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FlagInterrupt(pub(crate) AtomicBool);

impl InterruptChecker for FlagInterrupt {
    fn is_interrupted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// 実際には眠らず FakeClock を進める。interrupt_on に達した回の待機で割り込みを返す。
pub(crate) struct ClockSleeper {
    clock: Arc<FakeClock>,
    pub(crate) slept: Mutex<Vec<Duration>>,
    interrupt_on: Option<usize>,
    interrupt: Arc<FlagInterrupt>,
}

impl ClockSleeper {
    pub(crate) fn new(clock: Arc<FakeClock>, interrupt: Arc<FlagInterrupt>) -> Self {
        Self {
            clock,
            slept: Mutex::new(Vec::new()),
            interrupt_on: None,
            interrupt,
        }
    }

    /// n 回目（0 始まり）の待機で Ctrl+C が来たことにする
    pub(crate) fn interrupting_on(mut self, n: usize) -> Self {
        self.interrupt_on = Some(n);
        self
    }

    pub(crate) fn slept(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

impl Sleeper for ClockSleeper {
    fn sleep(&self, duration: Duration) -> SleepOutcome {
        let mut slept = self.slept.lock().unwrap();
        if self.interrupt_on == Some(slept.len()) {
            self.interrupt.0.store(true, Ordering::Relaxed);
            slept.push(Duration::ZERO);
            return SleepOutcome::Interrupted;
        }
        slept.push(duration);
        self.clock.advance(duration);
        SleepOutcome::Elapsed
    }
}
