//! 定期実行のスケジュール（毎時 offset, offset+interval, ... 分）
//!
//! 壁時計時刻（タイムゾーン変換済みの NaiveDateTime）の上で計算する。

use chrono::{Duration, NaiveDateTime, Timelike};
use common::error::Error;

/// 既定の実行間隔（分）
pub const DEFAULT_INTERVAL_MINUTES: u32 = 10;
/// 既定のオフセット（分）
pub const DEFAULT_OFFSET_MINUTES: u32 = 3;

/// interval は 60 の約数、offset < interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    interval_minutes: u32,
    offset_minutes: u32,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            offset_minutes: DEFAULT_OFFSET_MINUTES,
        }
    }
}

impl Schedule {
    pub fn new(interval_minutes: u32, offset_minutes: u32) -> Result<Self, Error> {
        if interval_minutes == 0 || interval_minutes > 60 || 60 % interval_minutes != 0 {
            return Err(Error::invalid_argument(format!(
                "interval must divide 60 (1, 2, 3, 4, 5, 6, 10, 12, 15, 20, 30, 60), got {}",
                interval_minutes
            )));
        }
        if offset_minutes >= interval_minutes {
            return Err(Error::invalid_argument(format!(
                "offset must be smaller than the interval ({}), got {}",
                interval_minutes, offset_minutes
            )));
        }
        Ok(Self {
            interval_minutes,
            offset_minutes,
        })
    }

    pub fn interval_minutes(&self) -> u32 {
        self.interval_minutes
    }

    pub fn offset_minutes(&self) -> u32 {
        self.offset_minutes
    }

    /// now より厳密に後で、分が offset (mod interval) に一致する最初の時刻（秒は 0）
    pub fn next_run_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        let hour_start = now
            - Duration::minutes(i64::from(now.minute()))
            - Duration::seconds(i64::from(now.second()))
            - Duration::nanoseconds(i64::from(now.nanosecond()));
        let block = (now.minute() / self.interval_minutes) * self.interval_minutes;
        let candidate = hour_start + Duration::minutes(i64::from(block + self.offset_minutes));
        if candidate > now {
            candidate
        } else {
            candidate + Duration::minutes(i64::from(self.interval_minutes))
        }
    }

    /// 1 時間内の実行分の一覧（例: "03, 13, 23, 33, 43, 53"）
    pub fn describe(&self) -> String {
        (0..60 / self.interval_minutes)
            .map(|i| format!("{:02}", i * self.interval_minutes + self.offset_minutes))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
