//! 待機の Outbound ポート（テストでは時計を進めるだけの実装に差し替える）

use std::time::Duration;

/// 待機の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepOutcome {
    Elapsed,
    /// 待機中に割り込みが入った
    Interrupted,
}

/// 指定時間だけ待つ
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> SleepOutcome;
}
