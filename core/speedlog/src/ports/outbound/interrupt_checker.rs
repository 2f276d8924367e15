//! Ctrl+C（SIGINT）等による割り込みを検知する Outbound ポート
//!
//! watch ループが待機中に中断要求を受けたら、次の計測を始めずに終了するために使用する。

/// 割り込みが要求されたかどうかを返す能力
pub trait InterruptChecker: Send + Sync {
    fn is_interrupted(&self) -> bool;
}
