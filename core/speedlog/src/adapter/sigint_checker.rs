//! Ctrl+C（SIGINT）を watch の停止要求に変える InterruptChecker 実装
//!
//! 1 回目は停止要求（待機中ならすぐ、計測中なら計測が終わってから止まる）。
//! 2 回目は待たずに終了コード 130 で抜ける。

use crate::ports::outbound::InterruptChecker;
use common::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 強制終了時の終了コード（128 + SIGINT）
pub const EXIT_FORCED: i32 = 130;

/// Ctrl+C を受けたときの対応
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalAction {
    /// 現在の回が終わったら止まる
    Stop,
    /// すぐにプロセスを終了する
    ForceExit,
}

/// 受けた Ctrl+C の回数
#[derive(Debug, Default)]
pub struct InterruptCounter {
    presses: AtomicUsize,
}

impl InterruptCounter {
    /// 1 回分を数え、取るべき対応を返す
    pub fn signal(&self) -> SignalAction {
        match self.presses.fetch_add(1, Ordering::SeqCst) {
            0 => SignalAction::Stop,
            _ => SignalAction::ForceExit,
        }
    }

    pub fn presses(&self) -> usize {
        self.presses.load(Ordering::SeqCst)
    }
}

impl InterruptChecker for InterruptCounter {
    fn is_interrupted(&self) -> bool {
        self.presses() > 0
    }
}

/// ctrlc ハンドラに InterruptCounter をつないだもの
pub struct SigintChecker {
    counter: Arc<InterruptCounter>,
}

impl SigintChecker {
    /// SIGINT ハンドラを登録する。プロセスにつき 1 回だけ登録できる（2 回目は Err）。
    pub fn install() -> Result<Self, Error> {
        let counter = Arc::new(InterruptCounter::default());
        let handler_counter = Arc::clone(&counter);
        ctrlc::set_handler(move || {
            if handler_counter.signal() == SignalAction::ForceExit {
                eprintln!();
                eprintln!("speedlog: interrupted again, exiting now");
                std::process::exit(EXIT_FORCED);
            }
            eprintln!();
            eprintln!("speedlog: stopping after the current step (Ctrl+C again to exit now)");
        })
        .map_err(|e| Error::system(format!("cannot install Ctrl+C handler: {}", e)))?;
        Ok(Self { counter })
    }
}

impl InterruptChecker for SigintChecker {
    fn is_interrupted(&self) -> bool {
        self.counter.is_interrupted()
    }
}

/// 割り込みを検知しないスタブ（ハンドラ登録に失敗した場合に使用）
#[derive(Debug, Clone, Default)]
pub struct NoopInterruptChecker;

impl InterruptChecker for NoopInterruptChecker {
    fn is_interrupted(&self) -> bool {
        false
    }
}
