//! Outbound ポート: アプリが外界（計測ツール・出力ファイル・シグナル・時間経過）を使うための trait

pub mod interrupt_checker;
pub mod record_sink;
pub mod sleeper;
pub mod speed_tester;

pub use interrupt_checker::InterruptChecker;
pub use record_sink::RecordSink;
pub use sleeper::{SleepOutcome, Sleeper};
pub use speed_tester::SpeedTester;
