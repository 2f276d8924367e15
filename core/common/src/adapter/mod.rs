//! アダプター（ポートの標準実装）
//!
//! usecase は ports::outbound の trait 経由でのみファイル・時刻・プロセスに触れる。
//! ここの標準実装（Std*）かテスト用のモックを注入する。

pub mod file_json_log;
pub mod stderr_log;
pub mod std_clock;
pub mod std_env_resolver;
pub mod std_fs;
pub mod std_process;

pub use file_json_log::{FanoutLog, FileJsonLog, NoopLog};
pub use stderr_log::StderrLog;
pub use std_clock::StdClock;
pub use std_env_resolver::StdEnvResolver;
pub use std_fs::StdFileSystem;
pub use std_process::StdProcess;
