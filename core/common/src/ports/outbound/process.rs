//! サブプロセス実行 Outbound ポート
//!
//! 計測ツールなど外部コマンドの起動を trait で抽象化する。

use crate::error::Error;
use std::path::Path;

/// 終了したサブプロセスの結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// 終了コード（シグナル終了時は None）
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// サブプロセス実行の抽象
///
/// 実装は `common::adapter::StdProcess`（std::process::Command）など。
pub trait Process: Send + Sync {
    /// プログラムを引数付きで実行し、終了まで待って stdout / stderr を返す。
    /// 起動できなかった場合のみ Err。非 0 終了は Ok(code) で返す。
    fn output(&self, program: &Path, args: &[String]) -> Result<ProcessOutput, Error>;
}
