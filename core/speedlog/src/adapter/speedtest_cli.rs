//! 外部の speedtest コマンドを起動する SpeedTester 実装
//!
//! `<executable> --server-id=<id> --format=csv` を実行し、stdout をそのまま返す。

use crate::domain::Measurement;
use crate::ports::outbound::SpeedTester;
use common::error::Error;
use common::ports::outbound::Process;
use std::path::PathBuf;
use std::sync::Arc;

/// speedtest CLI を Process 経由で呼ぶ
pub struct SpeedtestCli {
    process: Arc<dyn Process>,
    executable: PathBuf,
}

impl SpeedtestCli {
    pub fn new(process: Arc<dyn Process>, executable: impl Into<PathBuf>) -> Self {
        Self {
            process,
            executable: executable.into(),
        }
    }
}

/// 計測ツールに渡す引数
pub fn build_args(server_id: &str) -> Vec<String> {
    vec![
        format!("--server-id={}", server_id),
        "--format=csv".to_string(),
    ]
}

impl SpeedTester for SpeedtestCli {
    fn measure(&self, server_id: &str) -> Result<Measurement, Error> {
        let output = self
            .process
            .output(&self.executable, &build_args(server_id))?;
        Ok(Measurement {
            exit_code: output.code,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
