//! エラーハンドリング
//!
//! 全レイヤー共通のエラー型。`main` で `exit_code()` によって終了コードに変換する。

use thiserror::Error as ThisError;

/// エラー型
#[derive(Debug, ThisError)]
pub enum Error {
    /// 引数不正（usage を表示する）
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Io(String),

    /// 環境変数まわり（HOME 未設定など）
    #[error("{0}")]
    Env(String),

    #[error("JSON error: {0}")]
    Json(String),

    /// 設定ファイルの内容不正
    #[error("config error: {0}")]
    Config(String),

    /// 外部プロセスの起動失敗
    #[error("{0}")]
    Process(String),

    #[error("{0}")]
    System(String),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn io_msg(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn env(msg: impl Into<String>) -> Self {
        Self::Env(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn process(msg: impl Into<String>) -> Self {
        Self::Process(msg.into())
    }

    pub fn system(msg: impl Into<String>) -> Self {
        Self::System(msg.into())
    }

    /// sysexits 相当の終了コード
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) => 64,
            Self::Io(_) => 74,
            Self::Config(_) => 78,
            Self::Env(_) | Self::Json(_) | Self::Process(_) | Self::System(_) => 70,
        }
    }

    /// usage を表示すべきエラーか
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}
