//! speedlog 共通ライブラリ
//!
//! エラー型・ディレクトリ解決・外界 I/O のポートと標準アダプタを提供します。

/// エラーハンドリング
pub mod error;

/// ドメイン型（ディレクトリ等）
pub mod domain;

/// Ports & Adapters のポート定義
pub mod ports;

/// ポートの標準実装
pub mod adapter;
