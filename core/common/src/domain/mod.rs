//! ドメイン型
//!
//! PathBuf を直接運ばず、解決済みディレクトリとして境界を明確にする。

pub mod dirs;

pub use dirs::Dirs;
