//! エラーハンドリング
//!
//! notepad 全体で使用されるエラー型を定義する。
//! コアが送出するのは範囲違反（InvalidRange）のみで、検索・置換の
//! 「何もしない」条件や未検出はエラーではなく結果値として返す。

use thiserror::Error;

/// アプリケーション全体のエラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotepadError {
    /// バッファ操作エラー
    #[error("Buffer operation failed: {0}")]
    Buffer(#[from] BufferError),

    /// 設定エラー
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// コマンド処理エラー
    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    /// アプリケーション論理エラー
    #[error("Application error: {0}")]
    Application(String),
}

/// バッファ操作固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// 選択範囲・スライス範囲がバッファ長の外にある
    #[error("Invalid range {start}..{end} for buffer of length {len}")]
    InvalidRange { start: isize, end: isize, len: usize },
}

impl BufferError {
    pub(crate) fn invalid_range(start: isize, end: isize, len: usize) -> Self {
        BufferError::InvalidRange { start, end, len }
    }
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration file {path}: {message}")]
    InvalidFile { path: String, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// コマンド処理固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Command not found: {command}")]
    NotFound { command: String },

    #[error("Invalid payload for {command}: {message}")]
    InvalidPayload { command: String, message: String },
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, NotepadError>;

/// バッファ操作用のResult型
pub mod buffer {
    pub type Result<T> = std::result::Result<T, super::BufferError>;
}

// std::io::Error から NotepadError への変換
impl From<std::io::Error> for NotepadError {
    fn from(error: std::io::Error) -> Self {
        NotepadError::Application(format!("IO error: {error}"))
    }
}

// serde_json::Error から NotepadError への変換
impl From<serde_json::Error> for NotepadError {
    fn from(error: serde_json::Error) -> Self {
        NotepadError::Application(format!("JSON error: {error}"))
    }
}
