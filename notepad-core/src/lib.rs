//! notepad - lightweight desktop text editor core
//!
//! プラットフォーム層（ウィンドウ・ダイアログ・ディスクI/O）から独立した
//! テキストバッファ、検索・置換エンジン、カーソル位置変換を提供する

// コアモジュール
pub mod error;

// データ層
pub mod buffer;
pub mod document;

// ロジック層
pub mod search;

// 公開API
pub use buffer::{locate, CursorLocation, Selection, TextBuffer};
pub use document::{DocumentStatus, SaveTarget};
pub use error::{BufferError, NotepadError, Result};
pub use search::{FindOutcome, FindReplaceEngine, ReplaceOutcome};
