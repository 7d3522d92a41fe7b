//! バッファモジュール
//!
//! 文書内容・選択範囲の保持と、カーソル位置の行・列変換を提供

pub mod locator;
pub mod selection;
pub mod text_buffer;

pub use locator::{locate, CursorLocation};
pub use selection::Selection;
pub use text_buffer::TextBuffer;
